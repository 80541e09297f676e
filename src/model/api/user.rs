use chrono::{DateTime, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::common::{AgeBracket, Gender, UserId};
use crate::model::db::{User, UserCore};

/// A user registration request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserSpec {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub email: String,
}

impl TryFrom<UserSpec> for UserCore {
    type Error = Error;

    fn try_from(spec: UserSpec) -> Result<Self, Self::Error> {
        if spec.name.is_empty() {
            return Err(Error::InvalidInput("'name' must not be empty".to_string()));
        }
        if spec.email.is_empty() {
            return Err(Error::InvalidInput("'email' must not be empty".to_string()));
        }
        let age = spec.age.parse::<AgeBracket>()?;
        let gender = spec.gender.parse::<Gender>()?;
        Ok(UserCore::new(spec.name, age, gender, spec.email))
    }
}

/// A partial user update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Convert into a `$set` update document, refreshing `updated_at`.
    /// Fails if no fields were supplied or an enum value is out of set.
    pub fn into_update_doc(self) -> Result<Document, Error> {
        let mut set = Document::new();
        if let Some(name) = self.name {
            if name.is_empty() {
                return Err(Error::InvalidInput("'name' must not be empty".to_string()));
            }
            set.insert("name", name);
        }
        if let Some(age) = self.age {
            set.insert("age", age.parse::<AgeBracket>()?);
        }
        if let Some(gender) = self.gender {
            set.insert("gender", gender.parse::<Gender>()?);
        }
        if let Some(email) = self.email {
            if email.is_empty() {
                return Err(Error::InvalidInput("'email' must not be empty".to_string()));
            }
            set.insert("email", email);
        }
        if set.is_empty() {
            return Err(Error::InvalidInput("No fields to update".to_string()));
        }
        set.insert("updated_at", BsonDateTime::from_chrono(Utc::now()));
        Ok(doc! { "$set": set })
    }
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub age: AgeBracket,
    pub gender: Gender,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.user.name,
            age: user.user.age,
            gender: user.user.gender,
            email: user.user.email,
            created_at: user.user.created_at,
            updated_at: user.user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> UserSpec {
        UserSpec {
            name: "kim".to_string(),
            age: "twenty".to_string(),
            gender: "female".to_string(),
            email: "kim@example.com".to_string(),
        }
    }

    #[test]
    fn valid_spec_converts() {
        let user = UserCore::try_from(spec()).unwrap();
        assert_eq!(user.age, AgeBracket::Twenty);
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn out_of_set_age_is_invalid_enum() {
        let bad = UserSpec {
            age: "ancient".to_string(),
            ..spec()
        };
        assert!(matches!(
            UserCore::try_from(bad),
            Err(Error::InvalidEnum(ref e)) if e.field == "age" && e.value == "ancient"
        ));
    }

    #[test]
    fn empty_name_is_invalid_input() {
        let bad = UserSpec {
            name: String::new(),
            ..spec()
        };
        assert!(matches!(UserCore::try_from(bad), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UserUpdate::default().into_update_doc().is_err());
    }

    #[test]
    fn update_doc_refreshes_timestamp() {
        let update = UserUpdate {
            age: Some("fifty".to_string()),
            ..UserUpdate::default()
        };
        let doc = update.into_update_doc().unwrap();
        let set = doc.get_document("$set").unwrap();
        assert_eq!(set.get_str("age").unwrap(), "fifty");
        assert!(set.get_datetime("updated_at").is_ok());
        assert!(set.get("name").is_none());
    }
}
