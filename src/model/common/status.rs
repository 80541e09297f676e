//! Closed enumerations for user demographics and image classification.
//!
//! Every entry point that accepts one of these fields goes through the same
//! `FromStr` implementation, so an out-of-set value always surfaces as the
//! same [`InvalidStatus`] error naming the field, the value, and the
//! allowed set.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value outside one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} '{value}', allowed values: {}", .allowed.join(", "))]
pub struct InvalidStatus {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

/// User age bracket. `fourty` is a historical misspelling baked into the
/// stored data, so it stays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Teen,
    Twenty,
    Thirty,
    Fourty,
    Fifty,
}

impl AgeBracket {
    pub const ALLOWED: &'static [&'static str] = &["teen", "twenty", "thirty", "fourty", "fifty"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teen => "teen",
            Self::Twenty => "twenty",
            Self::Thirty => "thirty",
            Self::Fourty => "fourty",
            Self::Fifty => "fifty",
        }
    }
}

impl FromStr for AgeBracket {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teen" => Ok(Self::Teen),
            "twenty" => Ok(Self::Twenty),
            "thirty" => Ok(Self::Thirty),
            "fourty" => Ok(Self::Fourty),
            "fifty" => Ok(Self::Fifty),
            _ => Err(InvalidStatus {
                field: "age",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl Display for AgeBracket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AgeBracket> for Bson {
    fn from(age: AgeBracket) -> Self {
        to_bson(&age).expect("Serialisation is infallible")
    }
}

/// User gender.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALLOWED: &'static [&'static str] = &["male", "female"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(InvalidStatus {
                field: "gender",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Gender> for Bson {
    fn from(gender: Gender) -> Self {
        to_bson(&gender).expect("Serialisation is infallible")
    }
}

/// Image classification: `main` for the landing page, `sub` for
/// per-question images. More than one `main` image is not prevented;
/// lookups take the first by storage order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Main,
    Sub,
}

impl ImageKind {
    pub const ALLOWED: &'static [&'static str] = &["main", "sub"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sub => "sub",
        }
    }
}

impl FromStr for ImageKind {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "sub" => Ok(Self::Sub),
            _ => Err(InvalidStatus {
                field: "type",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ImageKind> for Bson {
    fn from(kind: ImageKind) -> Self {
        to_bson(&kind).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for value in AgeBracket::ALLOWED {
            assert_eq!(value.parse::<AgeBracket>().unwrap().as_str(), *value);
        }
        for value in Gender::ALLOWED {
            assert_eq!(value.parse::<Gender>().unwrap().as_str(), *value);
        }
        for value in ImageKind::ALLOWED {
            assert_eq!(value.parse::<ImageKind>().unwrap().as_str(), *value);
        }
    }

    #[test]
    fn out_of_set_values_are_rejected() {
        let err = "sixty".parse::<AgeBracket>().unwrap_err();
        assert_eq!(err.field, "age");
        assert_eq!(err.value, "sixty");

        // The historically correct spelling is, unfortunately, wrong here.
        assert!("forty".parse::<AgeBracket>().is_err());
        assert!("".parse::<Gender>().is_err());
        assert!("MAIN".parse::<ImageKind>().is_err());
    }

    #[test]
    fn serialises_to_lowercase_strings() {
        assert_eq!(Bson::from(AgeBracket::Teen), Bson::String("teen".into()));
        assert_eq!(Bson::from(Gender::Female), Bson::String("female".into()));
        assert_eq!(Bson::from(ImageKind::Main), Bson::String("main".into()));
    }
}
