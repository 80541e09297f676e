use chrono::{DateTime, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::common::{ImageId, ImageKind};
use crate::model::db::{Image, ImageCore};

/// An image creation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageSpec {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TryFrom<ImageSpec> for ImageCore {
    type Error = Error;

    fn try_from(spec: ImageSpec) -> Result<Self, Self::Error> {
        if spec.url.is_empty() {
            return Err(Error::InvalidInput("'url' must not be empty".to_string()));
        }
        let kind = spec.kind.parse::<ImageKind>()?;
        Ok(ImageCore::new(spec.url, kind))
    }
}

/// A partial image update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageUpdate {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ImageUpdate {
    /// Convert into a `$set` update document, refreshing `updated_at`.
    pub fn into_update_doc(self) -> Result<Document, Error> {
        let mut set = Document::new();
        if let Some(url) = self.url {
            if url.is_empty() {
                return Err(Error::InvalidInput("'url' must not be empty".to_string()));
            }
            set.insert("url", url);
        }
        if let Some(kind) = self.kind {
            set.insert("type", kind.parse::<ImageKind>()?);
        }
        if set.is_empty() {
            return Err(Error::InvalidInput("No fields to update".to_string()));
        }
        set.insert("updated_at", BsonDateTime::from_chrono(Utc::now()));
        Ok(doc! { "$set": set })
    }
}

/// An image as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub id: ImageId,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            url: image.image.url,
            kind: image.image.kind,
            created_at: image.image.created_at,
            updated_at: image.image.updated_at,
        }
    }
}
