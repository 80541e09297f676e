use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{ImageId, ImageKind};

/// Core image data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCore {
    /// Location of the image itself; typically an external URL.
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ImageCore {
    pub fn new(url: String, kind: ImageKind) -> Self {
        let now = Utc::now();
        Self {
            url,
            kind,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An image from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: ImageId,
    #[serde(flatten)]
    pub image: ImageCore,
}

impl Deref for Image {
    type Target = ImageCore;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl DerefMut for Image {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.image
    }
}
