use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{ChoiceId, QuestionId};

/// Core choice data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCore {
    pub content: String,
    pub is_active: bool,
    /// Caller-assigned display ordering hint; not unique or contiguous.
    pub sqe: u32,
    /// The question this choice belongs to.
    pub question_id: QuestionId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ChoiceCore {
    pub fn new(content: String, is_active: bool, sqe: u32, question_id: QuestionId) -> Self {
        let now = Utc::now();
        Self {
            content,
            is_active,
            sqe,
            question_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A choice from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "_id")]
    pub id: ChoiceId,
    #[serde(flatten)]
    pub choice: ChoiceCore,
}

impl Choice {
    /// Build the rows for a batch of plain-string contents, assigning
    /// consecutive IDs from `first_id` and numbering `sqe` from 1 in input
    /// order.
    pub fn sequence(question_id: QuestionId, first_id: ChoiceId, contents: Vec<String>) -> Vec<Self> {
        contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Self {
                id: first_id + index as u32,
                choice: ChoiceCore::new(content, true, index as u32 + 1, question_id),
            })
            .collect()
    }
}

impl Deref for Choice {
    type Target = ChoiceCore;

    fn deref(&self) -> &Self::Target {
        &self.choice
    }
}

impl DerefMut for Choice {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.choice
    }
}
