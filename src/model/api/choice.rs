use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{ChoiceId, QuestionId};
use crate::model::db::Choice;

/// A nested choice inside a question creation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChoiceSpec {
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Defaults to the choice's 1-based position in the request.
    #[serde(default)]
    pub sqe: Option<u32>,
}

fn default_active() -> bool {
    true
}

/// The body of a bulk choice creation request: plain contents only,
/// ordering taken from input order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChoiceBatch {
    pub choices: Vec<String>,
}

/// A choice as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub id: ChoiceId,
    pub content: String,
    pub is_active: bool,
    pub sqe: u32,
    pub question_id: QuestionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Choice> for ChoiceResponse {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id,
            content: choice.choice.content,
            is_active: choice.choice.is_active,
            sqe: choice.choice.sqe,
            question_id: choice.choice.question_id,
            created_at: choice.choice.created_at,
            updated_at: choice.choice.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_spec_defaults() {
        let spec: ChoiceSpec =
            rocket::serde::json::from_str(r#"{"content": "Red"}"#).unwrap();
        assert!(spec.is_active);
        assert_eq!(spec.sqe, None);
    }

    #[test]
    fn batch_rejects_non_string_items() {
        assert!(
            rocket::serde::json::from_str::<ChoiceBatch>(r#"{"choices": ["A", 2]}"#).is_err()
        );
        assert!(rocket::serde::json::from_str::<ChoiceBatch>(r#"{"choices": "A"}"#).is_err());
    }
}
