use serde::{Deserialize, Serialize};

use crate::model::common::{AnswerId, ChoiceId, QuestionId, UserId};

/// One (user, choice) pair in a submission batch.
///
/// Absent ids deserialise to 0, which never identifies a real row, so the
/// submission workflow can report them as missing fields rather than
/// failing opaquely during body parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerSpec {
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default)]
    pub choice_id: ChoiceId,
}

/// An answer joined to its choice and the choice's parent question. The
/// joined fields are `null` if the referenced row has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerView {
    pub answer_id: AnswerId,
    pub user_id: UserId,
    pub choice_id: ChoiceId,
    pub choice_content: Option<String>,
    pub question_id: Option<QuestionId>,
    pub question_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ids_default_to_zero() {
        let spec: AnswerSpec = rocket::serde::json::from_str(r#"{"user_id": 3}"#).unwrap();
        assert_eq!(spec.user_id, 3);
        assert_eq!(spec.choice_id, 0);
    }

    #[test]
    fn joined_fields_serialise_as_nulls() {
        let view = AnswerView {
            answer_id: 1,
            user_id: 2,
            choice_id: 3,
            choice_content: None,
            question_id: None,
            question_title: None,
        };
        let json = rocket::serde::json::to_string(&view).unwrap();
        assert!(json.contains("\"choice_content\":null"));
        assert!(json.contains("\"question_title\":null"));
    }
}
