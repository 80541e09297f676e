use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{ImageId, QuestionId};
use crate::model::db::{Image, Question};

use super::{ChoiceSpec, ImageResponse};

/// A question creation request, optionally with its choices nested so the
/// whole thing can be created in one go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSpec {
    pub title: String,
    pub sqe: u32,
    pub image_id: ImageId,
    #[serde(default)]
    pub choices: Vec<ChoiceSpec>,
}

/// A question as returned by the API, with its image embedded. The image
/// is `null` if it has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub title: String,
    pub is_active: bool,
    pub sqe: u32,
    pub image: Option<ImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionResponse {
    pub fn new(question: Question, image: Option<Image>) -> Self {
        Self {
            id: question.id,
            title: question.question.title,
            is_active: question.question.is_active,
            sqe: question.question.sqe,
            image: image.map(ImageResponse::from),
            created_at: question.question.created_at,
            updated_at: question.question.updated_at,
        }
    }
}
