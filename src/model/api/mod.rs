//! API request/response types.
//!
//! Requests carry enumerated fields as plain strings so that validation
//! goes through the shared parsers in [`crate::model::common::status`]
//! rather than failing opaquely during deserialisation. Responses
//! serialise enums as their string value and timestamps as RFC 3339.

mod answer;
pub use answer::{AnswerSpec, AnswerView};

mod choice;
pub use choice::{ChoiceBatch, ChoiceResponse, ChoiceSpec};

mod image;
pub use image::{ImageResponse, ImageSpec, ImageUpdate};

mod question;
pub use question::{QuestionResponse, QuestionSpec};

mod user;
pub use user::{UserResponse, UserSpec, UserUpdate};

use serde::{Deserialize, Serialize};

/// Acknowledgement for batch-creation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCount {
    pub created_count: usize,
}
