mod id;
pub mod status;

pub use id::{AnswerId, ChoiceId, ImageId, QuestionId, UserId};
pub use status::{AgeBracket, Gender, ImageKind};
