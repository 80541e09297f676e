//! DB-compatible (e.g. de/serialisable) types.
//!
//! Each entity is split into an `XCore` holding the stored fields and an
//! `X` adding the integer `_id`. Timestamps are serialised in MongoDB's
//! own datetime format.

mod answer;
pub use answer::{Answer, AnswerCore};

mod choice;
pub use choice::{Choice, ChoiceCore};

mod image;
pub use image::{Image, ImageCore};

mod question;
pub use question::{Question, QuestionCore};

mod user;
pub use user::{User, UserCore};
