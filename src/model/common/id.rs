//! Entity identifiers.
//!
//! All entities use auto-incrementing integer IDs, allocated from the
//! `counters` collection (see [`crate::model::mongodb::Counter`]).
//! Zero is never allocated, so it can be used to detect missing fields.

pub type UserId = u32;
pub type ImageId = u32;
pub type QuestionId = u32;
pub type ChoiceId = u32;
pub type AnswerId = u32;
