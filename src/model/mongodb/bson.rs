use mongodb::bson::{doc, Document};

/// Filter a collection by integer `_id`.
///
/// The value is widened to `i64`; MongoDB bridges numeric types in
/// comparisons, so this matches documents whose `_id` was stored as
/// either a 32-bit or 64-bit integer.
pub fn id_filter(id: u32) -> Document {
    doc! { "_id": id as i64 }
}
