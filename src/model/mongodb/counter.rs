use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions},
    Database,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::collection::Coll;

/// Counter names, one per entity collection.
pub const USER_IDS: &str = "user_ids";
pub const IMAGE_IDS: &str = "image_ids";
pub const QUESTION_IDS: &str = "question_ids";
pub const CHOICE_IDS: &str = "choice_ids";
pub const ANSWER_IDS: &str = "answer_ids";

const ALL_COUNTERS: &[&str] = &[USER_IDS, IMAGE_IDS, QUESTION_IDS, CHOICE_IDS, ANSWER_IDS];

/// A counter object used to implement auto-increment integer IDs.
///
/// IDs start at 1; an ID of 0 therefore always means "missing".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Atomically retrieve the next value of the named counter.
    pub async fn next(counters: &Coll<Counter>, name: &str) -> Result<u32> {
        Self::reserve(counters, name, 1).await
    }

    /// Atomically reserve `count` consecutive values of the named counter,
    /// returning the first. Used to assign IDs to a whole batch with a
    /// single round-trip.
    pub async fn reserve(counters: &Coll<Counter>, name: &str, count: u32) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": count as i64 }
        };
        let options: FindOneAndUpdateOptions = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": name }, update, options)
            .await?
            .ok_or_else(|| Error::Internal(format!("Failed to find counter '{name}'")))?;
        Ok(counter.next)
    }
}

/// Ensure the ID counter for every entity collection exists, without
/// disturbing any that already do.
///
/// This operation is idempotent.
pub async fn ensure_counters_exist(db: &Database) -> std::result::Result<(), DbError> {
    debug!("Ensuring ID counters exist");

    let counters = Coll::<Counter>::from_db(db);
    let options: UpdateOptions = UpdateOptions::builder().upsert(true).build();
    for name in ALL_COUNTERS {
        counters
            .update_one(
                doc! { "_id": name },
                doc! { "$setOnInsert": { "next": 1_i64 } },
                options.clone(),
            )
            .await?;
    }
    Ok(())
}
