//!  Storage is organized through [record_storage::RecordStore].
//!  The basic idea is:
//!   - All days live in one JSON object stored under a single namespaced key.
//!   - Keys of the object are `YYYY-MM-DD` dates, values are [entities::DayRecord]s.
//!   - Records written under an older shape are upgraded on every read, see [merge].
//!   - Where the text physically lives is decided by a [backend::StorageBackend].

pub mod backend;
pub mod entities;
pub mod merge;
pub mod record_storage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not accessible: {0}")]
    Access(#[from] std::io::Error),
    #[error("stored data is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("data is not a mapping from dates to records")]
    InvalidShape,
    #[error("entry for {date} is not a valid day record: {reason}")]
    InvalidRecord { date: String, reason: String },
}
