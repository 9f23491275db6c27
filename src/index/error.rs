//! Index errors

use thiserror::Error;

/// Errors raised while loading or querying the content index
#[derive(Error, Debug)]
pub enum IndexError {
    /// The query was issued outside a live render context
    #[error("Content index data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Content index not built yet (expected {0})")]
    NotBuilt(String),

    #[error("Content index version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u64, expected: u32 },

    #[error("Content index does not match the expected shape: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("Invalid index query: {0}")]
    InvalidQuery(String),

    #[error("Duplicate slug {slug:?} in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Duplicate id {id:?} in {first} and {second}")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
