//! Core error types.
//!
//! Engine-reported failures are not errors here: they are data, carried as
//! [`crate::types::EngineOutcome::Cancelled`]. The `Error` enum covers only
//! local faults that cannot be expressed as an engine outcome.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("staged audio I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("staged audio not found: {0}")]
    ResourceNotFound(PathBuf),

    #[error("audio payload is empty")]
    EmptyAudio,

    #[error("invalid audio payload: {0}")]
    InvalidAudio(String),
}
