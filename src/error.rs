//! Error types for the redfix library.

use thiserror::Error;

/// Top-level error type for index operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Store-related errors.
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Invalid caller input.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Entry (de)serialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors caused by malformed store requests.
#[derive(Error, Debug)]
pub enum InputError {
    /// The required `id` field was absent.
    #[error("missing required field: id")]
    MissingId,

    /// The required `phrase` field was absent.
    #[error("missing required field: phrase")]
    MissingPhrase,
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
