use thiserror::Error;

/// Failures at the persistence seam.
///
/// Message-carrying rather than source-carrying so backends over different
/// substrates (in-memory, file, browser storage) share one shape and tests
/// can compare values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Why a persisted snapshot could not be restored.
///
/// Never escapes the store: load falls back to empty state plus seeding and
/// logs the cause.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("persisted snapshot is not decodable")]
    Decode(#[from] serde_json::Error),
}
