use std::{fmt, time::Duration};

/// Failures surfaced by the repositories and the data-access facade.
///
/// A missing user or movie is not an error: lookups by id return `Option`
/// and deletes return `bool`.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{kind} {name:?} already exists")]
    Duplicate { kind: EntityKind, name: String },

    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl DataError {
    /// Reports a unique-index conflict on `name` as a duplicate. A concurrent
    /// insert can slip past the up-front check and only hit the index.
    pub fn or_duplicate(self, kind: EntityKind, name: &str) -> Self {
        match self {
            DataError::Storage(err)
                if matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) =>
            {
                DataError::Duplicate { kind, name: name.to_string() }
            }
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityKind {
    User,
    Movie,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => f.write_str("user"),
            EntityKind::Movie => f.write_str("movie"),
        }
    }
}

/// Why a metadata lookup produced no usable answer.
///
/// Callers treat every variant the same way (fall back to verbatim data);
/// the split exists for logging.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("metadata response is malformed: {0}")]
    Malformed(&'static str),

    #[error("metadata lookup did not finish within {0:?}")]
    TimedOut(Duration),
}

pub type DataResult<T> = Result<T, DataError>;
