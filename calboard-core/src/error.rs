//! Error types for calboard.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur in calboard operations.
///
/// Unknown event ids are not errors: updates report `false` and deletes are
/// silent, since a view may act on a reference that was already removed.
#[derive(Error, Debug)]
pub enum CalBoardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event ends before it starts ({end} < {start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Event amount must be zero or more, got {0}")]
    InvalidAmount(f64),

    #[error("Duplicate event id: {0}")]
    DuplicateId(String),

    #[error("Event collection mixes engineer and enterprise event types")]
    MixedEventTypes,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calboard operations.
pub type CalBoardResult<T> = Result<T, CalBoardError>;
