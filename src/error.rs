//! Error types for the persistence and catalog boundaries.
//!
//! The typing engine itself never fails; mistakes are data, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown mission: {0}")]
    UnknownMission(u32),

    #[error("Mission {0} has no exercises")]
    NoExercises(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
