//! Configuration errors
//!
//! The simulation itself has no recoverable errors: death and win are
//! ordinary tick results. Everything here fails at load time.

use thiserror::Error;

/// Level loading and validation errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// No geometry is defined for the requested level
    #[error("unknown level {id}: the catalog defines levels 1..={count}")]
    UnknownLevel {
        /// Requested level id
        id: u32,
        /// Number of levels in the catalog
        count: u32,
    },

    /// Level data is structurally valid JSON but describes an impossible level
    #[error("invalid level data: {reason}")]
    Invalid {
        /// What is wrong with the level
        reason: String,
    },

    /// Level JSON could not be parsed
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tuning load errors
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for {field}: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

impl LevelError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LevelError::Invalid {
            reason: reason.into(),
        }
    }
}
