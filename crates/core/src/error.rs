#![allow(missing_docs)]

//! Error taxonomy shared by every core operation.

use thiserror::Error;
use tracing::error;

use crate::models::{LineId, StationId};

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, SubwayError>;

/// Errors raised while editing or reading the subway network.
#[derive(Error, Debug)]
pub enum SubwayError {
    /// Insert request is malformed or would break the chain.
    #[error("invalid section: {reason}")]
    InvalidSection { reason: String },

    /// Removal target is not on the line, or the line has no sections.
    #[error("invalid removal: {reason}")]
    InvalidRemoval { reason: String },

    /// Stored sections no longer form a single path. Indicates prior corruption.
    #[error("section invariant violated: {detail}")]
    InvariantViolation { detail: String },

    #[error("line {0} not found")]
    LineNotFound(LineId),

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("station name '{name}' is already registered")]
    DuplicateStationName { name: String },

    #[error("line name '{name}' is already registered")]
    DuplicateLineName { name: String },

    /// Names must contain at least one non-whitespace character.
    #[error("name must not be blank")]
    InvalidName,

    /// Station is still referenced by a section of the given line.
    #[error("station {station} is still used by line {line}")]
    StationInUse { station: StationId, line: LineId },
}

impl SubwayError {
    pub(crate) fn invalid_section(reason: impl Into<String>) -> Self {
        Self::InvalidSection {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_removal(reason: impl Into<String>) -> Self {
        Self::InvalidRemoval {
            reason: reason.into(),
        }
    }

    /// Build an invariant violation, logging it as a defect signal.
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        error!(%detail, "section invariant violated");
        Self::InvariantViolation { detail }
    }

    /// Whether the error was caused by the request rather than by the system.
    ///
    /// Outer layers map `true` to a client error and `false` to a server error.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}
