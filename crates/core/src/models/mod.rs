#![allow(missing_docs)]

//! Shared domain models.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubwayError};

/// Identifier of a registered station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

/// Identifier of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Strictly positive length of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(NonZeroU32);

impl Distance {
    /// Validate a raw distance, rejecting zero.
    pub fn new(value: u32) -> Result<Self> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| SubwayError::invalid_section("distance must be positive"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Remaining length when `self` is cut out of `whole`, if any remains.
    pub(crate) fn remainder_of(self, whole: Distance) -> Option<Distance> {
        whole
            .get()
            .checked_sub(self.get())
            .and_then(NonZeroU32::new)
            .map(Self)
    }

    pub(crate) fn checked_add(self, other: Distance) -> Option<Distance> {
        self.0.checked_add(other.get()).map(Self)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A named stop that sections refer to by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

/// Directed edge `up -> down` of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub up: StationId,
    pub down: StationId,
    pub distance: Distance,
}

impl Section {
    pub fn new(up: StationId, down: StationId, distance: Distance) -> Self {
        Self { up, down, distance }
    }
}

/// Trim a user supplied name, rejecting blank input.
pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SubwayError::InvalidName);
    }
    Ok(trimmed.to_string())
}
