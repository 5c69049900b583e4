#![allow(missing_docs)]

//! Section requests that place a station relative to an anchor station.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SubwayError},
    models::{LineId, StationId},
};

/// Side of the anchor station on which a new station is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// New station sits above the anchor: `station -> base`.
    #[default]
    Up,
    /// New station sits below the anchor: `base -> station`.
    Down,
}

impl FromStr for Direction {
    type Err = SubwayError;

    /// Accepts `UP`, `DOWN` in any case; a blank value means [`Direction::Up`].
    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            other => Err(SubwayError::invalid_section(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = SubwayError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => "UP".to_string(),
            Direction::Down => "DOWN".to_string(),
        }
    }
}

/// Request to place `station` next to `base` on `line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequest {
    pub line: LineId,
    pub station: StationId,
    pub base: StationId,
    #[serde(default)]
    pub direction: Direction,
    pub distance: u32,
}

impl SectionRequest {
    /// Resolve the anchored request into `(up, down)` station ids.
    pub fn endpoints(&self) -> (StationId, StationId) {
        match self.direction {
            Direction::Up => (self.station, self.base),
            Direction::Down => (self.base, self.station),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directions_case_insensitively() -> Result<()> {
        assert_eq!("DOWN".parse::<Direction>()?, Direction::Down);
        assert_eq!("down".parse::<Direction>()?, Direction::Down);
        assert_eq!("Up".parse::<Direction>()?, Direction::Up);
        assert_eq!("".parse::<Direction>()?, Direction::Up);
        assert!(matches!(
            "SIDEWAYS".parse::<Direction>(),
            Err(SubwayError::InvalidSection { .. })
        ));
        Ok(())
    }

    #[test]
    fn direction_decides_endpoint_order() {
        let mut request = SectionRequest {
            line: LineId(1),
            station: StationId(3),
            base: StationId(1),
            direction: Direction::Down,
            distance: 1,
        };
        assert_eq!(request.endpoints(), (StationId(1), StationId(3)));
        request.direction = Direction::Up;
        assert_eq!(request.endpoints(), (StationId(3), StationId(1)));
    }

    #[test]
    fn missing_direction_deserializes_as_up() -> anyhow::Result<()> {
        let request: SectionRequest = serde_json::from_str(
            r#"{"line": 2, "station": 6, "base": 2, "distance": 1}"#,
        )?;
        assert_eq!(request.direction, Direction::Up);
        Ok(())
    }

    #[test]
    fn blank_and_lowercase_directions_deserialize() -> anyhow::Result<()> {
        let blank: SectionRequest = serde_json::from_str(
            r#"{"line": 2, "station": 6, "base": 2, "direction": "", "distance": 1}"#,
        )?;
        assert_eq!(blank.direction, Direction::Up);

        let lower: SectionRequest = serde_json::from_str(
            r#"{"line": 2, "station": 7, "base": 2, "direction": "down", "distance": 1}"#,
        )?;
        assert_eq!(lower.direction, Direction::Down);
        assert_eq!(serde_json::to_value(lower.direction)?, serde_json::json!("DOWN"));

        let unknown = serde_json::from_str::<SectionRequest>(
            r#"{"line": 2, "station": 7, "base": 2, "direction": "LEFT", "distance": 1}"#,
        );
        assert!(unknown.is_err());
        Ok(())
    }
}
