#![warn(clippy::all, missing_docs)]

//! Core domain logic for subway line management.
//!
//! This crate hosts the station and line models, the section chain
//! algorithms, configuration handling and snapshot persistence used by
//! the command line frontend.

pub mod config;
pub mod error;
pub mod line;
pub mod models;
pub mod registry;
pub mod request;
pub mod save;
pub mod section;
pub mod subway;

pub use crate::config::SubwayConfig;
pub use error::{Result, SubwayError};
pub use line::{Line, LineInfo};
pub use models::{Distance, LineId, Section, Station, StationId};
pub use registry::StationRegistry;
pub use request::{Direction, SectionRequest};
pub use save::{NetworkSnapshot, SnapshotStore};
pub use section::SectionSet;
pub use subway::{LineStations, Subway};
