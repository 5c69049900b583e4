//! Snapshot persistence for the whole network.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::SubwayError,
    models::{LineId, Section, Station},
    section::SectionSet,
};

/// Default file name of the snapshot inside the data directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "network.json";

/// Persisted form of a line and its sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    /// Identifier of the line.
    pub id: LineId,
    /// Unique line name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Sections in no particular order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Serialized representation of the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Timestamp when the snapshot was last written.
    pub saved_at: DateTime<Utc>,
    /// Registered stations.
    #[serde(default)]
    pub stations: Vec<Station>,
    /// Lines with their sections.
    #[serde(default)]
    pub lines: Vec<LineRecord>,
}

impl Default for NetworkSnapshot {
    fn default() -> Self {
        Self {
            saved_at: Utc::now(),
            stations: Vec::new(),
            lines: Vec::new(),
        }
    }
}

/// Reads and writes a [`NetworkSnapshot`] as pretty-printed JSON.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, returning an empty network when none was saved yet.
    pub fn load(&self) -> Result<NetworkSnapshot> {
        if !self.path.exists() {
            debug!("no snapshot at {}, starting empty", self.path.display());
            return Ok(NetworkSnapshot::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(snapshot)
    }

    /// Write the snapshot, stamping it with the current time.
    pub fn save(&self, snapshot: &mut NetworkSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        snapshot.saved_at = Utc::now();
        let serialised = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Load the stored sections of one line, checking they still form a chain.
    pub fn load_sections(&self, line: LineId) -> Result<SectionSet> {
        let snapshot = self.load()?;
        let record = snapshot
            .lines
            .into_iter()
            .find(|record| record.id == line)
            .ok_or(SubwayError::LineNotFound(line))?;
        match SectionSet::validated(record.sections) {
            Ok(sections) => Ok(sections),
            Err(err) => {
                warn!("Stored sections of line {line} are corrupt: {err}");
                Err(err.into())
            }
        }
    }

    /// Replace the stored sections of one line.
    pub fn save_sections(&self, line: LineId, sections: &SectionSet) -> Result<()> {
        let mut snapshot = self.load()?;
        let record = snapshot
            .lines
            .iter_mut()
            .find(|record| record.id == line)
            .ok_or(SubwayError::LineNotFound(line))?;
        record.sections = sections.sections().collect();
        self.save(&mut snapshot)
    }
}
