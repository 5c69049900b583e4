#![allow(missing_docs)]

//! Thread-safe facade over the station registry and every line.
//!
//! Each line sits behind its own [`RwLock`], so edits on different lines never
//! contend. Locks are always taken in the order registry, line table, line.
//! Section edits release the line table before locking the registry, so they
//! only ever hold the registry and their own line.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{Result, SubwayError},
    line::{Line, LineInfo},
    models::{normalize_name, Distance, LineId, Section, Station, StationId},
    registry::StationRegistry,
    request::SectionRequest,
    save::{LineRecord, NetworkSnapshot},
    section::{chain, SectionSet},
};

/// A line together with its stations in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineStations {
    pub line: LineInfo,
    pub stations: Vec<Station>,
}

#[derive(Debug, Default)]
struct LineTable {
    lines: BTreeMap<LineId, Arc<RwLock<Line>>>,
    next_id: u64,
}

/// Stations and lines of one subway network.
#[derive(Debug, Default)]
pub struct Subway {
    stations: RwLock<StationRegistry>,
    lines: RwLock<LineTable>,
}

impl Subway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a network from a snapshot, re-validating every line.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        let registry = StationRegistry::from_stations(snapshot.stations)?;
        let mut table = LineTable::default();
        for record in snapshot.lines {
            if table.lines.contains_key(&record.id) {
                return Err(SubwayError::invariant(format!(
                    "line id {} is stored twice",
                    record.id
                )));
            }
            let name = normalize_name(&record.name)?;
            if table.lines.values().any(|line| line.read().name() == name) {
                return Err(SubwayError::DuplicateLineName { name });
            }
            let sections = SectionSet::validated(record.sections)?;
            for section in sections.sections() {
                registry.require(section.up)?;
                registry.require(section.down)?;
            }
            let mut line = Line::new(record.id, name, record.color);
            line.replace_sections(sections);
            table.next_id = table.next_id.max(record.id.0);
            table.lines.insert(record.id, Arc::new(RwLock::new(line)));
        }
        info!(
            stations = registry.all().count(),
            lines = table.lines.len(),
            "restored subway network"
        );
        Ok(Self {
            stations: RwLock::new(registry),
            lines: RwLock::new(table),
        })
    }

    /// Capture the current stations and lines.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let stations = self.stations.read();
        let table = self.lines.read();
        let lines = table
            .lines
            .values()
            .map(|line| {
                let line = line.read();
                LineRecord {
                    id: line.id(),
                    name: line.info().name.clone(),
                    color: line.info().color.clone(),
                    sections: line.sections().sections().collect(),
                }
            })
            .collect();
        NetworkSnapshot {
            stations: stations.all().cloned().collect(),
            lines,
            ..NetworkSnapshot::default()
        }
    }

    pub fn create_station(&self, name: &str) -> Result<Station> {
        let mut stations = self.stations.write();
        let id = stations.create(name)?;
        stations.get(id).cloned()
    }

    pub fn station(&self, id: StationId) -> Result<Station> {
        self.stations.read().get(id).cloned()
    }

    pub fn stations(&self) -> Vec<Station> {
        self.stations.read().all().cloned().collect()
    }

    pub fn rename_station(&self, id: StationId, name: &str) -> Result<()> {
        self.stations.write().rename(id, name)
    }

    /// Delete a station that no line references.
    pub fn delete_station(&self, id: StationId) -> Result<()> {
        let mut stations = self.stations.write();
        stations.require(id)?;
        let table = self.lines.read();
        for line in table.lines.values() {
            let line = line.read();
            if line.sections().contains(id) {
                return Err(SubwayError::StationInUse {
                    station: id,
                    line: line.id(),
                });
            }
        }
        stations.remove(id)?;
        Ok(())
    }

    pub fn create_line(&self, name: &str, color: &str) -> Result<LineInfo> {
        let name = normalize_name(name)?;
        let mut table = self.lines.write();
        ensure_unique_line_name(&table, &name, None)?;
        table.next_id += 1;
        let id = LineId(table.next_id);
        let line = Line::new(id, name, color.trim().to_string());
        let info = line.info().clone();
        table.lines.insert(id, Arc::new(RwLock::new(line)));
        info!(%id, name = %info.name, "created line");
        Ok(info)
    }

    pub fn line(&self, id: LineId) -> Result<LineInfo> {
        Ok(self.line_handle(id)?.read().info().clone())
    }

    pub fn lines(&self) -> Vec<LineInfo> {
        let table = self.lines.read();
        table
            .lines
            .values()
            .map(|line| line.read().info().clone())
            .collect()
    }

    pub fn update_line(&self, id: LineId, name: &str, color: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let table = self.lines.write();
        ensure_unique_line_name(&table, &name, Some(id))?;
        let line = table.lines.get(&id).ok_or(SubwayError::LineNotFound(id))?;
        line.write().rename(name, color.trim().to_string());
        Ok(())
    }

    /// Delete a line along with all of its sections.
    pub fn delete_line(&self, id: LineId) -> Result<()> {
        let mut table = self.lines.write();
        table
            .lines
            .remove(&id)
            .ok_or(SubwayError::LineNotFound(id))?;
        info!(%id, "deleted line");
        Ok(())
    }

    /// Add the section `up -> down` to a line.
    pub fn insert_section(
        &self,
        line: LineId,
        up: StationId,
        down: StationId,
        distance: u32,
    ) -> Result<()> {
        let distance = Distance::new(distance)?;
        let handle = self.line_handle(line)?;
        let stations = self.stations.read();
        stations.require(up)?;
        stations.require(down)?;
        handle.write().insert_section(up, down, distance)?;
        debug!(%line, %up, %down, %distance, "inserted section");
        Ok(())
    }

    /// Place a station next to an anchor station, as described by `request`.
    pub fn place_section(&self, request: &SectionRequest) -> Result<()> {
        let (up, down) = request.endpoints();
        self.insert_section(request.line, up, down, request.distance)
    }

    pub fn remove_station(&self, line: LineId, station: StationId) -> Result<()> {
        let handle = self.line_handle(line)?;
        let stations = self.stations.read();
        stations.require(station)?;
        handle.write().remove_station(station)?;
        debug!(%line, %station, "removed station from line");
        Ok(())
    }

    pub fn ordered_station_ids(&self, line: LineId) -> Result<Vec<StationId>> {
        self.line_handle(line)?.read().current_order()
    }

    /// Stations of a line in travel order. A line without sections yields none.
    pub fn ordered_stations(&self, line: LineId) -> Result<Vec<Station>> {
        let handle = self.line_handle(line)?;
        let stations = self.stations.read();
        let order = handle.read().current_order()?;
        resolve(&stations, order)
    }

    pub fn ordered_sections(&self, line: LineId) -> Result<Vec<Section>> {
        self.line_handle(line)?.read().ordered_sections()
    }

    pub fn total_distance(&self, line: LineId) -> Result<u64> {
        self.line_handle(line)?.read().total_distance()
    }

    /// Every line in id order with its ordered stations.
    pub fn network_overview(&self) -> Result<Vec<LineStations>> {
        let stations = self.stations.read();
        let table = self.lines.read();
        table
            .lines
            .values()
            .map(|line| {
                let line = line.read();
                Ok(LineStations {
                    line: line.info().clone(),
                    stations: resolve(&stations, line.current_order()?)?,
                })
            })
            .collect()
    }

    /// Current sections of a line.
    pub fn load_sections(&self, line: LineId) -> Result<SectionSet> {
        Ok(self.line_handle(line)?.read().sections().clone())
    }

    /// Replace the sections of a line after validating them.
    pub fn save_sections(&self, line: LineId, sections: SectionSet) -> Result<()> {
        let handle = self.line_handle(line)?;
        let stations = self.stations.read();
        for station in chain::build(&sections)? {
            stations.require(station)?;
        }
        handle.write().replace_sections(sections);
        Ok(())
    }

    fn line_handle(&self, id: LineId) -> Result<Arc<RwLock<Line>>> {
        self.lines
            .read()
            .lines
            .get(&id)
            .cloned()
            .ok_or(SubwayError::LineNotFound(id))
    }
}

fn ensure_unique_line_name(table: &LineTable, name: &str, except: Option<LineId>) -> Result<()> {
    let taken = table.lines.values().any(|line| {
        let line = line.read();
        line.name() == name && Some(line.id()) != except
    });
    if taken {
        return Err(SubwayError::DuplicateLineName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn resolve(stations: &StationRegistry, order: Vec<StationId>) -> Result<Vec<Station>> {
    order
        .into_iter()
        .map(|id| stations.get(id).cloned())
        .collect()
}
