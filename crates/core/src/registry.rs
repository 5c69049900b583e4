#![allow(missing_docs)]

//! Station identity store.

use std::collections::BTreeMap;

use tracing::info;

use crate::{
    error::{Result, SubwayError},
    models::{normalize_name, Station, StationId},
};

/// Registered stations keyed by id, with unique names.
#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: BTreeMap<StationId, Station>,
    next_id: u64,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted stations, keeping their ids.
    pub fn from_stations(stations: impl IntoIterator<Item = Station>) -> Result<Self> {
        let mut registry = Self::new();
        for station in stations {
            let name = normalize_name(&station.name)?;
            registry.ensure_unique(&name, None)?;
            if registry.exists(station.id) {
                return Err(SubwayError::invariant(format!(
                    "station id {} is stored twice",
                    station.id
                )));
            }
            registry.next_id = registry.next_id.max(station.id.0);
            registry
                .stations
                .insert(station.id, Station { id: station.id, name });
        }
        Ok(registry)
    }

    pub fn exists(&self, id: StationId) -> bool {
        self.stations.contains_key(&id)
    }

    pub fn get(&self, id: StationId) -> Result<&Station> {
        self.stations
            .get(&id)
            .ok_or(SubwayError::StationNotFound(id))
    }

    pub fn require(&self, id: StationId) -> Result<()> {
        self.get(id).map(|_| ())
    }

    /// All stations in id order.
    pub fn all(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Register a new station and return its id.
    pub fn create(&mut self, name: &str) -> Result<StationId> {
        let name = normalize_name(name)?;
        self.ensure_unique(&name, None)?;
        self.next_id += 1;
        let id = StationId(self.next_id);
        info!(%id, %name, "registered station");
        self.stations.insert(id, Station { id, name });
        Ok(id)
    }

    pub fn rename(&mut self, id: StationId, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        self.ensure_unique(&name, Some(id))?;
        let station = self
            .stations
            .get_mut(&id)
            .ok_or(SubwayError::StationNotFound(id))?;
        station.name = name;
        Ok(())
    }

    /// Forget a station. Reference checks are the caller's responsibility.
    pub(crate) fn remove(&mut self, id: StationId) -> Result<Station> {
        let station = self
            .stations
            .remove(&id)
            .ok_or(SubwayError::StationNotFound(id))?;
        info!(%id, name = %station.name, "removed station");
        Ok(station)
    }

    fn ensure_unique(&self, name: &str, except: Option<StationId>) -> Result<()> {
        let taken = self
            .stations
            .values()
            .any(|station| station.name == name && Some(station.id) != except);
        if taken {
            return Err(SubwayError::DuplicateStationName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
