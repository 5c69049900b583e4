#![allow(missing_docs)]

//! Per-line section storage, chain reconstruction and editing.
//!
//! A [`SectionSet`] keeps every section twice: keyed by its up station and
//! keyed by its down station. Because each key maps to a single neighbour,
//! no station can ever gain a second outgoing or incoming section. Whether
//! the remaining links form one path is checked by [`chain::build`].

pub mod chain;
pub mod editor;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SubwayError},
    models::{Distance, Section, StationId},
};

/// Directed, distance-weighted sections belonging to one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionSet {
    downward: BTreeMap<StationId, (StationId, Distance)>,
    upward: BTreeMap<StationId, (StationId, Distance)>,
}

impl SectionSet {
    /// Create an empty set, as owned by a freshly created line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect sections into a set, rejecting branches and duplicate edges.
    ///
    /// Connectivity is not checked here; run [`chain::build`] for that.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Result<Self> {
        let mut set = Self::new();
        for section in sections {
            set.link(section)?;
        }
        Ok(set)
    }

    /// Collect sections and confirm they form a single chain.
    pub fn validated(sections: impl IntoIterator<Item = Section>) -> Result<Self> {
        let set = Self::from_sections(sections)?;
        chain::build(&set)?;
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.downward.is_empty()
    }

    /// Number of sections in the set.
    pub fn len(&self) -> usize {
        self.downward.len()
    }

    /// Number of distinct stations touched by any section.
    pub fn station_count(&self) -> usize {
        let down_termini = self
            .upward
            .keys()
            .filter(|station| !self.downward.contains_key(station))
            .count();
        self.downward.len() + down_termini
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.downward.contains_key(&station) || self.upward.contains_key(&station)
    }

    /// Station directly below `station`, with the distance to it.
    pub fn next(&self, station: StationId) -> Option<(StationId, Distance)> {
        self.downward.get(&station).copied()
    }

    /// Station directly above `station`, with the distance from it.
    pub fn previous(&self, station: StationId) -> Option<(StationId, Distance)> {
        self.upward.get(&station).copied()
    }

    /// Sections keyed by up station id. Use [`chain::ordered_sections`] for line order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.downward
            .iter()
            .map(|(&up, &(down, distance))| Section::new(up, down, distance))
    }

    pub(crate) fn link(&mut self, section: Section) -> Result<()> {
        let Section { up, down, distance } = section;
        if up == down {
            return Err(SubwayError::invariant(format!(
                "section {up} -> {down} loops onto itself"
            )));
        }
        if let Some((existing, _)) = self.next(up) {
            return Err(SubwayError::invariant(format!(
                "station {up} already continues to {existing}"
            )));
        }
        if let Some((existing, _)) = self.previous(down) {
            return Err(SubwayError::invariant(format!(
                "station {down} is already reached from {existing}"
            )));
        }
        self.downward.insert(up, (down, distance));
        self.upward.insert(down, (up, distance));
        Ok(())
    }

    /// Drop the section leaving `up`, returning it if present.
    pub(crate) fn unlink(&mut self, up: StationId) -> Option<Section> {
        let (down, distance) = self.downward.remove(&up)?;
        self.upward.remove(&down);
        Some(Section::new(up, down, distance))
    }
}

impl TryFrom<Vec<Section>> for SectionSet {
    type Error = SubwayError;

    fn try_from(sections: Vec<Section>) -> Result<Self> {
        Self::from_sections(sections)
    }
}

impl From<SectionSet> for Vec<Section> {
    fn from(set: SectionSet) -> Self {
        set.sections().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(up: u64, down: u64, distance: u32) -> Section {
        Section::new(
            StationId(up),
            StationId(down),
            Distance::new(distance).expect("positive distance"),
        )
    }

    #[test]
    fn counts_stations_and_sections() -> Result<()> {
        let set = SectionSet::from_sections([section(1, 2, 3), section(2, 3, 4)])?;
        assert_eq!(set.len(), 2);
        assert_eq!(set.station_count(), 3);
        assert!(set.contains(StationId(3)));
        assert!(!set.contains(StationId(4)));
        assert_eq!(set.next(StationId(1)).map(|(down, _)| down), Some(StationId(2)));
        assert_eq!(set.previous(StationId(1)), None);
        Ok(())
    }

    #[test]
    fn rejects_branching_sections() {
        let branch = SectionSet::from_sections([section(1, 2, 3), section(1, 3, 4)]);
        assert!(matches!(branch, Err(SubwayError::InvariantViolation { .. })));

        let merge = SectionSet::from_sections([section(1, 3, 3), section(2, 3, 4)]);
        assert!(matches!(merge, Err(SubwayError::InvariantViolation { .. })));
    }

    #[test]
    fn rejects_duplicate_and_self_loops() {
        let duplicate = SectionSet::from_sections([section(1, 2, 3), section(1, 2, 3)]);
        assert!(duplicate.is_err());
        assert!(SectionSet::from_sections([section(5, 5, 1)]).is_err());
    }

    #[test]
    fn validated_rejects_disconnected_fragments() {
        let fragments = SectionSet::validated([section(1, 2, 3), section(7, 8, 4)]);
        assert!(matches!(
            fragments,
            Err(SubwayError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn serializes_as_section_list() -> anyhow::Result<()> {
        let set = SectionSet::from_sections([section(2, 3, 4), section(1, 2, 3)])?;
        let json = serde_json::to_value(&set)?;
        assert_eq!(
            json,
            serde_json::json!([
                {"up": 1, "down": 2, "distance": 3},
                {"up": 2, "down": 3, "distance": 4}
            ])
        );

        let restored: SectionSet = serde_json::from_value(json)?;
        assert_eq!(restored, set);

        let branching = serde_json::json!([
            {"up": 1, "down": 2, "distance": 3},
            {"up": 1, "down": 3, "distance": 4}
        ]);
        assert!(serde_json::from_value::<SectionSet>(branching).is_err());
        Ok(())
    }

    #[test]
    fn unlink_clears_both_directions() -> Result<()> {
        let mut set = SectionSet::from_sections([section(1, 2, 3)])?;
        assert_eq!(set.unlink(StationId(1)), Some(section(1, 2, 3)));
        assert!(set.is_empty());
        assert!(!set.contains(StationId(2)));
        assert_eq!(set.unlink(StationId(1)), None);
        Ok(())
    }
}
