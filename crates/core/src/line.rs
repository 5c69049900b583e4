#![allow(missing_docs)]

//! Line aggregate: metadata plus the sections it exclusively owns.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Distance, LineId, Section, StationId},
    section::{chain, editor, SectionSet},
};

/// Public metadata of a line, without its sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    pub id: LineId,
    pub name: String,
    pub color: String,
}

/// A named, colored line and its chain of sections.
#[derive(Debug, Clone)]
pub struct Line {
    info: LineInfo,
    sections: SectionSet,
}

impl Line {
    /// Create a line without any sections.
    pub fn new(id: LineId, name: String, color: String) -> Self {
        Self {
            info: LineInfo { id, name, color },
            sections: SectionSet::new(),
        }
    }

    pub fn id(&self) -> LineId {
        self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &LineInfo {
        &self.info
    }

    pub fn sections(&self) -> &SectionSet {
        &self.sections
    }

    /// Station ids from the up terminus to the down terminus.
    pub fn current_order(&self) -> Result<Vec<StationId>> {
        chain::build(&self.sections)
    }

    pub fn ordered_sections(&self) -> Result<Vec<Section>> {
        chain::ordered_sections(&self.sections)
    }

    /// Sum of every section distance along the line.
    pub fn total_distance(&self) -> Result<u64> {
        Ok(self
            .ordered_sections()?
            .iter()
            .map(|section| u64::from(section.distance.get()))
            .sum())
    }

    pub fn insert_section(
        &mut self,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<()> {
        self.sections = editor::insert(&self.sections, up, down, distance)?;
        Ok(())
    }

    pub fn remove_station(&mut self, station: StationId) -> Result<()> {
        self.sections = editor::remove_station(&self.sections, station)?;
        Ok(())
    }

    /// Replace the sections wholesale. The caller validates the new set.
    pub(crate) fn replace_sections(&mut self, sections: SectionSet) {
        self.sections = sections;
    }

    pub(crate) fn rename(&mut self, name: String, color: String) {
        self.info.name = name;
        self.info.color = color;
    }
}
