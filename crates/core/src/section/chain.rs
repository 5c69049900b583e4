//! Reconstruction of a line's station order from its sections.

use std::collections::HashSet;

use super::SectionSet;
use crate::{
    error::{Result, SubwayError},
    models::{Section, StationId},
};

/// Order the stations of `sections` from the up terminus to the down terminus.
///
/// An empty set yields an empty order. Fails with
/// [`SubwayError::InvariantViolation`] when the sections do not form exactly
/// one simple path.
pub fn build(sections: &SectionSet) -> Result<Vec<StationId>> {
    if sections.is_empty() {
        return Ok(Vec::new());
    }

    let head = up_terminus(sections)?;
    let expected = sections.station_count();
    let mut order = Vec::with_capacity(expected);
    let mut visited = HashSet::with_capacity(expected);
    let mut current = head;
    loop {
        if !visited.insert(current) {
            return Err(SubwayError::invariant(format!(
                "station {current} is visited twice starting from {head}"
            )));
        }
        order.push(current);
        match sections.next(current) {
            Some((down, _)) => current = down,
            None => break,
        }
    }

    if order.len() != expected {
        return Err(SubwayError::invariant(format!(
            "chain from {head} reaches {} of {expected} stations",
            order.len()
        )));
    }
    Ok(order)
}

/// Sections in travel order, starting at the up terminus.
pub fn ordered_sections(sections: &SectionSet) -> Result<Vec<Section>> {
    let order = build(sections)?;
    order
        .windows(2)
        .map(|pair| {
            sections
                .next(pair[0])
                .map(|(down, distance)| Section::new(pair[0], down, distance))
                .ok_or_else(|| SubwayError::invariant(format!("station {} lost its section", pair[0])))
        })
        .collect()
}

fn up_terminus(sections: &SectionSet) -> Result<StationId> {
    let mut heads = sections
        .sections()
        .map(|section| section.up)
        .filter(|&station| sections.previous(station).is_none());

    let head = heads
        .next()
        .ok_or_else(|| SubwayError::invariant("no station without an incoming section"))?;
    if let Some(other) = heads.next() {
        return Err(SubwayError::invariant(format!(
            "stations {head} and {other} both start the line"
        )));
    }
    Ok(head)
}
