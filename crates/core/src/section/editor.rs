#![allow(missing_docs)]

//! Insertion and removal of sections while keeping a single chain.
//!
//! Both operations work on a copy of the set and validate the result with
//! [`chain::build`] before handing it back, so a caller either receives a
//! well-formed set or an error and its original set untouched.

use tracing::debug;

use super::{chain, SectionSet};
use crate::{
    error::{Result, SubwayError},
    models::{Distance, Section, StationId},
};

/// Add the section `up -> down`, extending or splitting the existing chain.
///
/// The first section of a line may join any two stations. Afterwards exactly
/// one endpoint must already be on the line:
/// - `up` is the down terminus, or `down` is the up terminus: the chain grows.
/// - `up` already has a section `up -> x`: it is split into `up -> down -> x`.
/// - `down` already has a section `x -> down`: it is split into `x -> up -> down`.
///
/// A split requires `distance` to be strictly shorter than the section it cuts.
pub fn insert(
    sections: &SectionSet,
    up: StationId,
    down: StationId,
    distance: Distance,
) -> Result<SectionSet> {
    if up == down {
        return Err(SubwayError::invalid_section(format!(
            "section must join two different stations, got {up} twice"
        )));
    }

    let mut next = sections.clone();
    if sections.is_empty() {
        next.link(Section::new(up, down, distance))?;
        debug!(%up, %down, %distance, "first section of line");
        return validated(next);
    }

    match (sections.contains(up), sections.contains(down)) {
        (true, true) => {
            return Err(SubwayError::invalid_section(format!(
                "stations {up} and {down} are both already on the line"
            )));
        }
        (false, false) => {
            return Err(SubwayError::invalid_section(format!(
                "neither {up} nor {down} is on the line"
            )));
        }
        (true, false) => match sections.next(up) {
            None => {
                next.link(Section::new(up, down, distance))?;
                debug!(%up, %down, %distance, "extended line downward");
            }
            Some((old_down, old_distance)) => {
                let rest = split_remainder(distance, old_distance)?;
                next.unlink(up);
                next.link(Section::new(up, down, distance))?;
                next.link(Section::new(down, old_down, rest))?;
                debug!(%up, %down, %old_down, %distance, %rest, "split section below shared up station");
            }
        },
        (false, true) => match sections.previous(down) {
            None => {
                next.link(Section::new(up, down, distance))?;
                debug!(%up, %down, %distance, "extended line upward");
            }
            Some((old_up, old_distance)) => {
                let rest = split_remainder(distance, old_distance)?;
                next.unlink(old_up);
                next.link(Section::new(old_up, up, rest))?;
                next.link(Section::new(up, down, distance))?;
                debug!(%old_up, %up, %down, %distance, %rest, "split section above shared down station");
            }
        },
    }

    validated(next)
}

/// Detach `station` from the line, merging its neighbours when it is interior.
///
/// Removing either endpoint of a single-section line empties the set.
pub fn remove_station(sections: &SectionSet, station: StationId) -> Result<SectionSet> {
    if sections.is_empty() {
        return Err(SubwayError::invalid_removal("line has no sections"));
    }
    if !sections.contains(station) {
        return Err(SubwayError::invalid_removal(format!(
            "station {station} is not on the line"
        )));
    }

    let mut next = sections.clone();
    match (sections.previous(station), sections.next(station)) {
        (Some((up, to_station)), Some((down, from_station))) => {
            let merged = to_station.checked_add(from_station).ok_or_else(|| {
                SubwayError::invalid_removal(format!(
                    "merged distance {to_station} + {from_station} overflows"
                ))
            })?;
            next.unlink(up);
            next.unlink(station);
            next.link(Section::new(up, down, merged))?;
            debug!(%station, %up, %down, %merged, "merged sections around removed station");
        }
        (Some((up, _)), None) => {
            next.unlink(up);
            debug!(%station, "removed down terminus");
        }
        (None, Some(_)) => {
            next.unlink(station);
            debug!(%station, "removed up terminus");
        }
        (None, None) => {
            return Err(SubwayError::invariant(format!(
                "station {station} is on the line without any section"
            )));
        }
    }

    validated(next)
}

fn split_remainder(distance: Distance, existing: Distance) -> Result<Distance> {
    distance.remainder_of(existing).ok_or_else(|| {
        SubwayError::invalid_section(format!(
            "distance {distance} must be shorter than the existing section of {existing}"
        ))
    })
}

fn validated(sections: SectionSet) -> Result<SectionSet> {
    chain::build(&sections)?;
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: u32) -> Distance {
        Distance::new(value).expect("positive distance")
    }

    fn s(id: u64) -> StationId {
        StationId(id)
    }

    fn line(edges: &[(u64, u64, u32)]) -> SectionSet {
        edges.iter().fold(SectionSet::new(), |set, &(up, down, distance)| {
            insert(&set, s(up), s(down), d(distance)).expect("valid insert")
        })
    }

    fn order(sections: &SectionSet) -> Vec<u64> {
        chain::build(sections)
            .expect("valid chain")
            .into_iter()
            .map(|station| station.0)
            .collect()
    }

    fn distances(sections: &SectionSet) -> Vec<u32> {
        chain::ordered_sections(sections)
            .expect("valid chain")
            .iter()
            .map(|section| section.distance.get())
            .collect()
    }

    #[test]
    fn first_section_joins_any_two_stations() -> Result<()> {
        let sections = insert(&SectionSet::new(), s(7), s(3), d(5))?;
        assert_eq!(order(&sections), vec![7, 3]);
        assert_eq!(distances(&sections), vec![5]);
        Ok(())
    }

    #[test]
    fn extends_at_both_ends() -> Result<()> {
        let sections = line(&[(2, 3, 5)]);
        let sections = insert(&sections, s(3), s(4), d(6))?;
        let sections = insert(&sections, s(1), s(2), d(4))?;
        assert_eq!(order(&sections), vec![1, 2, 3, 4]);
        assert_eq!(distances(&sections), vec![4, 5, 6]);
        Ok(())
    }

    #[test]
    fn splits_section_sharing_up_station() -> Result<()> {
        let sections = line(&[(1, 3, 10)]);
        let sections = insert(&sections, s(1), s(2), d(4))?;
        assert_eq!(order(&sections), vec![1, 2, 3]);
        assert_eq!(distances(&sections), vec![4, 6]);
        Ok(())
    }

    #[test]
    fn splits_section_sharing_down_station() -> Result<()> {
        let sections = line(&[(1, 3, 10)]);
        let sections = insert(&sections, s(2), s(3), d(3))?;
        assert_eq!(order(&sections), vec![1, 2, 3]);
        assert_eq!(distances(&sections), vec![7, 3]);
        Ok(())
    }

    #[test]
    fn split_must_be_shorter_than_existing_section() {
        let sections = line(&[(1, 3, 10)]);
        for distance in [10, 11] {
            assert!(matches!(
                insert(&sections, s(1), s(2), d(distance)),
                Err(SubwayError::InvalidSection { .. })
            ));
            assert!(matches!(
                insert(&sections, s(2), s(3), d(distance)),
                Err(SubwayError::InvalidSection { .. })
            ));
        }
    }

    #[test]
    fn rejects_sections_with_both_or_neither_station_present() {
        let sections = line(&[(1, 2, 5), (2, 3, 5)]);
        let cases = [(1, 3), (3, 1), (1, 2), (2, 1), (8, 9)];
        for (up, down) in cases {
            assert!(
                matches!(
                    insert(&sections, s(up), s(down), d(1)),
                    Err(SubwayError::InvalidSection { .. })
                ),
                "{up} -> {down} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_self_loop() {
        assert!(matches!(
            insert(&SectionSet::new(), s(1), s(1), d(1)),
            Err(SubwayError::InvalidSection { .. })
        ));
    }

    #[test]
    fn failed_insert_leaves_original_untouched() {
        let sections = line(&[(1, 3, 10)]);
        let before = sections.clone();
        assert!(insert(&sections, s(1), s(2), d(12)).is_err());
        assert_eq!(sections, before);
    }

    #[test]
    fn anchored_splits_build_the_expected_line() {
        let sections = line(&[(1, 2, 4), (1, 3, 1), (3, 4, 1), (4, 5, 1)]);
        assert_eq!(order(&sections), vec![1, 3, 4, 5, 2]);
        assert_eq!(distances(&sections), vec![1, 1, 1, 1]);
    }

    #[test]
    fn removing_either_end_of_single_section_empties_line() -> Result<()> {
        let sections = line(&[(1, 2, 5)]);
        assert!(remove_station(&sections, s(1))?.is_empty());
        assert!(remove_station(&sections, s(2))?.is_empty());
        Ok(())
    }

    #[test]
    fn removing_terminus_drops_its_section() -> Result<()> {
        let sections = line(&[(1, 2, 5), (2, 3, 6)]);
        let without_head = remove_station(&sections, s(1))?;
        assert_eq!(order(&without_head), vec![2, 3]);
        let without_tail = remove_station(&sections, s(3))?;
        assert_eq!(order(&without_tail), vec![1, 2]);
        assert_eq!(distances(&without_tail), vec![5]);
        Ok(())
    }

    #[test]
    fn removing_interior_station_merges_distances() -> Result<()> {
        let sections = line(&[(1, 2, 5), (2, 3, 6), (3, 4, 7)]);
        let merged = remove_station(&sections, s(2))?;
        assert_eq!(order(&merged), vec![1, 3, 4]);
        assert_eq!(distances(&merged), vec![11, 7]);
        Ok(())
    }

    #[test]
    fn rejects_removal_from_empty_line_or_of_unknown_station() {
        assert!(matches!(
            remove_station(&SectionSet::new(), s(1)),
            Err(SubwayError::InvalidRemoval { .. })
        ));
        let sections = line(&[(1, 2, 5)]);
        assert!(matches!(
            remove_station(&sections, s(9)),
            Err(SubwayError::InvalidRemoval { .. })
        ));
    }

    #[test]
    fn merge_overflow_is_rejected() {
        let sections = line(&[(1, 2, u32::MAX), (2, 3, 1)]);
        assert!(matches!(
            remove_station(&sections, s(2)),
            Err(SubwayError::InvalidRemoval { .. })
        ));
    }
}
