//! Overlap Validator — the pure interval test that gates every placement.
//!
//! Two placements on the same day conflict iff their half-open hour ranges
//! `[a, a+d_a)` and `[b, b+d_b)` intersect. Cross-day placements never
//! conflict. Dangling placement references (an id no longer in the catalog)
//! are assumed to span the default one hour instead of failing the check.

#![allow(dead_code)]

use crate::models::schedule::{ActivityItem, PlacementMap, Weekday};
use crate::scheduler::catalog::duration_of;

/// Returns true when placing `duration` hours at `(day, start_hour)` would
/// collide with any existing placement other than `excluding`.
///
/// `excluding` lets an item being re-placed skip its own current slot, so
/// dropping an item back where it already sits always succeeds.
pub fn has_overlap(
    day: Weekday,
    start_hour: u8,
    duration: f64,
    excluding: Option<&str>,
    placements: &PlacementMap,
    catalog: &[ActivityItem],
) -> bool {
    let a = start_hour as f64;
    let a_end = a + duration;

    placements
        .iter()
        .filter(|(id, _)| excluding != Some(id.as_str()))
        .filter(|(_, slot)| slot.day == day)
        .any(|(id, slot)| {
            let b = slot.hour as f64;
            let b_end = b + duration_of(catalog, id);
            a < b_end && b < a_end
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{ActivityCategory, SlotId};

    fn item(id: &str, duration: f64) -> ActivityItem {
        ActivityItem {
            id: id.to_string(),
            name: id.to_string(),
            duration_hours: duration,
            location: String::new(),
            category: ActivityCategory::Custom,
        }
    }

    fn placed(entries: &[(&str, Weekday, u8)]) -> PlacementMap {
        entries
            .iter()
            .map(|(id, day, hour)| (id.to_string(), SlotId::new(*day, *hour)))
            .collect()
    }

    #[test]
    fn test_two_hour_item_blocks_next_hour() {
        // [10,12) vs [11,13) overlap
        let catalog = vec![item("a", 2.0), item("b", 2.0)];
        let placements = placed(&[("a", Weekday::Mon, 10)]);
        assert!(has_overlap(Weekday::Mon, 11, 2.0, Some("b"), &placements, &catalog));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        // [10,12) vs [12,13) are disjoint
        let catalog = vec![item("a", 2.0), item("b", 1.0)];
        let placements = placed(&[("a", Weekday::Mon, 10)]);
        assert!(!has_overlap(Weekday::Mon, 12, 1.0, Some("b"), &placements, &catalog));
    }

    #[test]
    fn test_item_never_conflicts_with_its_own_slot() {
        let catalog = vec![item("a", 3.0)];
        let placements = placed(&[("a", Weekday::Fri, 9)]);
        assert!(!has_overlap(Weekday::Fri, 9, 3.0, Some("a"), &placements, &catalog));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let catalog = vec![item("a", 2.0), item("b", 3.0)];

        let with_a = placed(&[("a", Weekday::Tue, 10)]);
        let a_blocks_b = has_overlap(Weekday::Tue, 9, 3.0, Some("b"), &with_a, &catalog);

        let with_b = placed(&[("b", Weekday::Tue, 9)]);
        let b_blocks_a = has_overlap(Weekday::Tue, 10, 2.0, Some("a"), &with_b, &catalog);

        assert_eq!(a_blocks_b, b_blocks_a);
        assert!(a_blocks_b);
    }

    #[test]
    fn test_cross_day_placements_never_conflict() {
        let catalog = vec![item("a", 8.0), item("b", 8.0)];
        let placements = placed(&[("a", Weekday::Mon, 8)]);
        assert!(!has_overlap(Weekday::Tue, 8, 8.0, Some("b"), &placements, &catalog));
    }

    #[test]
    fn test_half_hour_durations_respected() {
        // [10, 10.5) vs [10.5, 11) are disjoint
        let catalog = vec![item("a", 0.5), item("b", 0.5)];
        let placements = placed(&[("a", Weekday::Wed, 10)]);
        assert!(!has_overlap(Weekday::Wed, 11, 0.5, Some("b"), &placements, &catalog));
    }

    #[test]
    fn test_dangling_reference_assumed_one_hour() {
        // "ghost" is placed but missing from the catalog: treated as 1h.
        let catalog = vec![item("b", 1.0)];
        let placements = placed(&[("ghost", Weekday::Thu, 10)]);
        assert!(has_overlap(Weekday::Thu, 10, 1.0, Some("b"), &placements, &catalog));
        assert!(!has_overlap(Weekday::Thu, 11, 1.0, Some("b"), &placements, &catalog));
    }

    #[test]
    fn test_no_exclusion_checks_everything() {
        let catalog = vec![item("a", 1.0)];
        let placements = placed(&[("a", Weekday::Mon, 10)]);
        assert!(has_overlap(Weekday::Mon, 10, 1.0, None, &placements, &catalog));
    }
}
