//! Placement Store — the in-memory activity → slot mapping that is the
//! session's source of truth for what is on the grid.
//!
//! Non-overlap is enforced at `place` time only; a map loaded from storage
//! is adopted as-is and never self-healed.

#![allow(dead_code)]

use crate::models::schedule::{ActivityItem, PlacementMap, SlotId, Weekday};
use crate::scheduler::catalog::duration_of;
use crate::scheduler::grid::fits_in_day;
use crate::scheduler::overlap::has_overlap;

/// Why a placement was refused. A rejection is a normal outcome of the
/// drag flow, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    /// The target range collides with another placement on the same day.
    Overlap,
    /// The item would run past the grid's right edge (or start before it).
    OutOfGrid,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementStore {
    map: PlacementMap,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a persisted map verbatim, dangling entries included.
    pub fn from_map(map: PlacementMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &PlacementMap {
        &self.map
    }

    /// Anchors `activity_id` at `slot`, replacing any prior slot for the
    /// same id (a move is a single idempotent operation, never two entries).
    pub fn place(
        &mut self,
        catalog: &[ActivityItem],
        activity_id: &str,
        slot: SlotId,
    ) -> Result<(), PlacementRejection> {
        let duration = duration_of(catalog, activity_id);
        if !fits_in_day(slot.hour, duration) {
            return Err(PlacementRejection::OutOfGrid);
        }
        if has_overlap(
            slot.day,
            slot.hour,
            duration,
            Some(activity_id),
            &self.map,
            catalog,
        ) {
            return Err(PlacementRejection::Overlap);
        }
        self.map.insert(activity_id.to_string(), slot);
        Ok(())
    }

    /// Removes the placement for `activity_id`; no-op when absent.
    pub fn unplace(&mut self, activity_id: &str) -> bool {
        self.map.remove(activity_id).is_some()
    }

    pub fn slot_of(&self, activity_id: &str) -> Option<SlotId> {
        self.map.get(activity_id).copied()
    }

    /// The item *anchored* at `slot`. An item occupying but not starting at
    /// the slot does not resolve here.
    pub fn slot_contents<'a>(
        &self,
        catalog: &'a [ActivityItem],
        slot: SlotId,
    ) -> Option<&'a ActivityItem> {
        self.map
            .iter()
            .find(|(_, s)| **s == slot)
            .and_then(|(id, _)| catalog.iter().find(|item| item.id == *id))
    }

    /// Whether `hour` falls inside any placement's occupied range on `day`,
    /// anchor hour included. Used to render continuation cells.
    pub fn is_occupied(&self, catalog: &[ActivityItem], day: Weekday, hour: u8) -> bool {
        self.map
            .iter()
            .filter(|(_, slot)| slot.day == day)
            .any(|(id, slot)| {
                let start = slot.hour as f64;
                let h = hour as f64;
                h >= start && h < start + duration_of(catalog, id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::ActivityCategory;

    fn item(id: &str, duration: f64) -> ActivityItem {
        ActivityItem {
            id: id.to_string(),
            name: id.to_string(),
            duration_hours: duration,
            location: String::new(),
            category: ActivityCategory::Work,
        }
    }

    #[test]
    fn test_place_then_conflicting_place_is_rejected() {
        let catalog = vec![item("a", 2.0), item("b", 2.0)];
        let mut store = PlacementStore::new();

        store.place(&catalog, "a", SlotId::new(Weekday::Mon, 10)).unwrap();
        let err = store
            .place(&catalog, "b", SlotId::new(Weekday::Mon, 11))
            .unwrap_err();
        assert_eq!(err, PlacementRejection::Overlap);
        // The rejected item must not appear in the map.
        assert!(store.slot_of("b").is_none());
    }

    #[test]
    fn test_adjacent_place_succeeds() {
        let catalog = vec![item("a", 2.0), item("b", 1.0)];
        let mut store = PlacementStore::new();

        store.place(&catalog, "a", SlotId::new(Weekday::Mon, 10)).unwrap();
        store.place(&catalog, "b", SlotId::new(Weekday::Mon, 12)).unwrap();
        assert_eq!(store.slot_of("b"), Some(SlotId::new(Weekday::Mon, 12)));
    }

    #[test]
    fn test_replacing_own_slot_succeeds() {
        let catalog = vec![item("a", 2.0)];
        let mut store = PlacementStore::new();
        let slot = SlotId::new(Weekday::Wed, 14);

        store.place(&catalog, "a", slot).unwrap();
        store.place(&catalog, "a", slot).unwrap();
        assert_eq!(store.slot_of("a"), Some(slot));
    }

    #[test]
    fn test_move_keeps_single_entry() {
        let catalog = vec![item("a", 1.0)];
        let mut store = PlacementStore::new();

        store.place(&catalog, "a", SlotId::new(Weekday::Mon, 9)).unwrap();
        store.place(&catalog, "a", SlotId::new(Weekday::Thu, 15)).unwrap();

        assert_eq!(store.map().len(), 1);
        assert_eq!(store.slot_of("a"), Some(SlotId::new(Weekday::Thu, 15)));
    }

    #[test]
    fn test_place_past_right_edge_rejected() {
        let catalog = vec![item("a", 3.0)];
        let mut store = PlacementStore::new();
        let err = store
            .place(&catalog, "a", SlotId::new(Weekday::Sun, 20))
            .unwrap_err();
        assert_eq!(err, PlacementRejection::OutOfGrid);
    }

    #[test]
    fn test_unplace_is_noop_when_absent() {
        let mut store = PlacementStore::new();
        assert!(!store.unplace("nothing"));
    }

    #[test]
    fn test_slot_contents_resolves_anchor_only() {
        let catalog = vec![item("a", 3.0)];
        let mut store = PlacementStore::new();
        store.place(&catalog, "a", SlotId::new(Weekday::Tue, 10)).unwrap();

        assert_eq!(
            store
                .slot_contents(&catalog, SlotId::new(Weekday::Tue, 10))
                .map(|i| i.id.as_str()),
            Some("a")
        );
        // Occupied but not anchored:
        assert!(store
            .slot_contents(&catalog, SlotId::new(Weekday::Tue, 11))
            .is_none());
    }

    #[test]
    fn test_is_occupied_covers_continuation_hours() {
        let catalog = vec![item("a", 2.5)];
        let mut store = PlacementStore::new();
        store.place(&catalog, "a", SlotId::new(Weekday::Tue, 10)).unwrap();

        assert!(store.is_occupied(&catalog, Weekday::Tue, 10));
        assert!(store.is_occupied(&catalog, Weekday::Tue, 11));
        assert!(store.is_occupied(&catalog, Weekday::Tue, 12)); // half-hour tail
        assert!(!store.is_occupied(&catalog, Weekday::Tue, 13));
        assert!(!store.is_occupied(&catalog, Weekday::Wed, 10));
    }

    #[test]
    fn test_adopted_map_is_not_self_healed() {
        // Two overlapping entries loaded from storage stay as loaded.
        let catalog = vec![item("a", 2.0), item("b", 2.0)];
        let map: PlacementMap = [
            ("a".to_string(), SlotId::new(Weekday::Mon, 10)),
            ("b".to_string(), SlotId::new(Weekday::Mon, 11)),
        ]
        .into_iter()
        .collect();

        let store = PlacementStore::from_map(map);
        assert_eq!(store.map().len(), 2);
        let _ = catalog; // adoption does not consult the catalog
    }
}
