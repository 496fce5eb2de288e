//! Drag-Interaction Controller — the `Idle ⇄ Dragging` state machine for a
//! single gesture. The placement map is untouched until the drop commits,
//! so a cancelled drag needs no rollback.

#![allow(dead_code)]

use crate::models::schedule::{ActivityItem, SlotId};
use crate::scheduler::placement::{PlacementRejection, PlacementStore};

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { activity_id: String },
}

/// Where a gesture was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The unplaced-items list; always accepts.
    Inbox,
    /// A grid cell; gated by the overlap validator.
    Slot(SlotId),
    /// Released outside any valid zone.
    None,
}

/// How a gesture ended. `Placed` and `ReturnedToInbox` are the committing
/// outcomes; everything else leaves the map untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Placed(SlotId),
    ReturnedToInbox,
    /// Drop discarded silently; the item snaps back.
    Rejected(PlacementRejection),
    Cancelled,
}

impl DragOutcome {
    /// True when the gesture mutated the placement map.
    pub fn committed(&self) -> bool {
        matches!(self, DragOutcome::Placed(_) | DragOutcome::ReturnedToInbox)
    }
}

#[derive(Debug, Default, Clone)]
pub struct DragController {
    state: DragState,
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragging_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { activity_id } => Some(activity_id),
            DragState::Idle => None,
        }
    }

    /// Begins a gesture. Returns false (and changes nothing) if one is
    /// already in flight; the interaction surface must not interleave two.
    pub fn drag_start(&mut self, activity_id: &str) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging {
            activity_id: activity_id.to_string(),
        };
        true
    }

    /// Ends the gesture, committing or discarding the drop. Always returns
    /// to `Idle`. Calling this while idle is a no-op cancel.
    pub fn drag_end(
        &mut self,
        catalog: &[ActivityItem],
        store: &mut PlacementStore,
        target: DropTarget,
    ) -> DragOutcome {
        let activity_id = match std::mem::take(&mut self.state) {
            DragState::Dragging { activity_id } => activity_id,
            DragState::Idle => return DragOutcome::Cancelled,
        };

        match target {
            DropTarget::Inbox => {
                store.unplace(&activity_id);
                DragOutcome::ReturnedToInbox
            }
            DropTarget::Slot(slot) => match store.place(catalog, &activity_id, slot) {
                Ok(()) => DragOutcome::Placed(slot),
                Err(rejection) => DragOutcome::Rejected(rejection),
            },
            DropTarget::None => DragOutcome::Cancelled,
        }
    }
}
