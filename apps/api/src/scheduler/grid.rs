//! Grid bounds and the two rendering projections: the 7×N week grid and
//! the inbox of unplaced items. No business logic lives here beyond these
//! projections.

#![allow(dead_code)]

use serde::Serialize;

use crate::models::schedule::{ActivityItem, PlacementMap, Weekday};
use crate::scheduler::catalog::{duration_of, find};

/// First visible hour row of the grid.
pub const GRID_START_HOUR: u8 = 8;
/// One past the last visible hour row.
pub const GRID_END_HOUR: u8 = 22;

/// Whether an item of `duration_hours` anchored at `hour` stays inside the
/// visible day (the right-edge invariant on placements).
pub fn fits_in_day(hour: u8, duration_hours: f64) -> bool {
    duration_hours > 0.0
        && hour >= GRID_START_HOUR
        && hour as f64 + duration_hours <= GRID_END_HOUR as f64
}

/// One cell of a day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellView {
    Empty,
    /// The starting cell of a placement. The name falls back to the raw id
    /// for dangling placements so the cell still renders.
    Anchor {
        activity_id: String,
        name: String,
        duration_hours: f64,
    },
    /// A cell occupied by an item anchored earlier the same day.
    Continuation { activity_id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
    pub day: Weekday,
    /// Cells for hours `GRID_START_HOUR..GRID_END_HOUR`, in order.
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub days: Vec<DayColumn>,
}

/// Projects the placement map onto the full week grid.
pub fn week_view(catalog: &[ActivityItem], placements: &PlacementMap) -> WeekView {
    let days = Weekday::ALL
        .iter()
        .map(|&day| DayColumn {
            day,
            cells: day_cells(day, catalog, placements),
        })
        .collect();
    WeekView { days }
}

fn day_cells(day: Weekday, catalog: &[ActivityItem], placements: &PlacementMap) -> Vec<CellView> {
    let rows = (GRID_END_HOUR - GRID_START_HOUR) as usize;
    let mut cells = vec![CellView::Empty; rows];

    for (id, slot) in placements.iter().filter(|(_, s)| s.day == day) {
        let duration = duration_of(catalog, id);
        let name = find(catalog, id)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| id.clone());

        let Some(anchor_row) = row_of(slot.hour) else {
            continue; // anchored outside the visible range; nothing to draw
        };
        cells[anchor_row] = CellView::Anchor {
            activity_id: id.clone(),
            name,
            duration_hours: duration,
        };

        // Fill the occupied rows after the anchor.
        let mut hour = slot.hour + 1;
        while (hour as f64) < slot.hour as f64 + duration {
            match row_of(hour) {
                Some(row) => {
                    cells[row] = CellView::Continuation {
                        activity_id: id.clone(),
                    }
                }
                None => break,
            }
            hour += 1;
        }
    }

    cells
}

fn row_of(hour: u8) -> Option<usize> {
    if (GRID_START_HOUR..GRID_END_HOUR).contains(&hour) {
        Some((hour - GRID_START_HOUR) as usize)
    } else {
        None
    }
}

/// The inbox: every catalog item without a placement, in catalog order.
pub fn inbox_items<'a>(
    catalog: &'a [ActivityItem],
    placements: &PlacementMap,
) -> Vec<&'a ActivityItem> {
    catalog
        .iter()
        .filter(|item| !placements.contains_key(&item.id))
        .collect()
}
