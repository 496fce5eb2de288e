//! Activity Catalog Builder — expands stored preferences into the flat list
//! of schedulable items, then appends the user's own tasks.
//!
//! Generation is a pure function of its inputs and must emit identical ids
//! for identical inputs: placements reference items by id, so an unstable
//! id scheme silently corrupts the stored schedule. Hobby ids therefore
//! hash the hobby *name* rather than its list position — reordering the
//! hobby list keeps every placement valid.

#![allow(dead_code)]

use std::collections::HashMap;

use crate::models::schedule::{ActivityCategory, ActivityItem, CustomTask};
use crate::models::user::Preferences;

/// Work is emitted in greedy fixed-size blocks; the last block may be shorter.
pub const WORK_BLOCK_HOURS: f64 = 4.0;

/// Substituted wherever a duration is missing or unusable (including
/// dangling placement references, see the overlap validator).
pub const DEFAULT_DURATION_HOURS: f64 = 1.0;

/// Hard ceiling on any weekly time budget. Stored preferences arrive as
/// arbitrary JSON, so generation must stay bounded whatever they contain.
pub const WEEK_HOURS: f64 = 24.0 * 7.0;

const WORK_LOCATION_FALLBACK: &str = "Office";

/// Builds the full catalog: hobby instances, work blocks, then the user's
/// custom tasks verbatim. Pure; re-invoked whenever preferences or the
/// custom task list change.
pub fn build_catalog(prefs: &Preferences, custom_tasks: &[CustomTask]) -> Vec<ActivityItem> {
    let mut items = Vec::new();

    // One item per hobby occurrence. Instance counters are kept per hobby
    // name so duplicate names still get distinct ids.
    let mut instance_counts: HashMap<String, usize> = HashMap::new();
    for hobby in &prefs.hobbies {
        let name = hobby.name.trim();
        if name.is_empty() {
            continue;
        }

        let duration = hobby
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(sanitize_duration)
            .unwrap_or(DEFAULT_DURATION_HOURS)
            .min(WEEK_HOURS);
        // No single hobby can occupy more than the week it is scheduled into.
        let max_instances = ((WEEK_HOURS / duration).floor() as i64).max(1);
        let frequency = hobby
            .frequency
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64)
            .unwrap_or(1)
            .clamp(1, max_instances);

        let counter = instance_counts.entry(name.to_string()).or_insert(0);
        for _ in 0..frequency {
            items.push(ActivityItem {
                id: hobby_instance_id(name, *counter),
                name: name.to_string(),
                duration_hours: duration,
                location: hobby.location.trim().to_string(),
                category: ActivityCategory::Hobby,
            });
            *counter += 1;
        }
    }

    // Greedy work blocks until the weekly budget is exhausted.
    let work_location = match prefs.location.trim() {
        "" => WORK_LOCATION_FALLBACK.to_string(),
        loc => loc.to_string(),
    };
    let mut remaining_half_hours = to_half_hours(prefs.work_hours);
    let block_half_hours = to_half_hours(WORK_BLOCK_HOURS);
    let mut block_index = 0usize;
    while remaining_half_hours > 0 {
        let take = remaining_half_hours.min(block_half_hours);
        items.push(ActivityItem {
            id: format!("work-{block_index}"),
            name: "Work block".to_string(),
            duration_hours: take as f64 / 2.0,
            location: work_location.clone(),
            category: ActivityCategory::Work,
        });
        remaining_half_hours -= take;
        block_index += 1;
    }

    // Custom tasks are first-class records; append them as-is.
    for task in custom_tasks {
        items.push(ActivityItem {
            id: task.id.to_string(),
            name: task.name.clone(),
            duration_hours: task.duration_hours,
            location: task.location.clone(),
            category: ActivityCategory::Custom,
        });
    }

    items
}

/// Content-stable id for the `instance`-th occurrence of a hobby.
pub fn hobby_instance_id(name: &str, instance: usize) -> String {
    let digest = blake3::hash(name.trim().to_lowercase().as_bytes());
    format!("hobby-{}-{instance}", hex::encode(&digest.as_bytes()[..4]))
}

/// Looks an activity up by id.
pub fn find<'a>(catalog: &'a [ActivityItem], id: &str) -> Option<&'a ActivityItem> {
    catalog.iter().find(|item| item.id == id)
}

/// Duration of an activity, defaulting for dangling references.
pub fn duration_of(catalog: &[ActivityItem], id: &str) -> f64 {
    find(catalog, id)
        .map(|item| item.duration_hours)
        .unwrap_or(DEFAULT_DURATION_HOURS)
}

/// Trims a display name; empty names are rejected at the creation boundary.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Snaps a duration to the half-hour grid, flooring at 0.5.
pub fn sanitize_duration(raw: f64) -> f64 {
    if !raw.is_finite() {
        return DEFAULT_DURATION_HOURS;
    }
    let snapped = (raw * 2.0).round() / 2.0;
    snapped.max(0.5)
}

fn to_half_hours(hours: f64) -> i64 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    (hours.min(WEEK_HOURS) * 2.0).round() as i64
}
