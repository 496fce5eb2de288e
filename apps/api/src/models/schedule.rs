//! Schedule domain types: weekdays, grid slots, the placement map, and
//! the activity catalog entries that get placed on the grid.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Days of the planner week, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    /// Full label for display ("Monday" .. "Sunday").
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Mon),
            "tue" | "tuesday" => Ok(Weekday::Tue),
            "wed" | "wednesday" => Ok(Weekday::Wed),
            "thu" | "thursday" => Ok(Weekday::Thu),
            "fri" | "friday" => Ok(Weekday::Fri),
            "sat" | "saturday" => Ok(Weekday::Sat),
            "sun" | "sunday" => Ok(Weekday::Sun),
            other => Err(format!("unknown weekday '{other}'")),
        }
    }
}

/// The anchor cell of a placement: a `(day, start hour)` pair.
/// Serialized as `"mon-10"` — the drop-zone id format of the grid surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId {
    pub day: Weekday,
    pub hour: u8,
}

impl SlotId {
    pub fn new(day: Weekday, hour: u8) -> Self {
        Self { day, hour }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.hour)
    }
}

impl FromStr for SlotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, hour) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("malformed slot id '{s}'"))?;
        Ok(SlotId {
            day: day.parse()?,
            hour: hour
                .parse::<u8>()
                .map_err(|_| format!("malformed slot hour in '{s}'"))?,
        })
    }
}

impl From<SlotId> for String {
    fn from(slot: SlotId) -> String {
        slot.to_string()
    }
}

impl TryFrom<String> for SlotId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Activity id → anchor slot. An activity absent from the map is unplaced
/// (it lives in the inbox). This map is the unit of persistence.
pub type PlacementMap = BTreeMap<String, SlotId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Work,
    Hobby,
    Custom,
}

/// One schedulable unit of time, generated from preferences or created by
/// the user. Ids are stable across catalog rebuilds for unchanged inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    pub name: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub location: String,
    pub category: ActivityCategory,
}

/// A user-created task as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTask {
    pub id: Uuid,
    pub name: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomTaskRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub duration_hours: f64,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<CustomTaskRow> for CustomTask {
    fn from(row: CustomTaskRow) -> Self {
        CustomTask {
            id: row.id,
            name: row.name,
            duration_hours: row.duration_hours,
            location: row.location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleRow {
    pub user_id: Uuid,
    /// The stored placement map as JSONB.
    pub placements: Value,
    pub updated_at: DateTime<Utc>,
}
