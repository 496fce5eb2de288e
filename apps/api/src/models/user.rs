#![allow(dead_code)]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub timezone: String,
    /// Stored as JSONB; decoded leniently via [`Preferences::from_value`].
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
}

/// Lifestyle preferences collected during onboarding. All fields are
/// defaulted so partially-filled or legacy stored profiles still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub work_hours: f64,
    pub sleep_hours: f64,
    pub location: String,
    pub commute_minutes: f64,
    pub flexibility: u8,
    pub hobbies: Vec<Hobby>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            work_hours: 40.0,
            sleep_hours: 8.0,
            location: String::new(),
            commute_minutes: 0.0,
            flexibility: 5,
            hobbies: Vec::new(),
        }
    }
}

impl Preferences {
    /// Decodes stored preferences, falling back to defaults when the JSON
    /// is malformed. Catalog generation must never fail on sloppy input.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// One hobby descriptor: "tennis, twice a week, 2 hours, at the club".
/// Frequency and duration stay optional here; the catalog builder applies
/// the documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hobby {
    pub name: String,
    pub frequency: Option<f64>,
    pub duration: Option<f64>,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preferences_decode_partial_json() {
        let prefs = Preferences::from_value(json!({ "workHours": 10 }));
        assert_eq!(prefs.work_hours, 10.0);
        assert_eq!(prefs.sleep_hours, 8.0);
        assert!(prefs.hobbies.is_empty());
    }

    #[test]
    fn test_preferences_decode_garbage_falls_back_to_defaults() {
        let prefs = Preferences::from_value(json!("not an object"));
        assert_eq!(prefs.work_hours, 40.0);
    }

    #[test]
    fn test_hobby_missing_numbers_stay_none() {
        let prefs = Preferences::from_value(json!({
            "hobbies": [{ "name": "tennis" }]
        }));
        assert_eq!(prefs.hobbies.len(), 1);
        assert!(prefs.hobbies[0].frequency.is_none());
        assert!(prefs.hobbies[0].duration.is_none());
    }
}
