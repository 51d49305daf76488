use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One user's wellness record for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "entry_date")]
    pub date: NaiveDate,
    pub mood: i32,
    pub sleep_hours: f32,
    pub water_cups: i32,
    pub sport_min: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Validated entry contents, keyed by day. Every mutable field is replaced on upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryData {
    pub date: NaiveDate,
    pub mood: i32,
    pub sleep_hours: f32,
    pub water_cups: i32,
    pub sport_min: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// POST /entries
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertEntryRequest {
    /// `YYYY-MM-DD`, or an RFC 3339 timestamp whose time of day is ignored.
    pub date: String,

    #[validate(range(min = 1, max = 5, message = "Mood must be 1-5"))]
    pub mood: i32,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be 0-24"))]
    pub sleep_hours: f32,

    #[validate(range(min = 0, message = "Water cups must not be negative"))]
    pub water_cups: i32,

    #[validate(range(min = 0, message = "Sport minutes must not be negative"))]
    pub sport_min: i32,

    #[validate(length(max = 5000, message = "Note must be at most 5000 characters"))]
    pub note: Option<String>,
}

impl UpsertEntryRequest {
    pub fn into_entry_data(self, date: NaiveDate) -> EntryData {
        EntryData {
            date,
            mood: self.mood,
            sleep_hours: self.sleep_hours,
            water_cups: self.water_cups,
            sport_min: self.sport_min,
            note: self.note,
        }
    }
}

/// GET /entries query params. All bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.date.map_or(true, |d| d == date)
            && self.start_date.map_or(true, |s| date >= s)
            && self.end_date.map_or(true, |e| date <= e)
    }

    pub fn validate_range(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err("start_date must not be after end_date".into());
            }
        }
        Ok(())
    }
}

/// Parse a submitted entry date down to day granularity.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.date_naive())
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD".to_string())
}
