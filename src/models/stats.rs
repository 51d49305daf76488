use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Inclusive date range used to scope aggregation. `None` on a side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Window {
    pub const ALL_TIME: Window = Window {
        start: None,
        end: None,
    };

    /// `[today - days, today]`
    pub fn trailing_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: Some(today - Duration::days(days)),
            end: Some(today),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Count, averages and sums read by the store in a single statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct WindowTotals {
    pub entries_count: i64,
    pub average_mood: f64,
    pub average_sleep: f64,
    pub total_water_cups: i64,
    pub total_sport_min: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub average_mood: f64,
    pub average_sleep: f64,
    pub total_water_cups: i64,
    pub total_sport_min: i64,
    pub entries_count: i64,
}

impl WindowStats {
    pub fn from_totals(totals: WindowTotals) -> Self {
        Self {
            average_mood: totals.average_mood,
            average_sleep: totals.average_sleep,
            total_water_cups: totals.total_water_cups,
            total_sport_min: totals.total_sport_min,
            entries_count: totals.entries_count,
        }
    }
}

/// GET /stats/summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_entries: i64,
    pub average_mood: f64,
    pub average_sleep: f64,
    pub total_water_cups: i64,
    pub total_sport_min: i64,
    pub current_streak: u32,
    pub weekly_stats: WindowStats,
    pub monthly_stats: WindowStats,
}

impl StatsSummary {
    pub fn assemble(
        lifetime: WindowStats,
        weekly: WindowStats,
        monthly: WindowStats,
        current_streak: u32,
    ) -> Self {
        Self {
            total_entries: lifetime.entries_count,
            average_mood: lifetime.average_mood,
            average_sleep: lifetime.average_sleep,
            total_water_cups: lifetime.total_water_cups,
            total_sport_min: lifetime.total_sport_min,
            current_streak,
            weekly_stats: weekly,
            monthly_stats: monthly,
        }
    }
}
