use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::EntryStore;

/// Upper bound on the backward walk, and therefore on any reported streak.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Count consecutive logged days walking backward from `as_of`.
///
/// The run must include `as_of` itself: if that day has no entry the streak is 0, even
/// when the days before it are contiguous.
pub fn current_streak<I>(logged_days: I, as_of: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let logged: HashSet<NaiveDate> = logged_days.into_iter().collect();

    let mut streak = 0;
    let mut day = as_of;
    while streak < MAX_STREAK_DAYS && logged.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

pub async fn current_streak_for(
    store: &dyn EntryStore,
    user_id: Uuid,
    as_of: NaiveDate,
) -> AppResult<u32> {
    let entries = store.find_all(user_id).await?;
    let streak = current_streak(entries.iter().map(|e| e.date), as_of);

    tracing::debug!(
        user_id = %user_id,
        as_of   = %as_of,
        entries = entries.len(),
        streak  = streak,
        "Computed current streak"
    );

    Ok(streak)
}
