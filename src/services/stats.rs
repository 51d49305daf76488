use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::stats::{StatsSummary, Window, WindowStats};
use crate::services::streak;
use crate::store::EntryStore;

pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Count, averages and sums of a user's live entries inside `window`.
///
/// The count and the figures come from one store read, so they always describe the same
/// set of entries. An empty window reports zero for every field rather than NaN or null.
pub async fn window_stats(
    store: &dyn EntryStore,
    user_id: Uuid,
    window: Window,
) -> AppResult<WindowStats> {
    let totals = store.aggregate_scalar(user_id, window).await?;
    if totals.entries_count == 0 {
        return Ok(WindowStats::default());
    }

    Ok(WindowStats::from_totals(totals))
}

/// Lifetime, trailing-week and trailing-month stats plus the current streak as of `today`.
pub async fn summarize(
    store: &dyn EntryStore,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<StatsSummary> {
    let (lifetime, weekly, monthly, current_streak) = tokio::try_join!(
        window_stats(store, user_id, Window::ALL_TIME),
        window_stats(store, user_id, Window::trailing_days(today, WEEKLY_WINDOW_DAYS)),
        window_stats(store, user_id, Window::trailing_days(today, MONTHLY_WINDOW_DAYS)),
        streak::current_streak_for(store, user_id, today),
    )?;

    tracing::debug!(
        user_id       = %user_id,
        total_entries = lifetime.entries_count,
        weekly        = weekly.entries_count,
        monthly       = monthly.entries_count,
        streak        = current_streak,
        "Computed stats summary"
    );

    Ok(StatsSummary::assemble(lifetime, weekly, monthly, current_streak))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::{Entry, EntryData, EntryFilter, UpsertOutcome};
    use crate::models::stats::WindowTotals;
    use crate::store::MemoryEntryStore;
    use async_trait::async_trait;
    use chrono::Duration;

    /// Over-reports `count` by one, as if a row vanished between two separate reads.
    struct StaleCountStore(MemoryEntryStore);

    #[async_trait]
    impl EntryStore for StaleCountStore {
        async fn find_one(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
            self.0.find_one(user_id, date).await
        }
        async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Entry>> {
            self.0.find_by_id(user_id, id).await
        }
        async fn insert(&self, user_id: Uuid, data: &EntryData) -> AppResult<Entry> {
            self.0.insert(user_id, data).await
        }
        async fn update(
            &self,
            user_id: Uuid,
            id: Uuid,
            data: &EntryData,
        ) -> AppResult<Option<Entry>> {
            self.0.update(user_id, id, data).await
        }
        async fn upsert(
            &self,
            user_id: Uuid,
            data: &EntryData,
        ) -> AppResult<(Entry, UpsertOutcome)> {
            self.0.upsert(user_id, data).await
        }
        async fn count(&self, user_id: Uuid, window: Window) -> AppResult<i64> {
            Ok(self.0.count(user_id, window).await? + 1)
        }
        async fn aggregate_scalar(&self, user_id: Uuid, window: Window) -> AppResult<WindowTotals> {
            self.0.aggregate_scalar(user_id, window).await
        }
        async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>> {
            self.0.find_all(user_id).await
        }
        async fn list(&self, user_id: Uuid, filter: &EntryFilter) -> AppResult<Vec<Entry>> {
            self.0.list(user_id, filter).await
        }
        async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
            self.0.soft_delete(user_id, id).await
        }
        async fn ping(&self) -> AppResult<()> {
            self.0.ping().await
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    async fn log(store: &MemoryEntryStore, user: Uuid, days_ago: i64, mood: i32) {
        let data = EntryData {
            date: today() - Duration::days(days_ago),
            mood,
            sleep_hours: 7.0,
            water_cups: 5,
            sport_min: 30,
            note: None,
        };
        store.upsert(user, &data).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_window_is_all_zero() {
        let store = MemoryEntryStore::new();
        let stats = window_stats(&store, Uuid::new_v4(), Window::ALL_TIME)
            .await
            .unwrap();

        assert_eq!(stats, WindowStats::default());
        assert_eq!(stats.average_mood, 0.0);
        assert_eq!(stats.entries_count, 0);
    }

    #[tokio::test]
    async fn test_average_mood_is_arithmetic_mean() {
        let store = MemoryEntryStore::new();
        let user = Uuid::new_v4();
        log(&store, user, 0, 2).await;
        log(&store, user, 3, 4).await;
        log(&store, user, 9, 5).await;

        let stats = window_stats(&store, user, Window::ALL_TIME).await.unwrap();

        assert_eq!(stats.entries_count, 3);
        assert!((stats.average_mood - 11.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_sleep - 7.0).abs() < 1e-9);
        assert_eq!(stats.total_water_cups, 15);
        assert_eq!(stats.total_sport_min, 90);
    }

    #[tokio::test]
    async fn test_count_and_averages_come_from_one_read() {
        let memory = MemoryEntryStore::new();
        let user = Uuid::new_v4();
        let store = StaleCountStore(memory.clone());

        let empty = window_stats(&store, user, Window::ALL_TIME).await.unwrap();
        assert_eq!(empty, WindowStats::default());

        log(&memory, user, 0, 4).await;
        let stats = window_stats(&store, user, Window::ALL_TIME).await.unwrap();
        assert_eq!(stats.entries_count, 1);
        assert_eq!(stats.average_mood, 4.0);
    }

    #[tokio::test]
    async fn test_weekly_window_edges() {
        let store = MemoryEntryStore::new();
        let user = Uuid::new_v4();
        log(&store, user, 7, 3).await;
        log(&store, user, 8, 3).await;

        let weekly = window_stats(&store, user, Window::trailing_days(today(), 7))
            .await
            .unwrap();
        assert_eq!(weekly.entries_count, 1);
    }

    #[tokio::test]
    async fn test_summary_assembles_all_windows() {
        let store = MemoryEntryStore::new();
        let user = Uuid::new_v4();
        log(&store, user, 0, 5).await;
        log(&store, user, 1, 4).await;
        log(&store, user, 20, 3).await;
        log(&store, user, 45, 1).await;

        let summary = summarize(&store, user, today()).await.unwrap();

        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.weekly_stats.entries_count, 2);
        assert_eq!(summary.monthly_stats.entries_count, 3);
        assert_eq!(summary.current_streak, 2);
        assert!((summary.weekly_stats.average_mood - 4.5).abs() < 1e-9);
        assert!((summary.average_mood - 13.0 / 4.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_deleted_entry_leaves_every_window_and_the_streak() {
        let store = MemoryEntryStore::new();
        let user = Uuid::new_v4();
        log(&store, user, 1, 4).await;
        log(&store, user, 0, 2).await;

        let today_entry = store.find_one(user, today()).await.unwrap().unwrap();
        store.soft_delete(user, today_entry.id).await.unwrap();

        let summary = summarize(&store, user, today()).await.unwrap();
        assert_eq!(summary.total_entries, 1);
        assert_eq!(summary.weekly_stats.entries_count, 1);
        assert_eq!(summary.monthly_stats.entries_count, 1);
        assert_eq!(summary.average_mood, 4.0);
        assert_eq!(summary.current_streak, 0);
    }
}
