//! Storage collaborator for daily entries.
//!
//! The engine only ever talks to [`EntryStore`]; the Postgres implementation backs the
//! running service and [`MemoryEntryStore`] backs tests. Every method is scoped to a
//! single user and ignores tombstoned rows.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::entry::{Entry, EntryData, EntryFilter, UpsertOutcome};
use crate::models::stats::{Window, WindowTotals};

mod memory;
mod postgres;

pub use memory::MemoryEntryStore;
pub use postgres::PgEntryStore;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Live entry for `(user_id, date)`, compared at day granularity.
    async fn find_one(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>>;

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Entry>>;

    /// New live entry for `data.date`. Fails with `Conflict` if the day is already taken.
    async fn insert(&self, user_id: Uuid, data: &EntryData) -> AppResult<Entry>;

    /// Replace every mutable field of a live entry. `None` when it no longer exists.
    async fn update(&self, user_id: Uuid, id: Uuid, data: &EntryData) -> AppResult<Option<Entry>>;

    /// Insert the entry for `data.date`, or fully replace the live one. Afterwards exactly
    /// one live entry exists for the day.
    ///
    /// The default is lookup then write and can race with a concurrent insert for the same
    /// day; implementations override it with a single atomic write.
    async fn upsert(&self, user_id: Uuid, data: &EntryData) -> AppResult<(Entry, UpsertOutcome)> {
        if let Some(existing) = self.find_one(user_id, data.date).await? {
            if let Some(entry) = self.update(user_id, existing.id, data).await? {
                return Ok((entry, UpsertOutcome::Updated));
            }
        }
        let entry = self.insert(user_id, data).await?;
        Ok((entry, UpsertOutcome::Created))
    }

    async fn count(&self, user_id: Uuid, window: Window) -> AppResult<i64>;

    /// Count, averages and sums over the window, taken from one consistent read. The
    /// figures are only meaningful when `entries_count` is non-zero.
    async fn aggregate_scalar(&self, user_id: Uuid, window: Window) -> AppResult<WindowTotals>;

    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>>;

    /// Newest date first.
    async fn list(&self, user_id: Uuid, filter: &EntryFilter) -> AppResult<Vec<Entry>>;

    /// Tombstone an entry. Returns false when there was no live entry to delete.
    async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;
}
