use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::EntryStore;
use crate::error::{AppError, AppResult};
use crate::models::entry::{Entry, EntryData, EntryFilter, UpsertOutcome};
use crate::models::stats::{Window, WindowTotals};

/// Process-local store. Tombstoned rows are kept so deletes behave like the database.
#[derive(Clone, Default)]
pub struct MemoryEntryStore {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows held for a user, tombstones included.
    pub async fn row_count(&self, user_id: Uuid) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .count()
    }

    async fn live_in_window(&self, user_id: Uuid, window: Window) -> Vec<Entry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && e.is_live() && window.contains(e.date))
            .cloned()
            .collect()
    }
}

fn find_live_day(entries: &mut [Entry], user_id: Uuid, date: NaiveDate) -> Option<&mut Entry> {
    entries
        .iter_mut()
        .find(|e| e.user_id == user_id && e.date == date && e.is_live())
}

fn overwrite(entry: &mut Entry, data: &EntryData) {
    entry.mood = data.mood;
    entry.sleep_hours = data.sleep_hours;
    entry.water_cups = data.water_cups;
    entry.sport_min = data.sport_min;
    entry.note = data.note.clone();
    entry.updated_at = Utc::now();
}

fn push_new(entries: &mut Vec<Entry>, user_id: Uuid, data: &EntryData) -> Entry {
    let now = Utc::now();
    let entry = Entry {
        id: Uuid::new_v4(),
        user_id,
        date: data.date,
        mood: data.mood,
        sleep_hours: data.sleep_hours,
        water_cups: data.water_cups,
        sport_min: data.sport_min,
        note: data.note.clone(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    entries.push(entry.clone());
    entry
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn find_one(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.user_id == user_id && e.date == date && e.is_live())
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.id == id && e.user_id == user_id && e.is_live())
            .cloned())
    }

    async fn insert(&self, user_id: Uuid, data: &EntryData) -> AppResult<Entry> {
        let mut entries = self.entries.write().await;
        if find_live_day(&mut entries, user_id, data.date).is_some() {
            return Err(AppError::Conflict("An entry already exists for this date".into()));
        }
        Ok(push_new(&mut entries, user_id, data))
    }

    async fn update(&self, user_id: Uuid, id: Uuid, data: &EntryData) -> AppResult<Option<Entry>> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == user_id && e.is_live())
            .map(|existing| {
                overwrite(existing, data);
                existing.clone()
            }))
    }

    async fn upsert(&self, user_id: Uuid, data: &EntryData) -> AppResult<(Entry, UpsertOutcome)> {
        // Lookup and write happen under one guard
        let mut entries = self.entries.write().await;

        if let Some(existing) = find_live_day(&mut entries, user_id, data.date) {
            overwrite(existing, data);
            return Ok((existing.clone(), UpsertOutcome::Updated));
        }

        Ok((push_new(&mut entries, user_id, data), UpsertOutcome::Created))
    }

    async fn count(&self, user_id: Uuid, window: Window) -> AppResult<i64> {
        Ok(self.live_in_window(user_id, window).await.len() as i64)
    }

    async fn aggregate_scalar(&self, user_id: Uuid, window: Window) -> AppResult<WindowTotals> {
        let matched = self.live_in_window(user_id, window).await;
        if matched.is_empty() {
            return Ok(WindowTotals::default());
        }

        let n = matched.len() as f64;
        Ok(WindowTotals {
            entries_count: matched.len() as i64,
            average_mood: matched.iter().map(|e| f64::from(e.mood)).sum::<f64>() / n,
            average_sleep: matched.iter().map(|e| f64::from(e.sleep_hours)).sum::<f64>() / n,
            total_water_cups: matched.iter().map(|e| i64::from(e.water_cups)).sum(),
            total_sport_min: matched.iter().map(|e| i64::from(e.sport_min)).sum(),
        })
    }

    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>> {
        Ok(self.live_in_window(user_id, Window::ALL_TIME).await)
    }

    async fn list(&self, user_id: Uuid, filter: &EntryFilter) -> AppResult<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .live_in_window(user_id, Window::ALL_TIME)
            .await
            .into_iter()
            .filter(|e| filter.matches(e.date))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == user_id && e.is_live())
        {
            Some(entry) => {
                let now = Utc::now();
                entry.deleted_at = Some(now);
                entry.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
