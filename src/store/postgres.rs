use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::EntryStore;
use crate::error::{AppError, AppResult};
use crate::models::entry::{Entry, EntryData, EntryFilter, UpsertOutcome};
use crate::models::stats::{Window, WindowTotals};

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    entry: Entry,
    inserted: bool,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict("An entry already exists for this date".into());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn find_one(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM daily_entries
            WHERE user_id = $1 AND entry_date = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            "SELECT * FROM daily_entries WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn insert(&self, user_id: Uuid, data: &EntryData) -> AppResult<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO daily_entries
                (id, user_id, entry_date, mood, sleep_hours, water_cups, sport_min, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(data.date)
        .bind(data.mood)
        .bind(data.sleep_hours)
        .bind(data.water_cups)
        .bind(data.sport_min)
        .bind(&data.note)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(entry)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, data: &EntryData) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            UPDATE daily_entries SET
                mood = $3,
                sleep_hours = $4,
                water_cups = $5,
                sport_min = $6,
                note = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.mood)
        .bind(data.sleep_hours)
        .bind(data.water_cups)
        .bind(data.sport_min)
        .bind(&data.note)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn upsert(&self, user_id: Uuid, data: &EntryData) -> AppResult<(Entry, UpsertOutcome)> {
        // xmax is 0 only for a freshly inserted tuple
        let row = sqlx::query_as::<_, UpsertedRow>(
            r#"
            INSERT INTO daily_entries
                (id, user_id, entry_date, mood, sleep_hours, water_cups, sport_min, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, entry_date) WHERE deleted_at IS NULL DO UPDATE SET
                mood = EXCLUDED.mood,
                sleep_hours = EXCLUDED.sleep_hours,
                water_cups = EXCLUDED.water_cups,
                sport_min = EXCLUDED.sport_min,
                note = EXCLUDED.note,
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(data.date)
        .bind(data.mood)
        .bind(data.sleep_hours)
        .bind(data.water_cups)
        .bind(data.sport_min)
        .bind(&data.note)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        let outcome = if row.inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };

        Ok((row.entry, outcome))
    }

    async fn count(&self, user_id: Uuid, window: Window) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM daily_entries
            WHERE user_id = $1 AND deleted_at IS NULL
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn aggregate_scalar(&self, user_id: Uuid, window: Window) -> AppResult<WindowTotals> {
        let totals = sqlx::query_as::<_, WindowTotals>(
            r#"
            SELECT
                COUNT(*) AS entries_count,
                COALESCE(AVG(mood)::float8, 0) AS average_mood,
                COALESCE(AVG(sleep_hours)::float8, 0) AS average_sleep,
                COALESCE(SUM(water_cups), 0)::int8 AS total_water_cups,
                COALESCE(SUM(sport_min), 0)::int8 AS total_sport_min
            FROM daily_entries
            WHERE user_id = $1 AND deleted_at IS NULL
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.db)
        .await?;

        Ok(totals)
    }

    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM daily_entries WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn list(&self, user_id: Uuid, filter: &EntryFilter) -> AppResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM daily_entries
            WHERE user_id = $1 AND deleted_at IS NULL
              AND ($2::date IS NULL OR entry_date = $2)
              AND ($3::date IS NULL OR entry_date >= $3)
              AND ($4::date IS NULL OR entry_date <= $4)
            ORDER BY entry_date DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.date)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE daily_entries
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
