use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::entry::{
    parse_entry_date, Entry, EntryFilter, UpsertEntryRequest, UpsertOutcome,
};
use crate::store::EntryStore;

#[derive(Debug)]
pub struct Upserted {
    pub entry: Entry,
    pub outcome: UpsertOutcome,
}

/// Create the user's entry for the submitted day, or overwrite every field of the existing
/// one. Input is validated before the store is touched.
pub async fn upsert_entry(
    store: &dyn EntryStore,
    user_id: Uuid,
    request: UpsertEntryRequest,
) -> AppResult<Upserted> {
    request.validate()?;
    let date = parse_entry_date(&request.date).map_err(AppError::Validation)?;
    let data = request.into_entry_data(date);

    let (entry, outcome) = store.upsert(user_id, &data).await?;

    tracing::info!(
        user_id    = %user_id,
        entry_id   = %entry.id,
        entry_date = %entry.date,
        outcome    = ?outcome,
        "Daily entry saved"
    );

    Ok(Upserted { entry, outcome })
}

pub async fn get_entry(store: &dyn EntryStore, user_id: Uuid, id: Uuid) -> AppResult<Entry> {
    store
        .find_by_id(user_id, id)
        .await?
        .ok_or(AppError::NotFound("Entry not found".into()))
}

pub async fn list_entries(
    store: &dyn EntryStore,
    user_id: Uuid,
    filter: &EntryFilter,
) -> AppResult<Vec<Entry>> {
    filter.validate_range().map_err(AppError::Validation)?;

    match filter.date {
        Some(date) if filter.start_date.is_none() && filter.end_date.is_none() => {
            Ok(store.find_one(user_id, date).await?.into_iter().collect())
        }
        _ => store.list(user_id, filter).await,
    }
}

pub async fn delete_entry(store: &dyn EntryStore, user_id: Uuid, id: Uuid) -> AppResult<()> {
    if !store.soft_delete(user_id, id).await? {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    tracing::info!(user_id = %user_id, entry_id = %id, "Daily entry deleted");
    Ok(())
}
