use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::DeleteResponse;
use crate::error::AppResult;
use crate::models::entry::{Entry, EntryFilter, UpsertEntryRequest, UpsertOutcome};
use crate::services::entries;
use crate::AppState;

pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    body: Result<Json<UpsertEntryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Entry>)> {
    let Json(body) = body?;
    let saved = entries::upsert_entry(state.store.as_ref(), auth_user.id, body).await?;

    let status = match saved.outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(saved.entry)))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<EntryFilter>, QueryRejection>,
) -> AppResult<Json<Vec<Entry>>> {
    let Query(filter) = query?;
    let entries = entries::list_entries(state.store.as_ref(), auth_user.id, &filter).await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Entry>> {
    let Path(entry_id) = path?;
    let entry = entries::get_entry(state.store.as_ref(), auth_user.id, entry_id).await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Path(entry_id) = path?;
    entries::delete_entry(state.store.as_ref(), auth_user.id, entry_id).await?;
    Ok(Json(DeleteResponse {
        deleted: true,
        id: entry_id,
    }))
}
