use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::stats::StatsSummary;
use crate::services::stats;
use crate::AppState;

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<StatsSummary>> {
    let today = state.clock.today();
    let summary = stats::summarize(state.store.as_ref(), auth_user.id, today).await?;
    Ok(Json(summary))
}
