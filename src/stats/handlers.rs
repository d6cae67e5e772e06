use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::Stats, services};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Stats>, AppError> {
    Ok(Json(services::compute(state.store.as_ref()).await?))
}
