use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{NewSource, SourcePatch},
    repo_types::Source,
    services,
};
use crate::{
    auth::AuthUser,
    dto::{IdQuery, MessageResponse, UpdateRequest},
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sources",
            get(list_sources)
                .post(create_source)
                .put(update_source)
                .delete(delete_source),
        )
        .route("/sources/:id", get(get_source))
}

#[instrument(skip(state))]
pub async fn list_sources(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Source>>, AppError> {
    Ok(Json(services::list(state.store.as_ref()).await?))
}

#[instrument(skip(state, id))]
pub async fn get_source(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Source>, AppError> {
    let Path(id) = id?;
    Ok(Json(services::get(state.store.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_source(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewSource>, JsonRejection>,
) -> Result<(StatusCode, Json<Source>), AppError> {
    let Json(payload) = payload?;
    let source = services::create(state.store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

#[instrument(skip(state, payload))]
pub async fn update_source(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateRequest<SourcePatch>>, JsonRejection>,
) -> Result<Json<Source>, AppError> {
    let Json(payload) = payload?;
    let (id, patch) = payload.into_parts()?;
    Ok(Json(services::update(state.store.as_ref(), id, patch).await?))
}

#[instrument(skip(state, query))]
pub async fn delete_source(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    services::delete(state.store.as_ref(), query.require()?).await?;
    Ok(Json(MessageResponse::new("Source deleted successfully")))
}
