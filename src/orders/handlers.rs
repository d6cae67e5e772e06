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
    dto::{NewOrder, OrderPatch, OrderView},
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
            "/orders",
            get(list_orders)
                .post(create_order)
                .put(update_order)
                .delete(delete_order),
        )
        .route("/orders/:id", get(get_order))
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(services::list(state.store.as_ref()).await?))
}

#[instrument(skip(state, id))]
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<OrderView>, AppError> {
    let Path(id) = id?;
    Ok(Json(services::get(state.store.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderView>), AppError> {
    let Json(payload) = payload?;
    let order = services::create(state.store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state, payload))]
pub async fn update_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateRequest<OrderPatch>>, JsonRejection>,
) -> Result<Json<OrderView>, AppError> {
    let Json(payload) = payload?;
    let (id, patch) = payload.into_parts()?;
    Ok(Json(services::update(state.store.as_ref(), id, patch).await?))
}

#[instrument(skip(state, query))]
pub async fn delete_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    services::delete(state.store.as_ref(), query.require()?).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
