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
    dto::{NewProduct, ProductPatch, ProductView},
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
            "/products",
            get(list_products)
                .post(create_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/products/:id", get(get_product))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ProductView>>, AppError> {
    Ok(Json(services::list(state.store.as_ref()).await?))
}

#[instrument(skip(state, id))]
pub async fn get_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProductView>, AppError> {
    let Path(id) = id?;
    Ok(Json(services::get(state.store.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductView>), AppError> {
    let Json(payload) = payload?;
    let product = services::create(state.store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateRequest<ProductPatch>>, JsonRejection>,
) -> Result<Json<ProductView>, AppError> {
    let Json(payload) = payload?;
    let (id, patch) = payload.into_parts()?;
    Ok(Json(services::update(state.store.as_ref(), id, patch).await?))
}

#[instrument(skip(state, query))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    services::delete(state.store.as_ref(), query.require()?).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
