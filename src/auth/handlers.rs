use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_cookies::Cookies;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, SignupRequest},
    extractors::{clear_session_cookie, session_cookie, AuthUser},
    jwt::JwtKeys,
    services,
};
use crate::{dto::MessageResponse, error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    services::signup(state.store.as_ref(), &payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created"))))
}

#[instrument(skip(state, cookies, payload))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let user = services::authenticate(state.store.as_ref(), &payload.email, &payload.password).await?;
    issue_session(&state, &cookies, user.id, user.email)
}

#[instrument(skip(state, cookies, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid or expired refresh token".into())
    })?;

    let user = state
        .store
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    issue_session(&state, &cookies, user.id, user.email)
}

#[instrument(skip(state, cookies))]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    cookies.add(clear_session_cookie(state.config.cookie_secure));
    StatusCode::NO_CONTENT
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}

fn issue_session(
    state: &AppState,
    cookies: &Cookies,
    user_id: Uuid,
    email: String,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys
        .sign_access(user_id)
        .map_err(|e| AppError::internal("Could not issue session", e))?;
    let refresh_token = keys
        .sign_refresh(user_id)
        .map_err(|e| AppError::internal("Could not issue session", e))?;

    cookies.add(session_cookie(
        access_token.clone(),
        keys.access_ttl,
        state.config.cookie_secure,
    ));
    info!(%user_id, "session issued");

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser { id: user_id, email },
    }))
}
