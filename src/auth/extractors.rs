use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Name of the cookie carrying the access token.
pub const SESSION_COOKIE: &str = "session";

/// An authenticated caller. Accepts `Authorization: Bearer <token>` or the
/// session cookie set at login.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers)? {
            Some(token) => Some(token),
            None => session_token(&Cookies::from_request_parts(parts, state).await.map_err(
                |(_, msg)| AppError::internal("Cookie layer missing", anyhow::anyhow!(msg)),
            )?),
        }
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(&token).map_err(|e| {
            warn!(error = %e, "rejected session token");
            AppError::Unauthorized("Invalid or expired session".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|t| Some(t.trim().to_string()))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))
}

fn session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Cookie opening a session for `max_age`.
pub fn session_cookie(token: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age.as_secs() as i64))
        .build()
}

/// Cookie that expires the session at once.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), Duration::ZERO, secure)
}
