use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::{
    error::AppError,
    store::{Store, StoreError},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates an account. The password is stored only as an argon2 hash.
pub async fn signup(store: &dyn Store, email: &str, password: &str) -> Result<User, AppError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email = %email, "signup with invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::validation("User already exists"));
    }

    let hash = hash_password(password).map_err(|e| AppError::internal("Error creating user", e))?;
    let user = match store.insert_user(&email, &hash).await {
        Ok(u) => u,
        // lost a race against a concurrent signup for the same email
        Err(StoreError::Duplicate(_)) => return Err(AppError::validation("User already exists")),
        Err(e) => return Err(AppError::internal("Error creating user", e)),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks credentials; unknown email and wrong password look the same to the caller.
pub async fn authenticate(store: &dyn Store, email: &str, password: &str) -> Result<User, AppError> {
    let email = normalize_email(email);
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    let ok = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::internal("Error verifying credentials", e))?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
