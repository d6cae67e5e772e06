use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Body of every `PUT /<resource>` call: `{ "id": "...", "data": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest<T> {
    pub id: Option<Uuid>,
    pub data: T,
}

impl<T> UpdateRequest<T> {
    pub fn into_parts(self) -> Result<(Uuid, T), AppError> {
        let id = self
            .id
            .ok_or_else(|| AppError::validation("ID is required for update"))?;
        Ok((id, self.data))
    }
}

/// Query string of every `DELETE /<resource>?id=...` call.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn require(&self) -> Result<Uuid, AppError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("ID is required to delete"))?;
        Uuid::parse_str(raw).map_err(|_| AppError::validation("Invalid id"))
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
