use tracing::info;
use uuid::Uuid;

use super::{
    dto::{NewSource, SourcePatch},
    repo_types::Source,
};
use crate::{error::AppError, store::Store};

pub async fn list(store: &dyn Store) -> Result<Vec<Source>, AppError> {
    Ok(store.list_sources().await?)
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<Source, AppError> {
    store
        .get_source(id)
        .await?
        .ok_or_else(|| AppError::not_found("Source not found"))
}

pub async fn create(store: &dyn Store, mut new: NewSource) -> Result<Source, AppError> {
    new.validate()?;
    let source = store.insert_source(&new).await?;
    info!(source_id = %source.id, name = %source.name, "source created");
    Ok(source)
}

pub async fn update(store: &dyn Store, id: Uuid, mut patch: SourcePatch) -> Result<Source, AppError> {
    patch.validate()?;
    let source = store
        .update_source(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Source not found"))?;
    info!(source_id = %id, "source updated");
    Ok(source)
}

/// Products keep pointing at a deleted source; their reference then resolves to nothing.
pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_source(id).await? {
        return Err(AppError::not_found("Source not found"));
    }
    info!(source_id = %id, "source deleted");
    Ok(())
}
