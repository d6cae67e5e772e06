use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{NewProduct, ProductPatch, ProductView},
    repo_types::Product,
};
use crate::{error::AppError, store::Store};

/// Resolves each product's source with a single lookup for the whole batch.
pub(crate) async fn populate(
    store: &dyn Store,
    products: Vec<Product>,
) -> Result<Vec<ProductView>, AppError> {
    let mut ids: Vec<Uuid> = products.iter().map(|p| p.source_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let sources: HashMap<Uuid, _> = store
        .find_sources(&ids)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(products
        .into_iter()
        .map(|p| {
            let source = sources.get(&p.source_id).cloned();
            ProductView::new(p, source)
        })
        .collect())
}

async fn ensure_source(store: &dyn Store, source_id: Uuid) -> Result<(), AppError> {
    if store.get_source(source_id).await?.is_none() {
        warn!(%source_id, "product references unknown source");
        return Err(AppError::validation("source must reference an existing source"));
    }
    Ok(())
}

pub async fn list(store: &dyn Store) -> Result<Vec<ProductView>, AppError> {
    let products = store.list_products().await?;
    populate(store, products).await
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<ProductView, AppError> {
    let product = store
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    let mut views = populate(store, vec![product]).await?;
    Ok(views.remove(0))
}

pub async fn create(store: &dyn Store, mut new: NewProduct) -> Result<ProductView, AppError> {
    new.validate()?;
    ensure_source(store, new.source).await?;
    let product = store.insert_product(&new).await?;
    info!(product_id = %product.id, name = %product.name, "product created");
    get(store, product.id).await
}

pub async fn update(
    store: &dyn Store,
    id: Uuid,
    mut patch: ProductPatch,
) -> Result<ProductView, AppError> {
    patch.validate()?;
    if let Some(source_id) = patch.source {
        ensure_source(store, source_id).await?;
    }
    let product = store
        .update_product(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    info!(product_id = %id, "product updated");
    let mut views = populate(store, vec![product]).await?;
    Ok(views.remove(0))
}

pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_product(id).await? {
        return Err(AppError::not_found("Product not found"));
    }
    info!(product_id = %id, "product deleted");
    Ok(())
}
