//! In-process store used by the test suite. Mirrors the SQL semantics of
//! [`PgStore`](super::PgStore): insertion-ordered listings, patches that keep
//! absent fields and clear blank ones, and dangling references left in place.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    OrderRepo, ProductRepo, SourceRepo, StatsRepo, Store, StoreError, StoreResult, UserRepo,
};
use crate::{
    auth::repo_types::User,
    orders::repo_types::{Order, OrderDraft},
    products::{
        dto::{NewProduct, ProductPatch},
        repo_types::Product,
    },
    sources::{
        dto::{NewSource, SourcePatch},
        repo_types::Source,
    },
    stats::repo_types::{OrderTotals, SourceProfit},
    validate,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    sources: RwLock<Vec<Source>>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
    fail_reads: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read return [`StoreError::Unavailable`].
    pub async fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().await = fail;
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    async fn check_read(&self) -> StoreResult<()> {
        if *self.fail_reads.read().await {
            return Err(StoreError::Unavailable("memory store reads disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.check_read().await?;
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.check_read().await?;
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("users.email".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl SourceRepo for MemoryStore {
    async fn list_sources(&self) -> StoreResult<Vec<Source>> {
        self.check_read().await?;
        Ok(self.sources.read().await.clone())
    }

    async fn get_source(&self, id: Uuid) -> StoreResult<Option<Source>> {
        self.check_read().await?;
        Ok(self.sources.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn find_sources(&self, ids: &[Uuid]) -> StoreResult<Vec<Source>> {
        self.check_read().await?;
        Ok(self
            .sources
            .read()
            .await
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn insert_source(&self, new: &NewSource) -> StoreResult<Source> {
        let now = OffsetDateTime::now_utc();
        let source = Source {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.sources.write().await.push(source.clone());
        Ok(source)
    }

    async fn update_source(&self, id: Uuid, patch: &SourcePatch) -> StoreResult<Option<Source>> {
        let mut sources = self.sources.write().await;
        let Some(source) = sources.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            source.name = name.clone();
        }
        if let Some(description) = &patch.description {
            source.description = validate::cleared(description.clone());
        }
        source.updated_at = OffsetDateTime::now_utc();
        Ok(Some(source.clone()))
    }

    async fn delete_source(&self, id: Uuid) -> StoreResult<bool> {
        let mut sources = self.sources.write().await;
        let before = sources.len();
        sources.retain(|s| s.id != id);
        Ok(sources.len() < before)
    }

    async fn count_sources(&self) -> StoreResult<i64> {
        self.check_read().await?;
        Ok(self.sources.read().await.len() as i64)
    }
}

#[async_trait]
impl ProductRepo for MemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.check_read().await?;
        Ok(self.products.read().await.clone())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        self.check_read().await?;
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        self.check_read().await?;
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, new: &NewProduct) -> StoreResult<Product> {
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            price: new.price,
            discount_price: new.discount_price,
            buying_price: new.buying_price,
            source_id: new.source,
            image: new.image.clone(),
            description: new.description.clone(),
            short_description: new.short_description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(p) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.name {
            p.name = v.clone();
        }
        if let Some(v) = patch.price {
            p.price = v;
        }
        if let Some(v) = patch.discount_price {
            p.discount_price = Some(v);
        }
        if let Some(v) = patch.buying_price {
            p.buying_price = v;
        }
        if let Some(v) = patch.source {
            p.source_id = v;
        }
        if let Some(v) = &patch.image {
            p.image = validate::cleared(v.clone());
        }
        if let Some(v) = &patch.description {
            p.description = validate::cleared(v.clone());
        }
        if let Some(v) = &patch.short_description {
            p.short_description = validate::cleared(v.clone());
        }
        p.updated_at = OffsetDateTime::now_utc();
        Ok(Some(p.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn count_products(&self) -> StoreResult<i64> {
        self.check_read().await?;
        Ok(self.products.read().await.len() as i64)
    }
}

fn order_from_draft(id: Uuid, draft: &OrderDraft, created_at: OffsetDateTime) -> Order {
    Order {
        id,
        title: draft.title.clone(),
        customer_name: draft.customer_name.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        address: draft.address.clone(),
        delivery_charge: draft.delivery_charge,
        payment_method: draft.payment_method.clone(),
        products: draft.products.clone(),
        total_amount: draft.total_amount,
        total_profit: draft.total_profit,
        created_at,
        updated_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.check_read().await?;
        Ok(self.orders.read().await.clone())
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        self.check_read().await?;
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn insert_order(&self, draft: &OrderDraft) -> StoreResult<Order> {
        let order = order_from_draft(Uuid::new_v4(), draft, OffsetDateTime::now_utc());
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn replace_order(&self, id: Uuid, draft: &OrderDraft) -> StoreResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        let Some(slot) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        *slot = order_from_draft(id, draft, slot.created_at);
        Ok(Some(slot.clone()))
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<bool> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }
}

#[async_trait]
impl StatsRepo for MemoryStore {
    async fn order_totals(&self) -> StoreResult<OrderTotals> {
        self.check_read().await?;
        let orders = self.orders.read().await;
        Ok(orders.iter().fold(OrderTotals::default(), |mut acc, o| {
            acc.orders += 1;
            acc.sales += o.total_amount;
            acc.profit += o.total_profit;
            acc.items_sold += o.products.iter().map(|i| i64::from(i.quantity)).sum::<i64>();
            acc
        }))
    }

    async fn profit_by_source(&self) -> StoreResult<Vec<SourceProfit>> {
        self.check_read().await?;
        let orders = self.orders.read().await;
        let products = self.products.read().await;
        let sources = self.sources.read().await;

        let mut by_source: HashMap<Uuid, SourceProfit> = HashMap::new();
        for item in orders.iter().flat_map(|o| o.products.iter()) {
            let Some(product) = products.iter().find(|p| p.id == item.product) else {
                continue;
            };
            let Some(source) = sources.iter().find(|s| s.id == product.source_id) else {
                continue;
            };
            let unit = item.adjusted_price.unwrap_or(product.price);
            let cost = item.buying_price.unwrap_or(product.buying_price);
            let entry = by_source.entry(source.id).or_insert_with(|| SourceProfit {
                source_id: source.id,
                name: source.name.clone(),
                total_profit: 0.0,
            });
            entry.total_profit += (unit - cost) * f64::from(item.quantity);
        }
        Ok(by_source.into_values().collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_source(name: &str) -> NewSource {
        NewSource {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_emails() {
        let store = MemoryStore::new();
        store.insert_user("a@b.co", "hash").await.unwrap();
        let err = store.insert_user("a@b.co", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn patch_keeps_absent_fields() {
        let store = MemoryStore::new();
        let created = store
            .insert_source(&NewSource {
                name: "Old".into(),
                description: Some("kept".into()),
            })
            .await
            .unwrap();
        let patch = SourcePatch {
            name: Some("New".into()),
            description: None,
        };
        let updated = store.update_source(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description.as_deref(), Some("kept"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn lists_in_insertion_order_and_reports_deletes() {
        let store = MemoryStore::new();
        let a = store.insert_source(&new_source("a")).await.unwrap();
        let b = store.insert_source(&new_source("b")).await.unwrap();
        let ids: Vec<_> = store.list_sources().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(store.delete_source(a.id).await.unwrap());
        assert!(!store.delete_source(a.id).await.unwrap());
        assert_eq!(store.count_sources().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failing_reads_surface_as_unavailable() {
        let store = MemoryStore::new();
        store.set_fail_reads(true).await;
        assert!(matches!(
            store.list_orders().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());
        store.set_fail_reads(false).await;
        assert!(store.ping().await.is_ok());
    }
}
