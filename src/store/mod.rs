//! Persistence layer.
//!
//! Each domain module declares its own repository trait next to its SQL
//! (`sources::repo::SourceRepo`, ...). [`Store`] bundles them so handlers only
//! carry one injected handle. [`PgStore`] is the production implementation;
//! the test suite runs against `memory::MemoryStore`.

#[cfg(test)]
pub mod memory;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub use crate::auth::repo::UserRepo;
pub use crate::orders::repo::OrderRepo;
pub use crate::products::repo::ProductRepo;
pub use crate::sources::repo::SourceRepo;
pub use crate::stats::repo::StatsRepo;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: UserRepo + SourceRepo + ProductRepo + OrderRepo + StatsRepo + Send + Sync {
    /// Round trip to the backing store.
    async fn ping(&self) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable("connection pool closed".into()));
        }
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps a unique-index violation to [`StoreError::Duplicate`].
pub(crate) fn map_unique(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(what.to_string())
        }
        _ => StoreError::Database(e),
    }
}
