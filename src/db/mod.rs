//! Item persistence.
//!
//! [`ItemStore`] is the seam between the service layer and storage. Two backends
//! implement it: [`PgItemStore`] for PostgreSQL and [`MemoryStore`] for tests and
//! database-free development runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Item, ItemChanges, NewItem};

pub use memory::MemoryStore;
pub use postgres::PgItemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, most recently created first (ties broken by id, highest first).
    async fn list_all(&self) -> StoreResult<Vec<Item>>;

    async fn find(&self, id: i64) -> StoreResult<Item>;

    /// Persist a new item; the store assigns `id`, `created_at` and `updated_at`.
    async fn insert(&self, item: &NewItem) -> StoreResult<Item>;

    /// Apply a partial update. An empty change set returns the record untouched.
    async fn update(&self, id: i64, changes: &ItemChanges) -> StoreResult<Item>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}
