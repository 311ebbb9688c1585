use std::sync::Arc;

use tracing::debug;

use crate::db::{ItemStore, StoreResult};
use crate::models::{Item, ItemChanges, NewItem};

/// Business layer over an [`ItemStore`]. Inputs are expected to be validated
/// already; absence surfaces as [`crate::db::StoreError::NotFound`].
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Item>> {
        self.store.list_all().await
    }

    pub async fn find(&self, id: i64) -> StoreResult<Item> {
        self.store.find(id).await
    }

    pub async fn create(&self, data: NewItem) -> StoreResult<Item> {
        self.store.insert(&data).await
    }

    pub async fn update(&self, id: i64, changes: ItemChanges) -> StoreResult<Item> {
        if changes.is_empty() {
            debug!(id, "Update carried no changes");
        }
        self.store.update(id, &changes).await
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.store.delete(id).await
    }
}
