use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ItemStore, StoreError, StoreResult};
use crate::models::{Item, ItemChanges, NewItem};

/// Process-local store. Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<i64, Item>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        let inner = self.inner.read().await;
        let mut items: Vec<Item> = inner.items.values().cloned().collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn find(&self, id: i64) -> StoreResult<Item> {
        self.inner
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, item: &NewItem) -> StoreResult<Item> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let item = Item {
            id: inner.last_id,
            name: item.name.clone(),
            quantity: item.quantity,
            created_at: now,
            updated_at: now,
        };
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: i64, changes: &ItemChanges) -> StoreResult<Item> {
        let mut inner = self.inner.write().await;
        let item = inner.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.apply(changes, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
