use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core inventory record. `id` and both timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Merge `changes` into this record, refreshing `updated_at`.
    /// Returns `false` (and leaves the record untouched) when there is nothing to apply.
    pub fn apply(&mut self, changes: &ItemChanges, now: DateTime<Utc>) -> bool {
        if changes.is_empty() {
            return false;
        }
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        self.updated_at = now;
        true
    }
}

// ── Request payloads (already validated) ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub quantity: i32,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub quantity: Option<i32>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }
}
