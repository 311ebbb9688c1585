use async_trait::async_trait;
use sqlx::PgPool;

use super::{ItemStore, StoreError, StoreResult};
use crate::models::{Item, ItemChanges, NewItem};

#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded migrations in `./migrations`.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity, created_at, updated_at
            FROM items
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find(&self, id: i64) -> StoreResult<Item> {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, quantity, created_at, updated_at
             FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, item: &NewItem) -> StoreResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, quantity)
            VALUES ($1, $2)
            RETURNING id, name, quantity, created_at, updated_at
            "#,
        )
        .bind(&item.name)
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, id: i64, changes: &ItemChanges) -> StoreResult<Item> {
        if changes.is_empty() {
            return self.find(id).await;
        }

        // Single statement: the row lookup and the write are atomic
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name       = COALESCE($1, name),
                quantity   = COALESCE($2, quantity),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, quantity, created_at, updated_at
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
