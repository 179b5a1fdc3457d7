use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::item::{DbItem, Item, ItemCreateRequest, ItemUpdateRequest};
use crate::utils::utc_now;

use super::ItemStore;

/// One sqlite-backed store per table; notes and todo lists share the code
/// path and differ only in the table they read.
#[derive(Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
    table: &'static str,
}

impl SqliteItemStore {
    pub fn notes(pool: SqlitePool) -> Self {
        Self { pool, table: "notes" }
    }

    pub fn todo_lists(pool: SqlitePool) -> Self {
        Self {
            pool,
            table: "todo_lists",
        }
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn list(&self, owner: Uuid) -> AppResult<Vec<Item>> {
        let sql = format!(
            "SELECT id, user_id, title, description, created_at, updated_at FROM {} WHERE user_id = ? ORDER BY created_at DESC",
            self.table
        );

        let rows = sqlx::query_as::<_, DbItem>(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Item>> {
        let sql = format!(
            "SELECT id, user_id, title, description, created_at, updated_at FROM {} WHERE id = ? AND user_id = ?",
            self.table
        );

        let row = sqlx::query_as::<_, DbItem>(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Item::try_from).transpose()
    }

    async fn insert(&self, owner: Uuid, draft: &ItemCreateRequest) -> AppResult<Item> {
        let id = Uuid::new_v4();
        let now = utc_now();
        let sql = format!(
            "INSERT INTO {} (id, user_id, title, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            self.table
        );

        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(Item {
            id,
            user_id: owner,
            title: draft.title.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ItemUpdateRequest,
    ) -> AppResult<Option<Item>> {
        let Some(mut item) = self.find(owner, id).await? else {
            return Ok(None);
        };

        if let Some(title) = patch.title.as_ref() {
            item.title = title.clone();
        }
        if let Some(description) = patch.description.as_ref() {
            item.description = description.clone();
        }
        item.updated_at = utc_now();

        let sql = format!(
            "UPDATE {} SET title = ?, description = ?, updated_at = ? WHERE id = ? AND user_id = ?",
            self.table
        );

        sqlx::query(&sql)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.updated_at)
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Some(item))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ? AND user_id = ?", self.table);

        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
