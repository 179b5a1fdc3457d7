//! Generic keyed item storage.
//!
//! Notes and todo lists are the same shape stored in different tables, so
//! one capability-style interface covers both: handlers hold an
//! [`ItemStore`] and never know which table is behind it.

mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::item::{Item, ItemCreateRequest, ItemUpdateRequest};

pub use sqlite::SqliteItemStore;

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self, owner: Uuid) -> AppResult<Vec<Item>>;
    async fn find(&self, owner: Uuid, id: Uuid) -> AppResult<Option<Item>>;
    async fn insert(&self, owner: Uuid, draft: &ItemCreateRequest) -> AppResult<Item>;
    /// Returns the updated item, or None when the id does not resolve for
    /// this owner.
    async fn update(&self, owner: Uuid, id: Uuid, patch: &ItemUpdateRequest)
        -> AppResult<Option<Item>>;
    /// Returns false when the id does not resolve for this owner.
    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool>;
}
