use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

/// A note or a todo list: both share this shape and are owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbItem {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbItem> for Item {
    type Error = AppError;

    fn try_from(value: DbItem) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id)
            .map_err(|err| AppError::internal(format!("invalid item id in store: {err}")))?;
        let user_id = Uuid::parse_str(&value.user_id)
            .map_err(|err| AppError::internal(format!("invalid owner id in store: {err}")))?;
        Ok(Item {
            id,
            user_id,
            title: value.title,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemCreateRequest {
    #[schema(example = "Groceries")]
    pub title: String,
    #[schema(example = "Milk, eggs, bread")]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
