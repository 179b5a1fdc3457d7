//! Identity provider seam.
//!
//! All durable identity state (users, roles, memberships, role-claims,
//! user-claims) lives behind [`IdentityStore`]. The permission resolver is
//! written against this trait, never against the database directly; the
//! sqlite implementation is the production store and tests substitute
//! scripted fakes to exercise the resolver's failure paths.

mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

use crate::authz::Claim;
use crate::errors::AppResult;
use crate::models::rbac::Role;
use crate::models::user::{DbUser, UserSummary};

pub use sqlite::SqliteIdentityStore;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    // Users
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<DbUser>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<DbUser>>;
    async fn create_user(&self, username: &str, email: &str, password_hash: &str)
        -> AppResult<DbUser>;
    async fn list_users(&self) -> AppResult<Vec<UserSummary>>;
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()>;

    // Roles
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;
    async fn list_roles(&self) -> AppResult<Vec<Role>>;
    async fn create_role(&self, name: &str) -> AppResult<Role>;
    /// Returns false when no role with that id exists. Deletion cascades to
    /// role-claims and memberships atomically.
    async fn delete_role(&self, id: Uuid) -> AppResult<bool>;

    // Role membership
    async fn user_roles(&self, user_id: Uuid) -> AppResult<Vec<String>>;
    async fn add_user_to_roles(&self, user_id: Uuid, roles: &[String]) -> AppResult<()>;
    async fn remove_user_from_roles(&self, user_id: Uuid, roles: &[String]) -> AppResult<()>;

    // Direct user-claims
    async fn user_claims(&self, user_id: Uuid) -> AppResult<Vec<Claim>>;
    async fn add_user_claims(&self, user_id: Uuid, claims: &[Claim]) -> AppResult<()>;
    async fn remove_user_claims(&self, user_id: Uuid, claims: &[Claim]) -> AppResult<()>;

    // Role-claims
    async fn role_claims(&self, role_name: &str) -> AppResult<Vec<Claim>>;
    async fn add_role_claims(&self, role_name: &str, claims: &[Claim]) -> AppResult<()>;
    /// Bulk-clear used by the role-claim table update, which rewrites the
    /// whole cross-product.
    async fn clear_all_role_claims(&self) -> AppResult<()>;
}
