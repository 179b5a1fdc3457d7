use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::Claim;
use crate::errors::{AppError, AppResult};
use crate::models::rbac::{DbRole, Role};
use crate::models::user::{DbUser, UserSummary};
use crate::utils::utc_now;

use super::IdentityStore;

/// sqlite-backed identity store. Uuids are bound and read as TEXT.
#[derive(Clone)]
pub struct SqliteIdentityStore {
    pool: SqlitePool,
}

impl SqliteIdentityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn role_id_by_name(&self, name: &str) -> AppResult<String> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        id.ok_or_else(|| AppError::bad_request(format!("role does not exist: {name}")))
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<DbUser> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(DbUser {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash, created_at, updated_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id = row.parsed_id()?;
                Ok(UserSummary {
                    id,
                    username: row.username,
                    email: row.email,
                })
            })
            .collect()
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(utc_now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        // The name column is COLLATE NOCASE, so the match is case-insensitive.
        let role = sqlx::query_as::<_, DbRole>(
            "SELECT id, name, created_at FROM roles WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        role.map(Role::try_from).transpose()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        // Insertion order; the resolver renders roles exactly in this order.
        let roles = sqlx::query_as::<_, DbRole>(
            "SELECT id, name, created_at FROM roles ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        roles.into_iter().map(Role::try_from).collect()
    }

    async fn create_role(&self, name: &str) -> AppResult<Role> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query("INSERT INTO roles (id, name, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(Role {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<bool> {
        // Foreign keys cascade role_claims and user_roles rows in the same
        // statement.
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn user_roles(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = ?
            ORDER BY r.created_at, r.id
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn add_user_to_roles(&self, user_id: Uuid, roles: &[String]) -> AppResult<()> {
        for name in roles {
            let role_id = self.role_id_by_name(name).await?;
            sqlx::query(
                "INSERT OR IGNORE INTO user_roles (user_id, role_id, created_at) VALUES (?, ?, ?)",
            )
            .bind(user_id.to_string())
            .bind(role_id)
            .bind(utc_now())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn remove_user_from_roles(&self, user_id: Uuid, roles: &[String]) -> AppResult<()> {
        for name in roles {
            sqlx::query(
                "DELETE FROM user_roles WHERE user_id = ? AND role_id IN (SELECT id FROM roles WHERE name = ?)",
            )
            .bind(user_id.to_string())
            .bind(name)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn user_claims(&self, user_id: Uuid) -> AppResult<Vec<Claim>> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT claim FROM user_claims WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().filter_map(|raw| Claim::parse(raw)).collect())
    }

    async fn add_user_claims(&self, user_id: Uuid, claims: &[Claim]) -> AppResult<()> {
        for claim in claims {
            sqlx::query(
                "INSERT OR IGNORE INTO user_claims (user_id, claim, created_at) VALUES (?, ?, ?)",
            )
            .bind(user_id.to_string())
            .bind(claim.as_str())
            .bind(utc_now())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn remove_user_claims(&self, user_id: Uuid, claims: &[Claim]) -> AppResult<()> {
        for claim in claims {
            sqlx::query("DELETE FROM user_claims WHERE user_id = ? AND claim = ?")
                .bind(user_id.to_string())
                .bind(claim.as_str())
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn role_claims(&self, role_name: &str) -> AppResult<Vec<Claim>> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT rc.claim
            FROM role_claims rc
            INNER JOIN roles r ON r.id = rc.role_id
            WHERE r.name = ?
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(|raw| Claim::parse(raw)).collect())
    }

    async fn add_role_claims(&self, role_name: &str, claims: &[Claim]) -> AppResult<()> {
        let role_id = self.role_id_by_name(role_name).await?;

        for claim in claims {
            sqlx::query(
                "INSERT OR IGNORE INTO role_claims (role_id, claim, created_at) VALUES (?, ?, ?)",
            )
            .bind(&role_id)
            .bind(claim.as_str())
            .bind(utc_now())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn clear_all_role_claims(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM role_claims")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
