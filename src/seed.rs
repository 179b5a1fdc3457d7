//! Startup seeding.
//!
//! Runs on every boot and is idempotent: the three built-in roles and the
//! bootstrap SuperAdmin account are created only when missing, so pointing
//! the server at an existing database is safe.

use crate::errors::AppResult;
use crate::identity::{IdentityStore, SqliteIdentityStore};
use crate::utils::hash_password;
use sqlx::SqlitePool;

use crate::authz::roles;

const DEFAULT_USERNAME: &str = "superadmin";
const DEFAULT_EMAIL: &str = "superadmin@notelist.local";
const DEFAULT_PASSWORD: &str = "Sup3rAdmin!";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub async fn run(pool: &SqlitePool) -> AppResult<()> {
    let store = SqliteIdentityStore::new(pool.clone());
    seed_roles(&store).await?;
    seed_bootstrap_user(&store).await?;
    Ok(())
}

async fn seed_roles(store: &SqliteIdentityStore) -> AppResult<()> {
    for name in [roles::SUPER_ADMIN, roles::ADMIN, roles::USER] {
        if store.find_role_by_name(name).await?.is_none() {
            store.create_role(name).await?;
            tracing::info!(role = name, "seeded role");
        }
    }
    Ok(())
}

async fn seed_bootstrap_user(store: &SqliteIdentityStore) -> AppResult<()> {
    let username = env_or("SEED_SUPERADMIN_USERNAME", DEFAULT_USERNAME);
    let email = env_or("SEED_SUPERADMIN_EMAIL", DEFAULT_EMAIL);

    if store.find_user_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let password = env_or("SEED_SUPERADMIN_PASSWORD", DEFAULT_PASSWORD);
    let password_hash = hash_password(&password)?;
    let user = store.create_user(&username, &email, &password_hash).await?;
    store
        .add_user_to_roles(user.parsed_id()?, &[roles::SUPER_ADMIN.to_string()])
        .await?;
    tracing::info!(email = %email, "seeded bootstrap SuperAdmin");
    Ok(())
}
