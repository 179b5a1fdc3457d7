mod common;

use anyhow::Result;
use axum::http::StatusCode;

// Kept alone in this binary: the seed env overrides are process-wide.
#[tokio::test]
async fn bootstrap_account_honors_env_overrides() -> Result<()> {
    std::env::set_var("SEED_SUPERADMIN_USERNAME", "root");
    std::env::set_var("SEED_SUPERADMIN_EMAIL", "root@corp.example");
    std::env::set_var("SEED_SUPERADMIN_PASSWORD", "R00t&Pass!");

    let t = common::setup().await?;

    let token = t.login("root@corp.example", "R00t&Pass!").await?;
    let (status, me) = t.request("GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "root");

    // The overridden account is the seeded SuperAdmin.
    let (status, _) = t.request("GET", "/roles", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
