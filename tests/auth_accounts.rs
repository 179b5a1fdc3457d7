mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_then_login_round_trip() -> Result<()> {
    let t = common::setup().await?;

    let (status, body) = t
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Passw0rd!"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["username"], "alice");

    let token = t.login("alice@example.com", "Passw0rd!").await?;

    let (status, me) = t.request("GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let t = common::setup().await?;
    t.register("bob", "bob@example.com", "Passw0rd!").await?;

    let (status, _) = t
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "bob2",
                "email": "bob@example.com",
                "password": "Passw0rd!"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn weak_passwords_are_rejected() -> Result<()> {
    let t = common::setup().await?;

    // short, no digit, no upper, no lower, no symbol
    for password in ["Ab1!", "Password!", "passw0rd!", "PASSW0RD!", "Passw0rd"] {
        let (status, body) = t
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "username": "carol",
                    "email": "carol@example.com",
                    "password": password
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{password}: {body}");
    }
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let t = common::setup().await?;
    t.register("dave", "dave@example.com", "Passw0rd!").await?;

    let (status, _) = t
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "dave@example.com", "password": "Wr0ngPass!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "Passw0rd!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn change_password_rotates_credentials() -> Result<()> {
    let t = common::setup().await?;
    let token = t.register("paula", "paula@example.com", "Passw0rd!").await?;

    // Requires an authenticated session.
    let (status, _) = t
        .request(
            "POST",
            "/auth/change-password",
            None,
            Some(json!({ "current_password": "Passw0rd!", "new_password": "N3wPassw0rd!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong current password.
    let (status, _) = t
        .request(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": "Wr0ngPass!", "new_password": "N3wPassw0rd!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // New password still has to satisfy the policy.
    let (status, _) = t
        .request(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": "Passw0rd!", "new_password": "weak" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = t
        .request(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": "Passw0rd!", "new_password": "N3wPassw0rd!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");

    // The old credential is dead, the new one logs in.
    let (status, _) = t
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "paula@example.com", "password": "Passw0rd!" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    t.login("paula@example.com", "N3wPassw0rd!").await?;
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let t = common::setup().await?;
    let (status, body) = t.request("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}
