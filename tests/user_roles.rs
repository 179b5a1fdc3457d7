mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

fn selected_roles(view: &Value) -> Vec<String> {
    view["roles"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["is_selected"].as_bool().unwrap())
        .map(|r| r["role_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn role_assignment_round_trips_and_is_idempotent() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;
    t.register("frank", "frank@example.com", "Passw0rd!").await?;
    let frank_id = t.user_id("frank@example.com").await?;

    let uri = format!("/admin/users/{frank_id}/roles");

    // Fresh users hold no roles; the view lists every role unchecked.
    let (status, view) = t.request("GET", &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK, "{view}");
    assert!(selected_roles(&view).is_empty());
    assert_eq!(view["roles"].as_array().unwrap().len(), 3);

    let form = json!([
        { "role_name": "SuperAdmin", "is_selected": false },
        { "role_name": "Admin", "is_selected": true },
        { "role_name": "User", "is_selected": true }
    ]);
    let (status, outcome) = t.request("PUT", &uri, Some(&admin), Some(form.clone())).await?;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["updated"], true);
    // The admin edited someone else, so no token reissue.
    assert!(outcome.get("refreshed_token").is_none());

    let (_, view) = t.request("GET", &uri, Some(&admin), None).await?;
    assert_eq!(selected_roles(&view), ["Admin", "User"]);

    // Posting the same form again lands in the same state.
    t.request("PUT", &uri, Some(&admin), Some(form)).await?;
    let (_, view) = t.request("GET", &uri, Some(&admin), None).await?;
    assert_eq!(selected_roles(&view), ["Admin", "User"]);
    Ok(())
}

#[tokio::test]
async fn deselecting_every_role_empties_membership() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;
    t.register("gina", "gina@example.com", "Passw0rd!").await?;
    let gina_id = t.user_id("gina@example.com").await?;
    let uri = format!("/admin/users/{gina_id}/roles");

    let grant = json!([{ "role_name": "User", "is_selected": true }]);
    t.request("PUT", &uri, Some(&admin), Some(grant)).await?;
    let (_, view) = t.request("GET", &uri, Some(&admin), None).await?;
    assert_eq!(selected_roles(&view), ["User"]);

    let revoke_all = json!([
        { "role_name": "SuperAdmin", "is_selected": false },
        { "role_name": "Admin", "is_selected": false },
        { "role_name": "User", "is_selected": false }
    ]);
    t.request("PUT", &uri, Some(&admin), Some(revoke_all)).await?;
    let (_, view) = t.request("GET", &uri, Some(&admin), None).await?;
    assert!(selected_roles(&view).is_empty());
    Ok(())
}

#[tokio::test]
async fn updating_unknown_user_is_not_found() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;

    let uri = format!("/admin/users/{}/roles", uuid::Uuid::new_v4());
    let (status, _) = t
        .request(
            "PUT",
            &uri,
            Some(&admin),
            Some(json!([{ "role_name": "User", "is_selected": true }])),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

// A session is a snapshot: editing your own roles hands back a reissued
// token, and only that token carries the new permissions.
#[tokio::test]
async fn self_role_update_returns_a_refreshed_token() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;
    let admin_id = t.user_id(common::SUPERADMIN_EMAIL).await?;
    let uri = format!("/admin/users/{admin_id}/roles");

    let form = json!([
        { "role_name": "SuperAdmin", "is_selected": true },
        { "role_name": "Admin", "is_selected": true },
        { "role_name": "User", "is_selected": false }
    ]);
    let (status, outcome) = t.request("PUT", &uri, Some(&admin), Some(form)).await?;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    let refreshed = outcome["refreshed_token"].as_str().unwrap();
    assert_ne!(refreshed, admin);

    // The reissued token still opens the SuperAdmin surface.
    let (status, _) = t.request("GET", "/roles", Some(refreshed), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn admin_surface_rejects_plain_admins() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;
    t.register("hank", "hank@example.com", "Passw0rd!").await?;
    let hank_id = t.user_id("hank@example.com").await?;

    // Make hank an Admin; Admin is enough for /claims but not /admin.
    let uri = format!("/admin/users/{hank_id}/roles");
    t.request(
        "PUT",
        &uri,
        Some(&admin),
        Some(json!([{ "role_name": "Admin", "is_selected": true }])),
    )
    .await?;

    let hank = t.login("hank@example.com", "Passw0rd!").await?;
    let (status, _) = t.request("GET", "/admin/users", Some(&hank), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = t.request("GET", "/claims/users", Some(&hank), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
