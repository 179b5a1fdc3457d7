mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use note_list::authz::Claim;
use note_list::identity::IdentityStore;

#[tokio::test]
async fn role_crud_is_superadmin_only() -> Result<()> {
    let t = common::setup().await?;
    let user_token = t.register("ron", "ron@example.com", "Passw0rd!").await?;

    let (status, _) = t.request("GET", "/roles", Some(&user_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.request("GET", "/roles", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = t.superadmin_token().await?;
    let (status, body) = t.request("GET", "/roles", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(())
}

#[tokio::test]
async fn roles_list_in_creation_order() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;

    for name in ["Zeta", "Alpha", "Middle"] {
        let (status, _) = t
            .request("POST", "/roles", Some(&admin), Some(json!({ "name": name })))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = t.request("GET", "/roles", Some(&admin), None).await?;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    // Seeded roles first, then the three new ones in insertion order.
    assert_eq!(
        names,
        ["SuperAdmin", "Admin", "User", "Zeta", "Alpha", "Middle"]
    );
    Ok(())
}

#[tokio::test]
async fn blank_and_duplicate_role_names_are_rejected() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;

    let (status, _) = t
        .request("POST", "/roles", Some(&admin), Some(json!({ "name": "   " })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .request("POST", "/roles", Some(&admin), Some(json!({ "name": "Sales" })))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    // Duplicate detection is case-insensitive.
    let (status, _) = t
        .request("POST", "/roles", Some(&admin), Some(json!({ "name": "sales" })))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

// A create racing past the handler's duplicate check hits the UNIQUE
// constraint directly; that must still surface as a conflict, not a 500.
#[tokio::test]
async fn unique_violation_surfaces_as_conflict() -> Result<()> {
    let t = common::setup().await?;

    t.identity
        .create_role("Sales")
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    let err = t.identity.create_role("sales").await.unwrap_err();
    assert!(matches!(err, note_list::errors::AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn deleting_unknown_role_is_not_found() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;

    let (status, _) = t
        .request(
            "DELETE",
            &format!("/roles/{}", uuid::Uuid::new_v4()),
            Some(&admin),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

// Deleting a role removes its claim grants and memberships with it: a member
// who only held a claim through that role loses it.
#[tokio::test]
async fn role_deletion_cascades_to_claims_and_memberships() -> Result<()> {
    let t = common::setup().await?;
    let admin = t.superadmin_token().await?;

    let (status, role) = t
        .request("POST", "/roles", Some(&admin), Some(json!({ "name": "Editors" })))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let role_id = role["id"].as_str().unwrap().to_string();

    t.identity
        .add_role_claims("Editors", &[Claim::EditNote, Claim::ViewNote])
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    t.register("eve", "eve@example.com", "Passw0rd!").await?;
    let eve_id = t.user_id("eve@example.com").await?;
    let eve_uuid = uuid::Uuid::parse_str(&eve_id)?;
    t.identity
        .add_user_to_roles(eve_uuid, &["Editors".to_string()])
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let (_, view) = t
        .request("GET", &format!("/claims/users/{eve_id}"), Some(&admin), None)
        .await?;
    let selected: Vec<&str> = view["claims"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["is_selected"].as_bool().unwrap())
        .map(|c| c["claim"].as_str().unwrap())
        .collect();
    assert_eq!(selected, ["Edit Note", "View Note"]);

    let (status, _) = t
        .request("DELETE", &format!("/roles/{role_id}"), Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let roles = t
        .identity
        .user_roles(eve_uuid)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    assert!(roles.is_empty());

    let (_, view) = t
        .request("GET", &format!("/claims/users/{eve_id}"), Some(&admin), None)
        .await?;
    assert!(view["claims"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| !c["is_selected"].as_bool().unwrap()));
    Ok(())
}
