use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{roles, AuthSession};
use crate::errors::AppResult;
use crate::identity::IdentityStore;
use crate::models::rbac::{RoleClaimView, RoleSelection, UpdateOutcome, UserRoleView};
use crate::models::user::UserSummary;
use crate::resolver::PermissionResolver;

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    responses((status = 200, description = "User directory", body = [UserSummary])),
    security(("bearerAuth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<UserSummary>>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let users = state.identity.list_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}/roles",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Role checklist for the user", body = UserRoleView),
        (status = 404, description = "No such user")
    ),
    security(("bearerAuth" = []))
)]
pub async fn user_role_view(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserRoleView>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    let user = resolver.require_user(id).await?;
    let view = resolver.user_role_view(&user).await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}/roles",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = [RoleSelection],
    responses(
        (status = 200, description = "Role membership rewritten", body = UpdateOutcome),
        (status = 404, description = "No such user")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_user_roles(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(selections): Json<Vec<RoleSelection>>,
) -> AppResult<Json<UpdateOutcome>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    let user = resolver.require_user(id).await?;
    resolver.update_user_roles(id, &selections).await?;
    tracing::info!(user = %user.username, "user roles updated");

    let refreshed_token = reissue_for_self(&state, &session, id, &user.username).await?;
    Ok(Json(UpdateOutcome {
        updated: true,
        refreshed_token,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/role-claims",
    tag = "Admin",
    responses((status = 200, description = "Claim checklist per role", body = [RoleClaimView])),
    security(("bearerAuth" = []))
)]
pub async fn role_claim_views(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<RoleClaimView>>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    let views = resolver.role_claim_views().await?;
    Ok(Json(views))
}

#[utoipa::path(
    put,
    path = "/admin/role-claims",
    tag = "Admin",
    request_body = [RoleClaimView],
    responses((status = 200, description = "Role-claim table rewritten", body = UpdateOutcome)),
    security(("bearerAuth" = []))
)]
pub async fn update_role_claims(
    State(state): State<AppState>,
    session: AuthSession,
    Json(forms): Json<Vec<RoleClaimView>>,
) -> AppResult<Json<UpdateOutcome>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    resolver.update_role_claims(&forms).await?;
    tracing::info!(roles = forms.len(), "role-claim table rewritten");

    // Role-claim edits change the caller's own derived permissions too, so
    // hand the acting admin a token cut from the new state.
    let refreshed_token =
        reissue_for_self(&state, &session, session.user_id, &session.username).await?;
    Ok(Json(UpdateOutcome {
        updated: true,
        refreshed_token,
    }))
}

/// A session is a snapshot; when the acting caller edits permissions that
/// cover their own account, reissue their token so the change takes effect
/// without a re-login. Edits to other users leave the caller's token alone.
pub(crate) async fn reissue_for_self(
    state: &AppState,
    session: &AuthSession,
    target_id: Uuid,
    username: &str,
) -> AppResult<Option<String>> {
    if session.user_id != target_id {
        return Ok(None);
    }
    let resolver = PermissionResolver::new(&state.identity);
    let (roles, claims) = resolver.session_snapshot(target_id).await?;
    let token = state.jwt.encode(target_id, username, &roles, &claims)?;
    Ok(Some(token))
}
