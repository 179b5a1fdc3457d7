use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{roles, AuthSession};
use crate::errors::AppResult;
use crate::identity::IdentityStore;
use crate::models::rbac::{ClaimSelection, UpdateOutcome, UserClaimView};
use crate::models::user::UserSummary;
use crate::resolver::PermissionResolver;
use crate::routes::admin::reissue_for_self;

#[utoipa::path(
    get,
    path = "/claims/users",
    tag = "Claims",
    responses((status = 200, description = "User directory", body = [UserSummary])),
    security(("bearerAuth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<UserSummary>>> {
    session.require_role_any(&[roles::SUPER_ADMIN, roles::ADMIN])?;
    let users = state.identity.list_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/claims/users/{id}",
    tag = "Claims",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Effective claim checklist for the user", body = UserClaimView),
        (status = 404, description = "No such user")
    ),
    security(("bearerAuth" = []))
)]
pub async fn user_claim_view(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserClaimView>> {
    session.require_role_any(&[roles::SUPER_ADMIN, roles::ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    let user = resolver.require_user(id).await?;
    let view = resolver.user_claim_view(&user).await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/claims/users/{id}",
    tag = "Claims",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = [ClaimSelection],
    responses(
        (status = 200, description = "Direct claims rewritten", body = UpdateOutcome),
        (status = 404, description = "No such user")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_user_claims(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(selections): Json<Vec<ClaimSelection>>,
) -> AppResult<Json<UpdateOutcome>> {
    session.require_role_any(&[roles::SUPER_ADMIN, roles::ADMIN])?;
    let resolver = PermissionResolver::new(&state.identity);
    let user = resolver.require_user(id).await?;
    resolver.update_user_claims(id, &selections).await?;
    tracing::info!(user = %user.username, "user claims updated");

    let refreshed_token = reissue_for_self(&state, &session, id, &user.username).await?;
    Ok(Json(UpdateOutcome {
        updated: true,
        refreshed_token,
    }))
}
