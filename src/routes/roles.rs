use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{roles, AuthSession};
use crate::errors::{AppError, AppResult};
use crate::identity::IdentityStore;
use crate::models::rbac::{CreateRoleRequest, Role};

#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    responses((status = 200, description = "All roles in creation order", body = [Role])),
    security(("bearerAuth" = []))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<Role>>> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;
    let roles = state.identity.list_roles().await?;
    Ok(Json(roles))
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Blank role name"),
        (status = 409, description = "Role already exists")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<Role>)> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("role name must not be blank"));
    }
    // Lookup is case-insensitive, so "admin" collides with "Admin".
    if state.identity.find_role_by_name(name).await?.is_some() {
        return Err(AppError::conflict(format!("role '{name}' already exists")));
    }

    let role = state.identity.create_role(name).await?;
    tracing::info!(role = %role.name, "role created");
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = Uuid, Path, description = "Role id")),
    responses(
        (status = 204, description = "Role deleted along with its claims and memberships"),
        (status = 404, description = "No such role")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    session.require_role_any(&[roles::SUPER_ADMIN])?;

    if !state.identity.delete_role(id).await? {
        return Err(AppError::not_found("role not found"));
    }
    tracing::info!(role_id = %id, "role deleted");
    Ok(StatusCode::NO_CONTENT)
}
