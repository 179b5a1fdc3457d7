use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::authz::AuthSession;
use crate::errors::{AppError, AppResult};
use crate::identity::IdentityStore;
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User,
};
use crate::resolver::PermissionResolver;
use crate::utils::{hash_password, validate_password, verify_password};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if payload.username.trim().is_empty() {
        return Err(AppError::bad_request("username must not be blank"));
    }
    validate_password(&payload.password)?;
    if state
        .identity
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("email already in use"));
    }

    let password_hash = hash_password(&payload.password)?;
    let db_user = state
        .identity
        .create_user(&payload.username, &payload.email, &password_hash)
        .await?;

    let token = issue_token(&state, &db_user.username, db_user.parsed_id()?).await?;
    let user: User = db_user.try_into()?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let db_user = state
        .identity
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

    if !verify_password(&payload.password, &db_user.password_hash)? {
        return Err(AppError::unauthorized("invalid credentials"));
    }

    // The issued token carries the freshly resolved role and claim snapshot;
    // it is the session's permission set until refresh or re-login.
    let token = issue_token(&state, &db_user.username, db_user.parsed_id()?).await?;
    let user: User = db_user.try_into()?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Current user", body = User)),
    security(("bearerAuth" = []))
)]
pub async fn me(State(state): State<AppState>, session: AuthSession) -> AppResult<Json<User>> {
    let resolver = PermissionResolver::new(&state.identity);
    let db_user = resolver.require_user(session.user_id).await?;
    let user: User = db_user.try_into()?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password")
    ),
    security(("bearerAuth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resolver = PermissionResolver::new(&state.identity);
    let db_user = resolver.require_user(session.user_id).await?;

    if !verify_password(&payload.current_password, &db_user.password_hash)? {
        return Err(AppError::bad_request("current password is incorrect"));
    }

    // hash_password enforces the password policy before hashing.
    let new_hash = hash_password(&payload.new_password)?;
    state
        .identity
        .update_password(session.user_id, &new_hash)
        .await?;
    tracing::info!(user = %db_user.username, "password changed");

    Ok(Json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout acknowledged")),
    security(("bearerAuth" = []))
)]
pub async fn logout(_session: AuthSession) -> AppResult<Json<MessageResponse>> {
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

async fn issue_token(state: &AppState, username: &str, user_id: uuid::Uuid) -> AppResult<String> {
    let resolver = PermissionResolver::new(&state.identity);
    let (roles, claims) = resolver.session_snapshot(user_id).await?;
    state.jwt.encode(user_id, username, &roles, &claims)
}
