use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{AuthSession, Claim};
use crate::errors::{AppError, AppResult};
use crate::models::item::{Item, ItemCreateRequest, ItemUpdateRequest};
use crate::store::ItemStore;

#[utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    responses((status = 200, description = "The caller's notes", body = [Item])),
    security(("bearerAuth" = []))
)]
pub async fn list_notes(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<Item>>> {
    session.require_claim(Claim::ViewNote)?;
    let items = state.notes.list(session.user_id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Item),
        (status = 404, description = "No such note for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_note(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    session.require_claim(Claim::ViewNote)?;
    let item = state
        .notes
        .find(session.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("note not found"))?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    request_body = ItemCreateRequest,
    responses(
        (status = 201, description = "Note created", body = Item),
        (status = 400, description = "Blank title")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_note(
    State(state): State<AppState>,
    session: AuthSession,
    Json(draft): Json<ItemCreateRequest>,
) -> AppResult<(StatusCode, Json<Item>)> {
    session.require_claim(Claim::CreateNote)?;
    if draft.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be blank"));
    }
    let item = state.notes.insert(session.user_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = ItemUpdateRequest,
    responses(
        (status = 200, description = "Note updated", body = Item),
        (status = 404, description = "No such note for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_note(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(patch): Json<ItemUpdateRequest>,
) -> AppResult<Json<Item>> {
    session.require_claim(Claim::EditNote)?;
    let item = state
        .notes
        .update(session.user_id, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("note not found"))?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "No such note for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_note(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    session.require_claim(Claim::DeleteNote)?;
    if !state.notes.delete(session.user_id, id).await? {
        return Err(AppError::not_found("note not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
