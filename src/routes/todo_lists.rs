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
    path = "/todolists",
    tag = "TodoLists",
    responses((status = 200, description = "The caller's todo lists", body = [Item])),
    security(("bearerAuth" = []))
)]
pub async fn list_todo_lists(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<Vec<Item>>> {
    session.require_claim(Claim::ViewTodoList)?;
    let items = state.todo_lists.list(session.user_id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/todolists/{id}",
    tag = "TodoLists",
    params(("id" = Uuid, Path, description = "Todo list id")),
    responses(
        (status = 200, description = "The todo list", body = Item),
        (status = 404, description = "No such todo list for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_todo_list(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    session.require_claim(Claim::ViewTodoList)?;
    let item = state
        .todo_lists
        .find(session.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("todo list not found"))?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/todolists",
    tag = "TodoLists",
    request_body = ItemCreateRequest,
    responses(
        (status = 201, description = "Todo list created", body = Item),
        (status = 400, description = "Blank title")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_todo_list(
    State(state): State<AppState>,
    session: AuthSession,
    Json(draft): Json<ItemCreateRequest>,
) -> AppResult<(StatusCode, Json<Item>)> {
    session.require_claim(Claim::CreateTodoList)?;
    if draft.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be blank"));
    }
    let item = state.todo_lists.insert(session.user_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/todolists/{id}",
    tag = "TodoLists",
    params(("id" = Uuid, Path, description = "Todo list id")),
    request_body = ItemUpdateRequest,
    responses(
        (status = 200, description = "Todo list updated", body = Item),
        (status = 404, description = "No such todo list for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_todo_list(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(patch): Json<ItemUpdateRequest>,
) -> AppResult<Json<Item>> {
    session.require_claim(Claim::EditTodoList)?;
    let item = state
        .todo_lists
        .update(session.user_id, id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("todo list not found"))?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/todolists/{id}",
    tag = "TodoLists",
    params(("id" = Uuid, Path, description = "Todo list id")),
    responses(
        (status = 204, description = "Todo list deleted"),
        (status = 404, description = "No such todo list for this caller")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_todo_list(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    session.require_claim(Claim::DeleteTodoList)?;
    if !state.todo_lists.delete(session.user_id, id).await? {
        return Err(AppError::not_found("todo list not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
