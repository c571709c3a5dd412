// ============================================================================
// Menu API - Menu Handlers
// File: crates/menu-api/src/handlers/menu.rs
// ============================================================================
//! Private CRUD endpoints for menus.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use menu_core::domain::{MenuInput, MenuPatch};
use menu_shared::EntityId;

use crate::dto::MenuDto;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/private/menu
pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<MenuDto>>, ApiError> {
    let menus = state.menus.list().await?;
    Ok(Json(
        menus.iter().map(|m| MenuDto::new(m, state.time_zone)).collect(),
    ))
}

/// GET /api/private/menu/{id}
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<MenuDto>>, ApiError> {
    let menu = state.menus.get(id).await?;
    Ok(Json(ApiResponse::success(MenuDto::new(&menu, state.time_zone))))
}

/// POST /api/private/menu
pub async fn create_menu(
    State(state): State<AppState>,
    payload: Result<Json<MenuInput>, JsonRejection>,
) -> Result<Json<ApiResponse<MenuDto>>, ApiError> {
    let Json(input) = payload?;
    let menu = state.menus.create(input).await?;
    Ok(Json(ApiResponse::success(MenuDto::new(&menu, state.time_zone))))
}

/// PATCH /api/private/menu/{id}
pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    payload: Result<Json<MenuPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<MenuDto>>, ApiError> {
    let Json(patch) = payload?;
    let menu = state.menus.update(id, patch).await?;
    Ok(Json(ApiResponse::success(MenuDto::new(&menu, state.time_zone))))
}

/// DELETE /api/private/menu/{id}
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, ApiError> {
    state.menus.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
