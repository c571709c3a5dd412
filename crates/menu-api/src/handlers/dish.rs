//! Private CRUD endpoints for dishes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use menu_core::domain::{DishInput, DishPatchInput};
use menu_shared::EntityId;

use crate::dto::DishDto;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/private/dish
pub async fn list_dishes(State(state): State<AppState>) -> Result<Json<Vec<DishDto>>, ApiError> {
    let dishes = state.dishes.list().await?;
    Ok(Json(
        dishes.iter().map(|d| DishDto::new(d, state.time_zone)).collect(),
    ))
}

/// GET /api/private/dish/{id}
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<DishDto>>, ApiError> {
    let dish = state.dishes.get(id).await?;
    Ok(Json(ApiResponse::success(DishDto::new(&dish, state.time_zone))))
}

/// POST /api/private/dish
pub async fn create_dish(
    State(state): State<AppState>,
    payload: Result<Json<DishInput>, JsonRejection>,
) -> Result<Json<ApiResponse<DishDto>>, ApiError> {
    let Json(input) = payload?;
    let dish = state.dishes.create(input).await?;
    Ok(Json(ApiResponse::success(DishDto::new(&dish, state.time_zone))))
}

/// PATCH /api/private/dish/{id}
pub async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    payload: Result<Json<DishPatchInput>, JsonRejection>,
) -> Result<Json<ApiResponse<DishDto>>, ApiError> {
    let Json(patch) = payload?;
    let dish = state.dishes.update(id, patch).await?;
    Ok(Json(ApiResponse::success(DishDto::new(&dish, state.time_zone))))
}

/// DELETE /api/private/dish/{id}
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, ApiError> {
    state.dishes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
