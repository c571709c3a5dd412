//! Unauthenticated menu listing.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use menu_core::services::{ListingParams, ListingQuery};

use crate::dto::MenuDto;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/public/menu
pub async fn list_public_menus(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<Vec<MenuDto>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = ListingQuery::parse(params, state.time_zone).map_err(|details| {
        ApiError::BadRequest {
            message: "Invalid query parameters".to_string(),
            details: Some(details),
        }
    })?;

    let menus = state.listing.list(&query).await?;
    Ok(Json(
        menus.iter().map(|m| MenuDto::new(m, state.time_zone)).collect(),
    ))
}
