//! Dish attachment upload (multipart).

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use menu_core::domain::UploadedFile;
use menu_core::validation::REQUIRED;
use menu_shared::EntityId;

use crate::error::ApiError;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/private/dish/add-attachment
///
/// Form fields: `id` (dish id) and any number of `files` parts.
pub async fn upload_attachments(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut dish_id: Option<String> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                dish_id = Some(text);
            }
            "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let contents = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_field("file", e.body_text()))?;
                files.push(UploadedFile::new(file_name, contents.to_vec()));
            }
            _ => {}
        }
    }

    if !files.is_empty() {
        let dish_id = parse_dish_id(dish_id)?;
        let stored = state
            .attachments
            .upload(dish_id, files)
            .await
            .map_err(ApiError::from_domain_as_bad_request)?;
        info!("{} attachments added to dish {}", stored.len(), dish_id);
    }

    Ok((StatusCode::CREATED, Json(MessageResponse::new("success"))))
}

fn parse_dish_id(raw: Option<String>) -> Result<EntityId, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::invalid_field("id", REQUIRED))?;
    raw.trim()
        .parse::<EntityId>()
        .map_err(|_| ApiError::invalid_field("id", "A valid integer is required."))
}
