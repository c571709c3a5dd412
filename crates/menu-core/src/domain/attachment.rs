//! Dish attachment entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use menu_shared::constants::ATTACHMENT_DIR;
use menu_shared::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishAttachment {
    pub id: EntityId,
    pub dish_id: EntityId,
    /// Path of the stored blob, relative to the media root.
    pub file: String,
    pub created_dt: DateTime<Utc>,
}

impl DishAttachment {
    pub const RESOURCE: &'static str = "DishAttachment";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDishAttachment {
    pub dish_id: EntityId,
    pub file: String,
}

/// A file received from a client, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn validate_size(&self, max_upload_size: u64) -> Result<(), String> {
        if self.size() > max_upload_size {
            return Err(format!(
                "File size must be no more than {} bytes (got {} bytes).",
                max_upload_size,
                self.size()
            ));
        }
        Ok(())
    }

    /// Strips any directory component a client may have sent along with the name.
    pub fn sanitized_name(&self) -> String {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        match name {
            "" | "." | ".." => "upload".to_string(),
            other => other.to_string(),
        }
    }
}

/// Relative storage directory for a file uploaded on `date`: `dish_attachments/YYYY/MM/DD`.
pub fn attachment_dir(date: NaiveDate) -> String {
    format!("{}/{}", ATTACHMENT_DIR, date.format("%Y/%m/%d"))
}
