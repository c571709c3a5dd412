//! Dish attachment upload.
//!
//! Files of one batch are independent inserts: a rejected file stops the batch
//! but files stored before it stay persisted.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{error, info, warn};

use menu_shared::EntityId;

use crate::domain::{attachment_dir, Dish, DishAttachment, NewDishAttachment, UploadedFile};
use crate::error::DomainError;
use crate::ports::FileStorage;
use crate::repositories::{AttachmentRepository, DishRepository};

pub struct AttachmentService {
    dishes: Arc<dyn DishRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    storage: Arc<dyn FileStorage>,
    max_upload_size: u64,
    time_zone: Tz,
}

impl AttachmentService {
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        storage: Arc<dyn FileStorage>,
        max_upload_size: u64,
        time_zone: Tz,
    ) -> Self {
        Self {
            dishes,
            attachments,
            storage,
            max_upload_size,
            time_zone,
        }
    }

    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    pub async fn upload(
        &self,
        dish_id: EntityId,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<DishAttachment>, DomainError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        if self.dishes.find_by_id(dish_id).await?.is_none() {
            warn!("Attachment upload rejected: dish {} does not exist", dish_id);
            return Err(DomainError::invalid(
                "id",
                format!("{} with id {} does not exist.", Dish::RESOURCE, dish_id),
            ));
        }

        let dir = attachment_dir(Utc::now().with_timezone(&self.time_zone).date_naive());
        let mut stored = Vec::with_capacity(files.len());

        for file in files {
            if let Err(message) = file.validate_size(self.max_upload_size) {
                warn!(
                    "Attachment {} rejected for dish {}: {} bytes",
                    file.file_name,
                    dish_id,
                    file.size()
                );
                return Err(DomainError::invalid("file", message));
            }

            let path = self
                .storage
                .save(&dir, &file.sanitized_name(), &file.contents)
                .await?;

            let record = NewDishAttachment {
                dish_id,
                file: path.clone(),
            };
            match self.attachments.create(&record).await {
                Ok(attachment) => {
                    info!("Attachment {} stored for dish {}", attachment.file, dish_id);
                    stored.push(attachment);
                }
                Err(e) => {
                    if let Err(cleanup) = self.storage.remove(&path).await {
                        error!("Failed to remove orphaned file {}: {}", path, cleanup);
                    }
                    return Err(e);
                }
            }
        }

        Ok(stored)
    }
}
