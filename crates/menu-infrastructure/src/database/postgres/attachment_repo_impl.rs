//! PostgreSQL dish attachment repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use menu_core::domain::{Dish, DishAttachment, NewDishAttachment};
use menu_core::error::DomainError;
use menu_core::repositories::AttachmentRepository;

use super::{db_error, is_foreign_key_violation};

pub struct PgAttachmentRepository {
    pool: PgPool,
}

impl PgAttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DishAttachmentRow {
    pub id: i64,
    pub dish_id: i64,
    pub file: String,
    pub created_dt: DateTime<Utc>,
}

impl From<DishAttachmentRow> for DishAttachment {
    fn from(row: DishAttachmentRow) -> Self {
        DishAttachment {
            id: row.id,
            dish_id: row.dish_id,
            file: row.file,
            created_dt: row.created_dt,
        }
    }
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    async fn create(&self, attachment: &NewDishAttachment) -> Result<DishAttachment, DomainError> {
        let row: DishAttachmentRow = sqlx::query_as(
            r#"
            INSERT INTO dish_attachments (dish_id, file)
            VALUES ($1, $2)
            RETURNING id, dish_id, file, created_dt
            "#,
        )
        .bind(attachment.dish_id)
        .bind(&attachment.file)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // the dish may have been deleted between the lookup and the insert
            if is_foreign_key_violation(&e) {
                return DomainError::invalid(
                    "id",
                    format!("{} with id {} does not exist.", Dish::RESOURCE, attachment.dish_id),
                );
            }
            db_error("inserting dish attachment", e)
        })?;

        Ok(row.into())
    }
}
