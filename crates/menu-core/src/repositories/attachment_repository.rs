//! Dish attachment repository trait (port)

use async_trait::async_trait;

use crate::domain::{DishAttachment, NewDishAttachment};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn create(&self, attachment: &NewDishAttachment) -> Result<DishAttachment, DomainError>;
}
