//! Dish repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use menu_shared::EntityId;

use crate::domain::{Dish, DishPatch, NewDish};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Dish>, DomainError>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Dish>, DomainError>;
    async fn find_by_name_in_menu(&self, name: &str, menu_id: EntityId) -> Result<Option<Dish>, DomainError>;
    /// Dishes of the given menus, ordered by id.
    async fn list_by_menus(&self, menu_ids: &[EntityId]) -> Result<Vec<Dish>, DomainError>;
    async fn create(&self, dish: &NewDish) -> Result<Dish, DomainError>;
    async fn update(&self, id: EntityId, patch: &DishPatch) -> Result<Option<Dish>, DomainError>;
    async fn delete(&self, id: EntityId) -> Result<bool, DomainError>;
    /// Dishes whose `created_dt` lies in `[start, end]`.
    async fn created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError>;
    /// Dishes whose `updated_dt` lies in `[start, end]`.
    async fn updated_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Dish>, DomainError>;
}
