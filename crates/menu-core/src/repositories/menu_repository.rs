//! Menu repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use menu_shared::EntityId;

use crate::domain::{Menu, MenuPatch, NewMenu};
use crate::error::DomainError;

/// Conditions of the public listing, all optional and combined with AND.
///
/// Date bounds are inclusive. Implementations only ever return menus owning at least one dish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub name_contains: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub updated_from: Option<DateTime<Utc>>,
    pub updated_to: Option<DateTime<Utc>>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// All menus in ascending id order.
    async fn list(&self) -> Result<Vec<Menu>, DomainError>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Menu>, DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Menu>, DomainError>;
    async fn create(&self, menu: &NewMenu) -> Result<Menu, DomainError>;
    /// Merges `patch` into the stored row inside one transaction; `None` when the id is absent.
    async fn update(&self, id: EntityId, patch: &MenuPatch) -> Result<Option<Menu>, DomainError>;
    /// Returns whether a row was removed. Dishes and attachments cascade.
    async fn delete(&self, id: EntityId) -> Result<bool, DomainError>;
    /// Non-empty menus matching `filter`, in ascending id order.
    async fn search_non_empty(&self, filter: &MenuFilter) -> Result<Vec<Menu>, DomainError>;
}
