// ============================================================================
// Menu Core - Menu Service
// File: crates/menu-core/src/services/menu_service.rs
// ============================================================================
//! CRUD over menus. Every representation carries the menu's dishes.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use menu_shared::EntityId;

use crate::domain::{Menu, MenuDetail, MenuInput, MenuPatch, NewMenu};
use crate::error::DomainError;
use crate::repositories::{DishRepository, MenuRepository};

pub const DUPLICATE_MENU_NAME: &str = "menu with this name already exists.";

pub struct MenuService {
    menus: Arc<dyn MenuRepository>,
    dishes: Arc<dyn DishRepository>,
}

impl MenuService {
    pub fn new(menus: Arc<dyn MenuRepository>, dishes: Arc<dyn DishRepository>) -> Self {
        Self { menus, dishes }
    }

    pub async fn list(&self) -> Result<Vec<MenuDetail>, DomainError> {
        let menus = self.menus.list().await?;
        attach_dishes(self.dishes.as_ref(), menus).await
    }

    pub async fn get(&self, id: EntityId) -> Result<MenuDetail, DomainError> {
        let menu = self
            .menus
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Menu::RESOURCE, id))?;
        self.detail(menu).await
    }

    pub async fn create(&self, input: MenuInput) -> Result<MenuDetail, DomainError> {
        let new_menu = input.into_new_menu()?;

        if self.menus.find_by_name(&new_menu.name).await?.is_some() {
            warn!("Menu creation rejected: name already exists: {}", new_menu.name);
            return Err(DomainError::invalid("name", DUPLICATE_MENU_NAME));
        }

        let menu = self.menus.create(&new_menu).await?;
        info!("Menu created: {} ({})", menu.name, menu.id);
        Ok(MenuDetail { menu, dishes: Vec::new() })
    }

    pub async fn update(&self, id: EntityId, patch: MenuPatch) -> Result<MenuDetail, DomainError> {
        let patch = patch.normalized();
        let current = self
            .menus
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Menu::RESOURCE, id))?;

        let mut merged = current.clone();
        merged.apply(&patch);
        NewMenu::from(&merged).validate()?;

        if merged.name != current.name {
            if let Some(other) = self.menus.find_by_name(&merged.name).await? {
                if other.id != id {
                    return Err(DomainError::invalid("name", DUPLICATE_MENU_NAME));
                }
            }
        }

        let menu = self
            .menus
            .update(id, &patch)
            .await?
            .ok_or_else(|| DomainError::not_found(Menu::RESOURCE, id))?;
        info!("Menu updated: {}", id);
        self.detail(menu).await
    }

    /// Deleting an absent menu is not an error.
    pub async fn delete(&self, id: EntityId) -> Result<(), DomainError> {
        if self.menus.delete(id).await? {
            info!("Menu deleted: {}", id);
        }
        Ok(())
    }

    async fn detail(&self, menu: Menu) -> Result<MenuDetail, DomainError> {
        let dishes = self.dishes.list_by_menus(&[menu.id]).await?;
        Ok(MenuDetail { menu, dishes })
    }
}

/// Loads the dishes of `menus` in one round trip and nests them.
pub(crate) async fn attach_dishes(
    dishes: &dyn DishRepository,
    menus: Vec<Menu>,
) -> Result<Vec<MenuDetail>, DomainError> {
    if menus.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<EntityId> = menus.iter().map(|m| m.id).collect();
    let dishes = dishes.list_by_menus(&ids).await?;
    Ok(MenuDetail::assemble(menus, dishes))
}
