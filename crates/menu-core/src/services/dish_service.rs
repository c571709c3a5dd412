// ============================================================================
// Menu Core - Dish Service
// File: crates/menu-core/src/services/dish_service.rs
// ============================================================================
//! CRUD over dishes, enforcing the (name, menu) uniqueness and the owning menu reference.

use std::sync::Arc;

use tracing::{info, warn};

use menu_shared::EntityId;

use crate::domain::{Dish, DishInput, DishPatchInput};
use crate::error::DomainError;
use crate::repositories::{DishRepository, MenuRepository};

pub const NOT_UNIQUE_IN_MENU: &str = "The fields name, menu must make a unique set.";

pub struct DishService {
    dishes: Arc<dyn DishRepository>,
    menus: Arc<dyn MenuRepository>,
}

impl DishService {
    pub fn new(dishes: Arc<dyn DishRepository>, menus: Arc<dyn MenuRepository>) -> Self {
        Self { dishes, menus }
    }

    pub async fn list(&self) -> Result<Vec<Dish>, DomainError> {
        self.dishes.list().await
    }

    pub async fn get(&self, id: EntityId) -> Result<Dish, DomainError> {
        self.dishes
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Dish::RESOURCE, id))
    }

    pub async fn create(&self, input: DishInput) -> Result<Dish, DomainError> {
        let new_dish = input.into_new_dish()?;
        self.ensure_menu_exists(new_dish.menu_id).await?;
        self.ensure_unique(&new_dish.name, new_dish.menu_id, None).await?;

        let dish = self.dishes.create(&new_dish).await?;
        info!("Dish created: {} ({}) in menu {}", dish.name, dish.id, dish.menu_id);
        Ok(dish)
    }

    pub async fn update(&self, id: EntityId, input: DishPatchInput) -> Result<Dish, DomainError> {
        let patch = input.into_patch()?;
        let current = self.get(id).await?;

        let mut merged = current.clone();
        merged.apply(&patch);

        if merged.menu_id != current.menu_id {
            self.ensure_menu_exists(merged.menu_id).await?;
        }
        if merged.name != current.name || merged.menu_id != current.menu_id {
            self.ensure_unique(&merged.name, merged.menu_id, Some(id)).await?;
        }

        let dish = self
            .dishes
            .update(id, &patch)
            .await?
            .ok_or_else(|| DomainError::not_found(Dish::RESOURCE, id))?;
        info!("Dish updated: {}", id);
        Ok(dish)
    }

    /// Deleting an absent dish is not an error.
    pub async fn delete(&self, id: EntityId) -> Result<(), DomainError> {
        if self.dishes.delete(id).await? {
            info!("Dish deleted: {}", id);
        }
        Ok(())
    }

    async fn ensure_menu_exists(&self, menu_id: EntityId) -> Result<(), DomainError> {
        if self.menus.find_by_id(menu_id).await?.is_none() {
            warn!("Dish rejected: menu {} does not exist", menu_id);
            return Err(DomainError::invalid(
                "menu",
                format!("Invalid pk \"{}\" - object does not exist.", menu_id),
            ));
        }
        Ok(())
    }

    async fn ensure_unique(
        &self,
        name: &str,
        menu_id: EntityId,
        except: Option<EntityId>,
    ) -> Result<(), DomainError> {
        match self.dishes.find_by_name_in_menu(name, menu_id).await? {
            Some(existing) if Some(existing.id) != except => {
                warn!("Dish rejected: {} already exists in menu {}", name, menu_id);
                Err(DomainError::invalid("non_field_errors", NOT_UNIQUE_IN_MENU))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockDishRepository, MockMenuRepository};
    use crate::services::menu_service::tests::{dish, menu};
    use crate::validation::TextOrNumber;

    fn input(name: &str, menu_id: EntityId) -> DishInput {
        DishInput {
            name: Some(name.to_string()),
            menu: Some(menu_id),
            description: Some("Classic pizza".to_string()),
            price: Some(TextOrNumber::Text("10.00".to_string())),
            preparation_time: Some(TextOrNumber::Text("00:25:00".to_string())),
            vegetarian: Some(true),
        }
    }

    fn menus_exist() -> MockMenuRepository {
        let mut menus = MockMenuRepository::new();
        menus
            .expect_find_by_id()
            .returning(|id| Ok(Some(menu(id, "Menu"))));
        menus
    }

    #[tokio::test]
    async fn test_same_name_in_different_menus_succeeds() {
        let mut dishes = MockDishRepository::new();
        // "Pizza" already lives in menu 1 only
        dishes
            .expect_find_by_name_in_menu()
            .returning(|name, menu_id| Ok((menu_id == 1).then(|| dish(5, 1, name))));
        dishes
            .expect_create()
            .times(1)
            .returning(|d| Ok(dish(6, d.menu_id, &d.name)));

        let service = DishService::new(Arc::new(dishes), Arc::new(menus_exist()));
        let created = service.create(input("Pizza", 2)).await.unwrap();
        assert_eq!(created.menu_id, 2);
        assert_eq!(created.name, "Pizza");
    }

    #[tokio::test]
    async fn test_same_name_in_same_menu_fails() {
        let mut dishes = MockDishRepository::new();
        dishes
            .expect_find_by_name_in_menu()
            .returning(|name, menu_id| Ok(Some(dish(5, menu_id, name))));
        dishes.expect_create().never();

        let service = DishService::new(Arc::new(dishes), Arc::new(menus_exist()));
        let err = service.create(input("Pizza", 1)).await.unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(
                errors.get("non_field_errors"),
                Some(&[NOT_UNIQUE_IN_MENU.to_string()][..])
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_menu_fails_validation() {
        let mut menus = MockMenuRepository::new();
        menus.expect_find_by_id().returning(|_| Ok(None));
        let mut dishes = MockDishRepository::new();
        dishes.expect_create().never();

        let service = DishService::new(Arc::new(dishes), Arc::new(menus));
        let err = service.create(input("Pizza", 77)).await.unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(
                errors.get("menu"),
                Some(&["Invalid pk \"77\" - object does not exist.".to_string()][..])
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_same_name_keeps_own_row() {
        let mut dishes = MockDishRepository::new();
        dishes
            .expect_find_by_id()
            .returning(|id| Ok(Some(dish(id, 1, "Pizza"))));
        dishes.expect_find_by_name_in_menu().never();
        dishes.expect_update().times(1).returning(|id, patch| {
            let mut updated = dish(id, 1, "Pizza");
            updated.apply(patch);
            Ok(Some(updated))
        });

        let service = DishService::new(Arc::new(dishes), Arc::new(MockMenuRepository::new()));
        let updated = service
            .update(
                4,
                DishPatchInput {
                    vegetarian: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.vegetarian);
        assert_eq!(updated.name, "Pizza");
    }

    #[tokio::test]
    async fn test_update_missing_dish() {
        let mut dishes = MockDishRepository::new();
        dishes.expect_find_by_id().returning(|_| Ok(None));

        let service = DishService::new(Arc::new(dishes), Arc::new(MockMenuRepository::new()));
        let err = service
            .update(
                4,
                DishPatchInput {
                    name: Some("test1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { resource: "Dish", id: 4 }));
    }
}
