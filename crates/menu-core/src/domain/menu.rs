// ============================================================================
// Menu Core - Menu Entity
// File: crates/menu-core/src/domain/menu.rs
// Description: Named collection of dishes
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use menu_shared::EntityId;

use crate::domain::Dish;
use crate::validation::{non_null, not_blank, FieldErrors};

/// Menu entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_dt: DateTime<Utc>,
    pub updated_dt: DateTime<Utc>,
}

impl Menu {
    pub const RESOURCE: &'static str = "Menu";

    pub fn apply(&mut self, patch: &MenuPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

/// Validated fields of a menu about to be inserted.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewMenu {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

impl From<&Menu> for NewMenu {
    fn from(menu: &Menu) -> Self {
        Self {
            name: menu.name.clone(),
            description: menu.description.clone(),
        }
    }
}

/// Raw create payload; every field is optional so that missing ones surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl MenuInput {
    pub fn into_new_menu(self) -> Result<NewMenu, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require("name", self.name);
        let description = errors.require("description", self.description);

        let (Some(name), Some(description)) = (name, description) else {
            return Err(errors);
        };

        let menu = NewMenu {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        };
        menu.validate()?;
        Ok(menu)
    }
}

/// Partial update: only present fields overwrite the stored menu.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub description: Option<String>,
}

impl MenuPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        self
    }
}

/// A menu together with its dishes, as served by both APIs.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDetail {
    pub menu: Menu,
    pub dishes: Vec<Dish>,
}

impl MenuDetail {
    pub fn num_dishes(&self) -> usize {
        self.dishes.len()
    }

    /// Groups `dishes` under their menus, keeping the order of `menus` and of `dishes`.
    pub fn assemble(menus: Vec<Menu>, dishes: Vec<Dish>) -> Vec<MenuDetail> {
        let mut details: Vec<MenuDetail> = menus
            .into_iter()
            .map(|menu| MenuDetail { menu, dishes: Vec::new() })
            .collect();
        for dish in dishes {
            if let Some(detail) = details.iter_mut().find(|d| d.menu.id == dish.menu_id) {
                detail.dishes.push(dish);
            }
        }
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{BLANK, NULL, REQUIRED, TOO_LONG};

    #[test]
    fn test_create_menu_input() {
        let input = MenuInput {
            name: Some("  Menu Italian ".to_string()),
            description: Some("Delicious Italian Cuisine".to_string()),
        };
        let menu = input.into_new_menu().unwrap();
        assert_eq!(menu.name, "Menu Italian");
        assert_eq!(menu.description, "Delicious Italian Cuisine");
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = MenuInput::default().into_new_menu().unwrap_err();
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("description"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_blank_and_long_names() {
        let blank = MenuInput {
            name: Some("   ".to_string()),
            description: Some(String::new()),
        };
        let errors = blank.into_new_menu().unwrap_err();
        assert_eq!(errors.get("name"), Some(&[BLANK.to_string()][..]));

        let long = MenuInput {
            name: Some("x".repeat(256)),
            description: Some(String::new()),
        };
        let errors = long.into_new_menu().unwrap_err();
        assert_eq!(errors.get("name"), Some(&[TOO_LONG.to_string()][..]));
    }

    #[test]
    fn test_blank_description() {
        let input = MenuInput {
            name: Some("Menu Italian".to_string()),
            description: Some("   ".to_string()),
        };
        let errors = input.into_new_menu().unwrap_err();
        assert_eq!(errors.get("description"), Some(&[BLANK.to_string()][..]));
        assert!(!errors.contains("name"));

        let mut menu = Menu {
            id: 1,
            name: "Menu Italian".to_string(),
            description: "Delicious Italian Cuisine".to_string(),
            created_dt: Utc::now(),
            updated_dt: Utc::now(),
        };
        let patch: MenuPatch = serde_json::from_str(r#"{"description": " "}"#).unwrap();
        menu.apply(&patch.normalized());
        let errors = NewMenu::from(&menu).validate().unwrap_err();
        assert!(FieldErrors::from(errors).contains("description"));
    }

    #[test]
    fn test_patch_rejects_null() {
        let err = serde_json::from_str::<MenuPatch>(r#"{"name": null}"#).unwrap_err();
        assert!(err.to_string().contains(NULL));

        let patch: MenuPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_read_only_fields() {
        let result = serde_json::from_str::<MenuPatch>(r#"{"created_dt": "test1"}"#);
        assert!(result.is_err());

        let patch: MenuPatch = serde_json::from_str(r#"{"name": " test1 "}"#).unwrap();
        let patch = patch.normalized();
        assert_eq!(patch.name.as_deref(), Some("test1"));
        assert!(patch.description.is_none());
    }
}
