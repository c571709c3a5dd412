//! Wire representations of menus and dishes.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use menu_core::domain::{Dish, MenuDetail};
use menu_shared::constants::DATETIME_FORMAT;
use menu_shared::EntityId;

fn local(at: &DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format(DATETIME_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DishDto {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub preparation_time: String,
    pub vegetarian: bool,
    pub menu: EntityId,
    pub created_dt: String,
    pub updated_dt: String,
}

impl DishDto {
    pub fn new(dish: &Dish, tz: Tz) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: format!("{:.2}", dish.price),
            preparation_time: dish.preparation_time.to_string(),
            vegetarian: dish.vegetarian,
            menu: dish.menu_id,
            created_dt: local(&dish.created_dt, tz),
            updated_dt: local(&dish.updated_dt, tz),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuDto {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_dt: String,
    pub updated_dt: String,
    pub dishes: Vec<DishDto>,
}

impl MenuDto {
    pub fn new(detail: &MenuDetail, tz: Tz) -> Self {
        Self {
            id: detail.menu.id,
            name: detail.menu.name.clone(),
            description: detail.menu.description.clone(),
            created_dt: local(&detail.menu.created_dt, tz),
            updated_dt: local(&detail.menu.updated_dt, tz),
            dishes: detail.dishes.iter().map(|d| DishDto::new(d, tz)).collect(),
        }
    }
}
