// ============================================================================
// Menu Core - Dish Entity
// File: crates/menu-core/src/domain/dish.rs
// Description: Menu item with price, preparation time and dietary flag
// ============================================================================

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use menu_shared::constants::{MAX_NAME_LENGTH, PRICE_DECIMAL_PLACES, PRICE_MAX_DIGITS};
use menu_shared::EntityId;

use crate::domain::PreparationTime;
use crate::validation::{non_null, not_blank, FieldErrors, TextOrNumber, BLANK, INVALID_NUMBER, TOO_LONG};

/// Dish entity
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: EntityId,
    pub name: String,
    pub menu_id: EntityId,
    pub description: String,
    pub price: Decimal,
    pub preparation_time: PreparationTime,
    pub vegetarian: bool,
    pub created_dt: DateTime<Utc>,
    pub updated_dt: DateTime<Utc>,
}

impl Dish {
    pub const RESOURCE: &'static str = "Dish";

    pub fn apply(&mut self, patch: &DishPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(menu_id) = patch.menu_id {
            self.menu_id = menu_id;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(preparation_time) = patch.preparation_time {
            self.preparation_time = preparation_time;
        }
        if let Some(vegetarian) = patch.vegetarian {
            self.vegetarian = vegetarian;
        }
    }
}

/// Validated fields of a dish about to be inserted.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewDish {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub name: String,
    pub menu_id: EntityId,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub price: Decimal,
    pub preparation_time: PreparationTime,
    pub vegetarian: bool,
}

/// Parses a price and enforces the fixed-point bounds (8 digits, 2 decimal places).
pub fn parse_price(value: &TextOrNumber) -> Result<Decimal, String> {
    let text = value.as_text();
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| INVALID_NUMBER.to_string())?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }

    let digits = price.mantissa().unsigned_abs().to_string().len() as u32;
    let decimals = price.scale();
    let (total, whole) = if decimals > digits {
        (decimals, 0)
    } else {
        (digits, digits - decimals)
    };

    if total > PRICE_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            PRICE_MAX_DIGITS
        ));
    }
    if decimals > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            PRICE_DECIMAL_PLACES
        ));
    }
    if whole > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
        ));
    }

    let mut price = price;
    price.rescale(PRICE_DECIMAL_PLACES);
    Ok(price)
}

/// Raw create payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishInput {
    pub name: Option<String>,
    #[serde(alias = "menu_id")]
    pub menu: Option<EntityId>,
    pub description: Option<String>,
    pub price: Option<TextOrNumber>,
    pub preparation_time: Option<TextOrNumber>,
    pub vegetarian: Option<bool>,
}

impl DishInput {
    pub fn into_new_dish(self) -> Result<NewDish, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require("name", self.name);
        let menu_id = errors.require("menu", self.menu);
        let description = errors.require("description", self.description);
        let price = errors
            .require("price", self.price)
            .and_then(|p| errors.collect("price", parse_price(&p)));
        let preparation_time = errors
            .require("preparation_time", self.preparation_time)
            .and_then(|t| errors.collect("preparation_time", PreparationTime::from_input(&t)));

        let (Some(name), Some(menu_id), Some(description), Some(price), Some(preparation_time)) =
            (name, menu_id, description, price, preparation_time)
        else {
            return Err(errors);
        };

        let dish = NewDish {
            name: name.trim().to_string(),
            menu_id,
            description: description.trim().to_string(),
            price,
            preparation_time,
            vegetarian: self.vegetarian.unwrap_or(false),
        };
        dish.validate()?;
        Ok(dish)
    }
}

/// Raw partial payload; unknown and read-only fields are rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DishPatchInput {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, alias = "menu_id", deserialize_with = "non_null")]
    pub menu: Option<EntityId>,
    #[serde(default, deserialize_with = "non_null")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub price: Option<TextOrNumber>,
    #[serde(default, deserialize_with = "non_null")]
    pub preparation_time: Option<TextOrNumber>,
    #[serde(default, deserialize_with = "non_null")]
    pub vegetarian: Option<bool>,
}

/// Typed partial update: only present fields overwrite the stored dish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishPatch {
    pub name: Option<String>,
    pub menu_id: Option<EntityId>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub preparation_time: Option<PreparationTime>,
    pub vegetarian: Option<bool>,
}

impl DishPatchInput {
    pub fn into_patch(self) -> Result<DishPatch, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            if name.is_empty() {
                errors.add("name", BLANK);
            } else if name.chars().count() as u64 > MAX_NAME_LENGTH {
                errors.add("name", TOO_LONG);
            }
        }
        let description = self.description.map(|d| d.trim().to_string());
        if description.as_deref() == Some("") {
            errors.add("description", BLANK);
        }
        let price = self
            .price
            .and_then(|p| errors.collect("price", parse_price(&p)));
        let preparation_time = self
            .preparation_time
            .and_then(|t| errors.collect("preparation_time", PreparationTime::from_input(&t)));

        errors.into_result()?;
        Ok(DishPatch {
            name,
            menu_id: self.menu,
            description,
            price,
            preparation_time,
            vegetarian: self.vegetarian,
        })
    }
}
