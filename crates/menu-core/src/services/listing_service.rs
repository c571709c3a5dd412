// ============================================================================
// Menu Core - Public Listing Service
// File: crates/menu-core/src/services/listing_service.rs
// ============================================================================
//! Unauthenticated menu listing: non-empty menus, filtered in the store and
//! sorted here through a fixed table of comparators.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use menu_shared::constants::DATETIME_FORMAT;

use crate::domain::MenuDetail;
use crate::error::DomainError;
use crate::repositories::{DishRepository, MenuFilter, MenuRepository};
use crate::services::menu_service::attach_dishes;
use crate::validation::FieldErrors;

/// Query string of the public listing, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub sort_by: Option<String>,
    pub name: Option<String>,
    pub start_created_dt: Option<String>,
    pub end_created_dt: Option<String>,
    pub start_updated_dt: Option<String>,
    pub end_updated_dt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    CreatedDt,
    UpdatedDt,
    NumDishes,
}

type Comparator = fn(&MenuDetail, &MenuDetail) -> Ordering;

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::Description,
        SortField::CreatedDt,
        SortField::UpdatedDt,
        SortField::NumDishes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::CreatedDt => "created_dt",
            SortField::UpdatedDt => "updated_dt",
            SortField::NumDishes => "num_dishes",
        }
    }

    pub fn comparator(&self) -> Comparator {
        match self {
            SortField::Id => |a, b| a.menu.id.cmp(&b.menu.id),
            SortField::Name => |a, b| a.menu.name.cmp(&b.menu.name),
            SortField::Description => |a, b| a.menu.description.cmp(&b.menu.description),
            SortField::CreatedDt => |a, b| a.menu.created_dt.cmp(&b.menu.created_dt),
            SortField::UpdatedDt => |a, b| a.menu.updated_dt.cmp(&b.menu.updated_dt),
            SortField::NumDishes => |a, b| a.num_dishes().cmp(&b.num_dishes()),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SortField::ALL.iter().map(SortField::as_str).collect();
                format!(
                    "Unknown sort field \"{}\". Allowed fields: {}.",
                    s,
                    allowed.join(", ")
                )
            })
    }
}

/// `field` ascending, or descending with a leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Ok(SortOrder {
            field: name.parse()?,
            descending,
        })
    }
}

impl SortOrder {
    /// Stable, so ties keep the store's id order.
    pub fn sort(&self, details: &mut [MenuDetail]) {
        let compare = self.field.comparator();
        if self.descending {
            details.sort_by(|a, b| compare(b, a));
        } else {
            details.sort_by(compare);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub filter: MenuFilter,
    pub sort: Option<SortOrder>,
}

impl ListingQuery {
    /// Validates the raw parameters; dates are read as local wall-clock time in `tz`.
    pub fn parse(params: ListingParams, tz: Tz) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let sort = present(params.sort_by).and_then(|s| errors.collect("sort_by", s.parse()));
        let mut date = |field: &str, value: Option<String>| {
            present(value).and_then(|v| errors.collect(field, parse_local_datetime(&v, tz)))
        };
        let created_from = date("start_created_dt", params.start_created_dt);
        let created_to = date("end_created_dt", params.end_created_dt);
        let updated_from = date("start_updated_dt", params.start_updated_dt);
        let updated_to = date("end_updated_dt", params.end_updated_dt);

        errors.into_result()?;
        Ok(ListingQuery {
            filter: MenuFilter {
                name_contains: present(params.name),
                created_from,
                created_to,
                updated_from,
                updated_to,
            },
            sort,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses `YYYY-MM-DD HH:MM` as a wall-clock time in `tz`.
///
/// On a DST fold the earlier instant wins; times skipped by a DST gap are rejected.
pub fn parse_local_datetime(value: &str, tz: Tz) -> Result<DateTime<Utc>, String> {
    let invalid = || {
        format!(
            "Datetime has wrong format. Use this format instead: YYYY-MM-DD HH:MM (got \"{}\").",
            value
        )
    };
    let naive = NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT).map_err(|_| invalid())?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("\"{}\" does not exist in time zone {}.", value, tz))
}

pub struct ListingService {
    menus: Arc<dyn MenuRepository>,
    dishes: Arc<dyn DishRepository>,
}

impl ListingService {
    pub fn new(menus: Arc<dyn MenuRepository>, dishes: Arc<dyn DishRepository>) -> Self {
        Self { menus, dishes }
    }

    pub async fn list(&self, query: &ListingQuery) -> Result<Vec<MenuDetail>, DomainError> {
        let menus = self.menus.search_non_empty(&query.filter).await?;
        let mut details = attach_dishes(self.dishes.as_ref(), menus).await?;
        if let Some(order) = &query.sort {
            order.sort(&mut details);
        }
        debug!("Public listing returned {} menus", details.len());
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockDishRepository, MockMenuRepository};
    use crate::services::menu_service::tests::{dish, menu};
    use chrono_tz::Europe::Warsaw;

    fn params(pairs: &[(&str, &str)]) -> ListingParams {
        let object: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(
            "-name".parse::<SortOrder>().unwrap(),
            SortOrder { field: SortField::Name, descending: true }
        );
        assert_eq!(
            "num_dishes".parse::<SortOrder>().unwrap(),
            SortOrder { field: SortField::NumDishes, descending: false }
        );
        assert!("unknown".parse::<SortOrder>().is_err());
        assert!("-".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let errors = ListingQuery::parse(params(&[("sort_by", "price")]), Warsaw).unwrap_err();
        assert!(errors.contains("sort_by"));
    }

    #[test]
    fn test_dates_are_local_to_time_zone() {
        let query = ListingQuery::parse(
            params(&[
                ("start_created_dt", "2024-03-14 10:00"),
                ("end_updated_dt", "2024-07-01 00:30"),
                ("name", "ital"),
            ]),
            Warsaw,
        )
        .unwrap();

        // CET is UTC+1 in March, CEST is UTC+2 in July
        assert_eq!(
            query.filter.created_from.unwrap().to_rfc3339(),
            "2024-03-14T09:00:00+00:00"
        );
        assert_eq!(
            query.filter.updated_to.unwrap().to_rfc3339(),
            "2024-06-30T22:30:00+00:00"
        );
        assert_eq!(query.filter.name_contains.as_deref(), Some("ital"));
        assert!(query.sort.is_none());
    }

    #[test]
    fn test_malformed_date_names_parameter() {
        let errors = ListingQuery::parse(
            params(&[("end_created_dt", "14.03.2024"), ("start_updated_dt", "2024-03-14")]),
            Warsaw,
        )
        .unwrap_err();
        assert!(errors.contains("end_created_dt"));
        assert!(errors.contains("start_updated_dt"));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let query = ListingQuery::parse(
            params(&[("sort_by", ""), ("name", " "), ("start_created_dt", "")]),
            Warsaw,
        )
        .unwrap();
        assert_eq!(query, ListingQuery::default());
    }

    #[test]
    fn test_dst_gap_is_rejected() {
        assert!(parse_local_datetime("2024-03-31 02:30", Warsaw).is_err());
    }

    #[tokio::test]
    async fn test_list_sorts_by_dish_count_descending() {
        let mut menus = MockMenuRepository::new();
        menus
            .expect_search_non_empty()
            .withf(|f| f.name_contains.as_deref() == Some("menu"))
            .returning(|_| Ok(vec![menu(1, "Menu A"), menu(2, "Menu B"), menu(3, "Menu C")]));
        let mut dishes = MockDishRepository::new();
        dishes.expect_list_by_menus().returning(|_| {
            Ok(vec![
                dish(1, 1, "Soup"),
                dish(2, 2, "Pizza"),
                dish(3, 2, "Pasta"),
                dish(4, 3, "Tacos"),
            ])
        });

        let service = ListingService::new(Arc::new(menus), Arc::new(dishes));
        let query = ListingQuery::parse(
            params(&[("sort_by", "-num_dishes"), ("name", "menu")]),
            Warsaw,
        )
        .unwrap();
        let details = service.list(&query).await.unwrap();

        let ids: Vec<_> = details.iter().map(|d| d.menu.id).collect();
        // ties keep id order
        assert_eq!(ids, [2, 1, 3]);
    }

    #[tokio::test]
    async fn test_list_by_name_ascending() {
        let mut menus = MockMenuRepository::new();
        menus
            .expect_search_non_empty()
            .returning(|_| Ok(vec![menu(1, "Menu Mexican"), menu(2, "Menu Italian")]));
        let mut dishes = MockDishRepository::new();
        dishes
            .expect_list_by_menus()
            .returning(|_| Ok(vec![dish(1, 1, "Tacos"), dish(2, 2, "Pizza")]));

        let service = ListingService::new(Arc::new(menus), Arc::new(dishes));
        let query = ListingQuery::parse(params(&[("sort_by", "name")]), Warsaw).unwrap();
        let names: Vec<_> = service
            .list(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.menu.name)
            .collect();
        assert_eq!(names, ["Menu Italian", "Menu Mexican"]);
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let mut menus = MockMenuRepository::new();
        menus.expect_search_non_empty().returning(|_| Ok(vec![]));
        let mut dishes = MockDishRepository::new();
        dishes.expect_list_by_menus().never();

        let service = ListingService::new(Arc::new(menus), Arc::new(dishes));
        assert!(service.list(&ListingQuery::default()).await.unwrap().is_empty());
    }
}
