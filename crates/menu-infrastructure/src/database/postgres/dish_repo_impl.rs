// ============================================================================
// Menu Infrastructure - PostgreSQL Dish Repository
// File: crates/menu-infrastructure/src/database/postgres/dish_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::types::PgInterval;
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use menu_core::domain::{Dish, DishPatch, NewDish, PreparationTime};
use menu_core::error::DomainError;
use menu_core::repositories::DishRepository;
use menu_core::services::dish_service::NOT_UNIQUE_IN_MENU;
use menu_shared::EntityId;

use super::{db_error, delete_error, is_foreign_key_violation, is_unique_violation};

const DISH_COLUMNS: &str =
    "id, name, menu_id, description, price, preparation_time, vegetarian, created_dt, updated_dt";

const MICROS_PER_DAY: i64 = 86_400_000_000;

pub struct PgDishRepository {
    pool: PgPool,
}

impl PgDishRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DishRow {
    pub id: i64,
    pub name: String,
    pub menu_id: i64,
    pub description: String,
    pub price: Decimal,
    pub preparation_time: PgInterval,
    pub vegetarian: bool,
    pub created_dt: DateTime<Utc>,
    pub updated_dt: DateTime<Utc>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            name: row.name,
            menu_id: row.menu_id,
            description: row.description,
            price: row.price,
            preparation_time: interval_to_time(&row.preparation_time),
            vegetarian: row.vegetarian,
            created_dt: row.created_dt,
            updated_dt: row.updated_dt,
        }
    }
}

/// Months are read as 30 days, the same convention Postgres uses for `justify_days`.
fn interval_to_time(interval: &PgInterval) -> PreparationTime {
    let days = i64::from(interval.months) * 30 + i64::from(interval.days);
    PreparationTime::from_microseconds(
        days.saturating_mul(MICROS_PER_DAY)
            .saturating_add(interval.microseconds),
    )
}

fn time_to_interval(time: &PreparationTime) -> PgInterval {
    PgInterval {
        months: 0,
        days: 0,
        microseconds: time.total_microseconds(),
    }
}

fn write_error(menu_id: EntityId, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        return DomainError::invalid("non_field_errors", NOT_UNIQUE_IN_MENU);
    }
    if is_foreign_key_violation(&e) {
        return DomainError::invalid(
            "menu",
            format!("Invalid pk \"{}\" - object does not exist.", menu_id),
        );
    }
    db_error("writing dish", e)
}

impl PgDishRepository {
    async fn fetch_between(
        &self,
        column: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE {} BETWEEN $1 AND $2 ORDER BY id",
            DISH_COLUMNS, column
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetching dishes by time window", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl DishRepository for PgDishRepository {
    async fn list(&self) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> =
            sqlx::query_as(&format!("SELECT {} FROM dishes ORDER BY id", DISH_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing dishes", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Dish>, DomainError> {
        let row: Option<DishRow> =
            sqlx::query_as(&format!("SELECT {} FROM dishes WHERE id = $1", DISH_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding dish by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name_in_menu(
        &self,
        name: &str,
        menu_id: EntityId,
    ) -> Result<Option<Dish>, DomainError> {
        let row: Option<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE name = $1 AND menu_id = $2",
            DISH_COLUMNS
        ))
        .bind(name)
        .bind(menu_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding dish by name", e))?;

        Ok(row.map(Into::into))
    }

    async fn list_by_menus(&self, menu_ids: &[EntityId]) -> Result<Vec<Dish>, DomainError> {
        let rows: Vec<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE menu_id = ANY($1) ORDER BY id",
            DISH_COLUMNS
        ))
        .bind(menu_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing dishes of menus", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, dish: &NewDish) -> Result<Dish, DomainError> {
        let row: DishRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO dishes (name, menu_id, description, price, preparation_time, vegetarian)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            DISH_COLUMNS
        ))
        .bind(&dish.name)
        .bind(dish.menu_id)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(time_to_interval(&dish.preparation_time))
        .bind(dish.vegetarian)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(dish.menu_id, e))?;

        info!("Dish row inserted: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: EntityId, patch: &DishPatch) -> Result<Option<Dish>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting dish update", e))?;

        let current: Option<DishRow> = sqlx::query_as(&format!(
            "SELECT {} FROM dishes WHERE id = $1 FOR UPDATE",
            DISH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("locking dish", e))?;

        let Some(current) = current else {
            return Ok(None);
        };
        let mut dish: Dish = current.into();
        dish.apply(patch);

        let row: DishRow = sqlx::query_as(&format!(
            r#"
            UPDATE dishes
            SET name = $2, menu_id = $3, description = $4, price = $5,
                preparation_time = $6, vegetarian = $7, updated_dt = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DISH_COLUMNS
        ))
        .bind(id)
        .bind(&dish.name)
        .bind(dish.menu_id)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(time_to_interval(&dish.preparation_time))
        .bind(dish.vegetarian)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(dish.menu_id, e))?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit dish update {}: {}", id, e);
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(Dish::RESOURCE, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Dish>, DomainError> {
        self.fetch_between("created_dt", start, end).await
    }

    async fn updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Dish>, DomainError> {
        self.fetch_between("updated_dt", start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_conversion() {
        let time = PreparationTime::from_seconds(25 * 60);
        let interval = time_to_interval(&time);
        assert_eq!(interval.microseconds, 1_500_000_000);
        assert_eq!(interval_to_time(&interval), time);
    }

    #[test]
    fn test_interval_with_days_and_months() {
        let interval = PgInterval {
            months: 1,
            days: 2,
            microseconds: 3_600_000_000,
        };
        assert_eq!(
            interval_to_time(&interval).to_string(),
            "32 01:00:00"
        );
    }
}
