// ============================================================================
// Menu Infrastructure - PostgreSQL Menu Repository
// File: crates/menu-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use menu_core::domain::{Menu, MenuPatch, NewMenu};
use menu_core::error::DomainError;
use menu_core::repositories::{MenuFilter, MenuRepository};
use menu_core::services::menu_service::DUPLICATE_MENU_NAME;
use menu_shared::EntityId;

use super::{db_error, delete_error, is_unique_violation};

const MENU_COLUMNS: &str = "m.id, m.name, m.description, m.created_dt, m.updated_dt";

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_dt: DateTime<Utc>,
    pub updated_dt: DateTime<Utc>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            name: row.name,
            description: row.description,
            created_dt: row.created_dt,
            updated_dt: row.updated_dt,
        }
    }
}

fn write_error(e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        return DomainError::invalid("name", DUPLICATE_MENU_NAME);
    }
    db_error("writing menu", e)
}

/// Escapes LIKE wildcards so the user's text matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Builds the public listing query: menus owning at least one dish, narrowed by `filter`.
fn build_search(filter: &MenuFilter) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM menus m WHERE EXISTS (SELECT 1 FROM dishes d WHERE d.menu_id = m.id)",
        MENU_COLUMNS
    ));

    if let Some(name) = &filter.name_contains {
        qb.push(" AND m.name ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(from) = filter.created_from {
        qb.push(" AND m.created_dt >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        qb.push(" AND m.created_dt <= ").push_bind(to);
    }
    if let Some(from) = filter.updated_from {
        qb.push(" AND m.updated_dt >= ").push_bind(from);
    }
    if let Some(to) = filter.updated_to {
        qb.push(" AND m.updated_dt <= ").push_bind(to);
    }

    qb.push(" ORDER BY m.id");
    qb
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn list(&self) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menus m ORDER BY m.id",
            MENU_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing menus", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Menu>, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menus m WHERE m.id = $1",
            MENU_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Menu>, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menus m WHERE m.name = $1",
            MENU_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu by name", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, menu: &NewMenu) -> Result<Menu, DomainError> {
        let row: MenuRow = sqlx::query_as(
            r#"
            INSERT INTO menus (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_dt, updated_dt
            "#,
        )
        .bind(&menu.name)
        .bind(&menu.description)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        info!("Menu row inserted: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: EntityId, patch: &MenuPatch) -> Result<Option<Menu>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting menu update", e))?;

        let current: Option<MenuRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menus m WHERE m.id = $1 FOR UPDATE",
            MENU_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("locking menu", e))?;

        let Some(current) = current else {
            return Ok(None);
        };
        let mut menu: Menu = current.into();
        menu.apply(patch);

        let row: MenuRow = sqlx::query_as(
            r#"
            UPDATE menus
            SET name = $2, description = $3, updated_dt = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_dt, updated_dt
            "#,
        )
        .bind(id)
        .bind(&menu.name)
        .bind(&menu.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit menu update {}: {}", id, e);
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(Menu::RESOURCE, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_non_empty(&self, filter: &MenuFilter) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = build_search(filter)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("searching menus", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
