//! Repository tests against a live PostgreSQL database.
//! `sqlx::test` creates a fresh database per test from `DATABASE_URL` and applies the migrations.
//! Run with `--features db-tests`.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use menu_core::domain::{
    DishPatch, Menu, MenuPatch, NewDish, NewDishAttachment, NewMenu, PreparationTime,
};
use menu_core::error::DomainError;
use menu_core::repositories::{AttachmentRepository, DishRepository, MenuFilter, MenuRepository};
use menu_core::services::dish_service::NOT_UNIQUE_IN_MENU;
use menu_core::services::menu_service::DUPLICATE_MENU_NAME;
use menu_infrastructure::{PgAttachmentRepository, PgDishRepository, PgMenuRepository};
use menu_shared::EntityId;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

fn new_menu(name: &str) -> NewMenu {
    NewMenu {
        name: name.to_string(),
        description: format!("{} description", name),
    }
}

fn new_dish(name: &str, menu_id: EntityId) -> NewDish {
    NewDish {
        name: name.to_string(),
        menu_id,
        description: "Classic".to_string(),
        price: Decimal::new(1000, 2),
        preparation_time: PreparationTime::from_seconds(1500),
        vegetarian: true,
    }
}

fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, hour, minute, second).unwrap()
}

async fn set_timestamps(pool: &PgPool, menu_id: EntityId, created: DateTime<Utc>, updated: DateTime<Utc>) {
    sqlx::query("UPDATE menus SET created_dt = $2, updated_dt = $3 WHERE id = $1")
        .bind(menu_id)
        .bind(created)
        .bind(updated)
        .execute(pool)
        .await
        .unwrap();
}

fn names(menus: &[Menu]) -> Vec<&str> {
    menus.iter().map(|m| m.name.as_str()).collect()
}

// --- menus ---

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_create_and_find_menu(pool: PgPool) {
    let menus = PgMenuRepository::new(pool);

    let created = menus.create(&new_menu("Menu Italian")).await.unwrap();
    assert_eq!(created.created_dt, created.updated_dt);

    let found = menus.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(menus.find_by_name("Menu Italian").await.unwrap().is_some());
    assert!(menus.find_by_id(created.id + 1).await.unwrap().is_none());
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_duplicate_menu_name_is_a_field_error(pool: PgPool) {
    let menus = PgMenuRepository::new(pool);
    menus.create(&new_menu("Menu Italian")).await.unwrap();

    match menus.create(&new_menu("Menu Italian")).await {
        Err(DomainError::Validation(errors)) => {
            assert_eq!(errors.get("name"), Some(&[DUPLICATE_MENU_NAME.to_string()][..]));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_patch_refreshes_updated_dt(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();
    set_timestamps(&pool, menu.id, at(8, 0, 0), at(8, 0, 0)).await;

    let patch = MenuPatch {
        description: Some("Updated".to_string()),
        ..Default::default()
    };
    let updated = menus.update(menu.id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.name, "Menu Italian");
    assert_eq!(updated.description, "Updated");
    assert_eq!(updated.created_dt, at(8, 0, 0));
    assert!(updated.updated_dt > at(8, 0, 0));

    assert!(menus.update(menu.id + 1, &patch).await.unwrap().is_none());
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_delete_menu_cascades_to_dishes(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool);
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();
    let dish = dishes.create(&new_dish("Pizza", menu.id)).await.unwrap();

    assert!(menus.delete(menu.id).await.unwrap());
    assert!(dishes.find_by_id(dish.id).await.unwrap().is_none());
    assert!(!menus.delete(menu.id).await.unwrap());
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_delete_blocked_by_reference_is_a_conflict(pool: PgPool) {
    sqlx::query("CREATE TABLE menu_orders (menu_id BIGINT NOT NULL REFERENCES menus (id))")
        .execute(&pool)
        .await
        .unwrap();
    let menus = PgMenuRepository::new(pool.clone());
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();
    sqlx::query("INSERT INTO menu_orders (menu_id) VALUES ($1)")
        .bind(menu.id)
        .execute(&pool)
        .await
        .unwrap();

    match menus.delete(menu.id).await {
        Err(DomainError::Conflict { resource, details }) => {
            assert_eq!(resource, Menu::RESOURCE);
            assert!(!details.is_empty());
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

// --- public search ---

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_search_skips_empty_menus_and_matches_name_case_insensitively(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool);
    let mexican = menus.create(&new_menu("Menu Mexican")).await.unwrap();
    let italian = menus.create(&new_menu("Menu Italian")).await.unwrap();
    menus.create(&new_menu("Menu Empty")).await.unwrap();
    dishes.create(&new_dish("Tacos", mexican.id)).await.unwrap();
    dishes.create(&new_dish("Pizza", italian.id)).await.unwrap();

    let all = menus.search_non_empty(&MenuFilter::default()).await.unwrap();
    assert_eq!(names(&all), ["Menu Mexican", "Menu Italian"]);

    let filter = MenuFilter {
        name_contains: Some("mexican".to_string()),
        ..Default::default()
    };
    let found = menus.search_non_empty(&filter).await.unwrap();
    assert_eq!(names(&found), ["Menu Mexican"]);

    let filter = MenuFilter {
        name_contains: Some("%".to_string()),
        ..Default::default()
    };
    assert!(menus.search_non_empty(&filter).await.unwrap().is_empty());
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_search_date_bounds_are_inclusive(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool.clone());
    let early = menus.create(&new_menu("Menu Early")).await.unwrap();
    let late = menus.create(&new_menu("Menu Late")).await.unwrap();
    dishes.create(&new_dish("Soup", early.id)).await.unwrap();
    dishes.create(&new_dish("Steak", late.id)).await.unwrap();
    set_timestamps(&pool, early.id, at(9, 0, 0), at(9, 30, 0)).await;
    set_timestamps(&pool, late.id, at(12, 0, 0), at(12, 30, 0)).await;

    let filter = MenuFilter {
        created_from: Some(at(12, 0, 0)),
        ..Default::default()
    };
    assert_eq!(names(&menus.search_non_empty(&filter).await.unwrap()), ["Menu Late"]);

    let filter = MenuFilter {
        created_to: Some(at(9, 0, 0)),
        ..Default::default()
    };
    assert_eq!(names(&menus.search_non_empty(&filter).await.unwrap()), ["Menu Early"]);

    let filter = MenuFilter {
        updated_from: Some(at(9, 30, 0)),
        updated_to: Some(at(12, 29, 59)),
        ..Default::default()
    };
    assert_eq!(names(&menus.search_non_empty(&filter).await.unwrap()), ["Menu Early"]);
}

// --- dishes ---

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_dish_round_trips_price_and_preparation_time(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool);
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();

    let mut dish = new_dish("Lasagne", menu.id);
    dish.price = Decimal::new(999_999_99, 2);
    dish.preparation_time = PreparationTime::parse("2 01:30:00.250000").unwrap();
    let created = dishes.create(&dish).await.unwrap();

    let found = dishes.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.price.to_string(), "999999.99");
    assert_eq!(found.preparation_time.to_string(), "2 01:30:00.250000");
    assert_eq!(dishes.list_by_menus(&[menu.id]).await.unwrap(), vec![found]);
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_dish_name_is_unique_per_menu(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool);
    let italian = menus.create(&new_menu("Menu Italian")).await.unwrap();
    let mexican = menus.create(&new_menu("Menu Mexican")).await.unwrap();
    dishes.create(&new_dish("Pizza", italian.id)).await.unwrap();

    match dishes.create(&new_dish("Pizza", italian.id)).await {
        Err(DomainError::Validation(errors)) => {
            assert_eq!(
                errors.get("non_field_errors"),
                Some(&[NOT_UNIQUE_IN_MENU.to_string()][..])
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(dishes.create(&new_dish("Pizza", mexican.id)).await.is_ok());
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_dish_with_unknown_menu_is_an_invalid_pk(pool: PgPool) {
    let dishes = PgDishRepository::new(pool);

    match dishes.create(&new_dish("Pizza", 42)).await {
        Err(DomainError::Validation(errors)) => {
            assert_eq!(
                errors.get("menu"),
                Some(&["Invalid pk \"42\" - object does not exist.".to_string()][..])
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_dish_patch_and_time_windows(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool.clone());
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();
    let dish = dishes.create(&new_dish("Pizza", menu.id)).await.unwrap();
    sqlx::query("UPDATE dishes SET created_dt = $2, updated_dt = $2 WHERE id = $1")
        .bind(dish.id)
        .bind(at(10, 0, 0))
        .execute(&pool)
        .await
        .unwrap();

    let created = dishes.created_between(at(10, 0, 0), at(10, 0, 0)).await.unwrap();
    assert_eq!(created.len(), 1);

    let patch = DishPatch {
        price: Some(Decimal::new(1250, 2)),
        ..Default::default()
    };
    let updated = dishes.update(dish.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.price.to_string(), "12.50");
    assert_eq!(updated.name, "Pizza");
    assert_eq!(updated.created_dt, at(10, 0, 0));
    assert!(updated.updated_dt > at(10, 0, 0));

    let modified = dishes
        .updated_between(updated.updated_dt, updated.updated_dt)
        .await
        .unwrap();
    assert_eq!(modified.len(), 1);
    assert!(dishes
        .updated_between(at(9, 0, 0), at(10, 0, 0))
        .await
        .unwrap()
        .is_empty());
}

// --- attachments ---

#[sqlx::test(migrator = "MIGRATOR")]
async fn test_attachment_for_unknown_dish_is_rejected(pool: PgPool) {
    let menus = PgMenuRepository::new(pool.clone());
    let dishes = PgDishRepository::new(pool.clone());
    let attachments = PgAttachmentRepository::new(pool);
    let menu = menus.create(&new_menu("Menu Italian")).await.unwrap();
    let dish = dishes.create(&new_dish("Pizza", menu.id)).await.unwrap();

    let stored = attachments
        .create(&NewDishAttachment {
            dish_id: dish.id,
            file: "dish_attachments/2024/03/14/file1.txt".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(stored.dish_id, dish.id);

    let result = attachments
        .create(&NewDishAttachment {
            dish_id: dish.id + 100,
            file: "dish_attachments/2024/03/14/file2.txt".to_string(),
        })
        .await;
    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains("id")),
        other => panic!("expected validation error, got {:?}", other),
    }
}
