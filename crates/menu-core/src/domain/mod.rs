//! # Menu Core - Domain Module
//! 
//! Domain entities for the restaurant menu backend.

pub mod menu;
pub mod dish;
pub mod preparation_time;
pub mod attachment;
pub mod user;

// Re-export all entities
pub use menu::{Menu, MenuDetail, MenuInput, MenuPatch, NewMenu};
pub use dish::{parse_price, Dish, DishInput, DishPatch, DishPatchInput, NewDish};
pub use preparation_time::PreparationTime;
pub use attachment::{attachment_dir, DishAttachment, NewDishAttachment, UploadedFile};
pub use user::User;
