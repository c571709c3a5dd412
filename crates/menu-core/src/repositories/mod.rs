//! Repository traits (ports)

pub mod menu_repository;
pub mod dish_repository;
pub mod attachment_repository;
pub mod user_repository;

pub use menu_repository::{MenuFilter, MenuRepository};
pub use dish_repository::DishRepository;
pub use attachment_repository::AttachmentRepository;
pub use user_repository::UserRepository;

#[cfg(any(test, feature = "mock"))]
pub use menu_repository::MockMenuRepository;
#[cfg(any(test, feature = "mock"))]
pub use dish_repository::MockDishRepository;
#[cfg(any(test, feature = "mock"))]
pub use attachment_repository::MockAttachmentRepository;
#[cfg(any(test, feature = "mock"))]
pub use user_repository::MockUserRepository;
