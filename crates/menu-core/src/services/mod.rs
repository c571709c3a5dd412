//! Domain services (business logic)

pub mod menu_service;
pub mod dish_service;
pub mod attachment_service;
pub mod listing_service;
pub mod report_service;

pub use menu_service::MenuService;
pub use dish_service::DishService;
pub use attachment_service::AttachmentService;
pub use listing_service::{ListingParams, ListingQuery, ListingService, SortField, SortOrder};
pub use report_service::{DailyReport, ReportService, ReportWindow};
