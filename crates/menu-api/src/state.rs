use std::sync::Arc;

use chrono_tz::Tz;

use menu_core::services::{AttachmentService, DishService, ListingService, MenuService};
use menu_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub menus: Arc<MenuService>,
    pub dishes: Arc<DishService>,
    pub attachments: Arc<AttachmentService>,
    pub listing: Arc<ListingService>,
    pub jwt: Arc<JwtService>,
    /// Zone used to render timestamps.
    pub time_zone: Tz,
}
