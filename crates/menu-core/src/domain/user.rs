//! Registered user, as far as this backend needs to know about one.

use serde::{Deserialize, Serialize};

use menu_shared::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
}
