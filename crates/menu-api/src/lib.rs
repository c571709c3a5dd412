//! # Menu API
//!
//! HTTP handlers, middleware, DTOs and the router of the restaurant menu backend.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
