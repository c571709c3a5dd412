//! # Menu Security
//!
//! Bearer token validation for the private API.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
