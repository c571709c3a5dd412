//! # Menu Shared
//! 
//! Shared configuration, constants, types, and telemetry for the restaurant menu backend.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
