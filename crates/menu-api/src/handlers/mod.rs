//! HTTP handlers

pub mod attachment;
pub mod dish;
pub mod health;
pub mod menu;
pub mod public;
