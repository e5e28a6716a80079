//! API endpoint handlers.

pub mod health;
pub mod menu;
pub mod notification;
