//! HTTP surface: push notifications for uploaded menu photos and read
//! access to the stored weekly menu.
//!
//! The router is composable: `menu_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::menu_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
