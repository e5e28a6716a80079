//! HTTP router.
//!
//! `POST /` receives push notifications for newly uploaded menu photos.
//! Read endpoints live under `/api/`.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn menu_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/menu", get(endpoints::menu::current))
        .route("/menu/:day", get(endpoints::menu::day));

    Router::new()
        .route("/", post(endpoints::notification::receive))
        .nest("/api", api)
        .with_state(ctx)
}
