//! Route definitions for the page catalogue.
//!
//! Mounted at `/pages` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages))
        .route("/resolve", get(pages::resolve_page))
}
