//! Handlers for the hash-routed page catalogue.

use axum::extract::Query;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use juniordream_core::navigation::{Page, ALL_PAGES};

use crate::error::AppResult;
use crate::response::DataResponse;

/// One routable page.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub page: Page,
    pub fragment: &'static str,
    pub title: &'static str,
    pub shows_footer: bool,
}

impl From<Page> for PageInfo {
    fn from(page: Page) -> Self {
        Self {
            page,
            fragment: page.fragment(),
            title: page.title(),
            shows_footer: page.shows_footer(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    /// Raw location fragment, with or without the leading `#`.
    #[serde(default)]
    pub fragment: String,
}

// ---------------------------------------------------------------------------
// GET /pages
// ---------------------------------------------------------------------------

/// List every routable page in navigation order.
pub async fn list_pages() -> AppResult<impl IntoResponse> {
    let pages: Vec<PageInfo> = ALL_PAGES.into_iter().map(PageInfo::from).collect();
    Ok(Json(DataResponse { data: pages }))
}

// ---------------------------------------------------------------------------
// GET /pages/resolve?fragment=
// ---------------------------------------------------------------------------

/// Resolve a location fragment the way the router does. Unknown fragments
/// resolve to the home page.
pub async fn resolve_page(Query(params): Query<ResolveParams>) -> AppResult<impl IntoResponse> {
    let page = Page::from_fragment(&params.fragment);
    tracing::debug!(fragment = %params.fragment, page = page.fragment(), "Resolved fragment");
    Ok(Json(DataResponse {
        data: PageInfo::from(page),
    }))
}
