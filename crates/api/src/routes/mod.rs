pub mod checkout;
pub mod contact;
pub mod health;
pub mod onboarding;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                                           list pages (GET)
/// /pages/resolve?fragment=                         resolve a fragment (GET)
///
/// /checkouts                                       create (POST)
/// /checkouts/{id}                                  get
/// /checkouts/{id}/fields                           enrollment field edit (PUT)
/// /checkouts/{id}/next                             next step / open payment (POST)
/// /checkouts/{id}/previous                         previous step / cancel (POST)
/// /checkouts/{id}/payment-method                   select method (PUT)
/// /checkouts/{id}/pay                              pay (POST)
/// /checkouts/{id}/payment/back                     back to enrollment (POST)
/// /checkouts/{id}/finish                           back to home (POST)
///
/// /onboarding-sessions                             create (POST)
/// /onboarding-sessions/{id}                        get
/// /onboarding-sessions/{id}/fields                 profile field edit (PUT)
/// /onboarding-sessions/{id}/strengths/toggle       toggle strength (POST)
/// /onboarding-sessions/{id}/challenges/toggle      toggle challenge (POST)
/// /onboarding-sessions/{id}/advance                next step (POST)
/// /onboarding-sessions/{id}/go-back                previous step (POST)
/// /onboarding-sessions/{id}/go-home                leave for root (POST)
/// /onboarding-sessions/{id}/submit                 submit profile (POST)
/// /onboarding-sessions/{id}/schedule/start         open scheduling (POST)
/// /onboarding-sessions/{id}/schedule               meeting field edit (PUT)
/// /onboarding-sessions/{id}/schedule/confirm       confirm meeting (POST)
/// /onboarding-sessions/{id}/close                  dismiss confirmation (POST)
///
/// /contact                                         send message (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pages", pages::router())
        .nest("/checkouts", checkout::router())
        .nest("/onboarding-sessions", onboarding::router())
        .nest("/contact", contact::router())
}
