//! Route definitions for the parent onboarding wizard.
//!
//! Mounted at `/onboarding-sessions` by `api_routes()`.
//!
//! ```text
//! POST   /                              create_session
//! GET    /{id}                          get_session
//! PUT    /{id}/fields                   update_field
//! POST   /{id}/strengths/toggle         toggle_strength
//! POST   /{id}/challenges/toggle        toggle_challenge
//! POST   /{id}/advance                  advance_step
//! POST   /{id}/go-back                  go_back
//! POST   /{id}/go-home                  go_home
//! POST   /{id}/submit                   submit
//! POST   /{id}/schedule/start           start_scheduling
//! PUT    /{id}/schedule                 update_meeting
//! POST   /{id}/schedule/confirm         confirm_schedule
//! POST   /{id}/close                    close
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Onboarding wizard routes, mounted at `/onboarding-sessions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(onboarding::create_session))
        .route("/{id}", get(onboarding::get_session))
        .route("/{id}/fields", put(onboarding::update_field))
        .route("/{id}/strengths/toggle", post(onboarding::toggle_strength))
        .route("/{id}/challenges/toggle", post(onboarding::toggle_challenge))
        .route("/{id}/advance", post(onboarding::advance_step))
        .route("/{id}/go-back", post(onboarding::go_back))
        .route("/{id}/go-home", post(onboarding::go_home))
        .route("/{id}/submit", post(onboarding::submit))
        .route("/{id}/schedule/start", post(onboarding::start_scheduling))
        .route("/{id}/schedule", put(onboarding::update_meeting))
        .route("/{id}/schedule/confirm", post(onboarding::confirm_schedule))
        .route("/{id}/close", post(onboarding::close))
}
