//! Route definitions for enrollment checkouts.
//!
//! Mounted at `/checkouts` by `api_routes()`.
//!
//! ```text
//! POST   /                              create_checkout
//! GET    /{id}                          get_checkout
//! PUT    /{id}/fields                   update_field
//! POST   /{id}/next                     next_step
//! POST   /{id}/previous                 previous_step
//! PUT    /{id}/payment-method           select_payment_method
//! POST   /{id}/pay                      pay
//! POST   /{id}/payment/back             back_to_enrollment
//! POST   /{id}/finish                   finish
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Checkout routes, mounted at `/checkouts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::create_checkout))
        .route("/{id}", get(checkout::get_checkout))
        .route("/{id}/fields", put(checkout::update_field))
        .route("/{id}/next", post(checkout::next_step))
        .route("/{id}/previous", post(checkout::previous_step))
        .route("/{id}/payment-method", put(checkout::select_payment_method))
        .route("/{id}/pay", post(checkout::pay))
        .route("/{id}/payment/back", post(checkout::back_to_enrollment))
        .route("/{id}/finish", post(checkout::finish))
}
