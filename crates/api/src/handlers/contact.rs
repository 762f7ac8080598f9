//! Handler for the contact page form.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use juniordream_core::contact::ContactForm;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// POST /contact
// ---------------------------------------------------------------------------

/// Accept a contact message. Every field is required and the email must be
/// well formed.
pub async fn submit_contact(AppJson(form): AppJson<ContactForm>) -> AppResult<impl IntoResponse> {
    let ack = form.submit()?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: ack })))
}
