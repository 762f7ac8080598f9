//! Handlers for the enrollment -> payment -> success checkout.
//!
//! A checkout is created from the plan picked on the pricing page and lives
//! in [`AppState::checkouts`] until it is finished or cancelled.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use juniordream_core::checkout::{CheckoutFlow, CheckoutMove, CheckoutStage, EnrollmentConfirmation};
use juniordream_core::enrollment::{EnrollmentField, EnrollmentForm};
use juniordream_core::navigation::NavigationRequest;
use juniordream_core::payment::{PaymentMethod, PaymentPhase, PriceBreakdown};
use juniordream_core::plan::{format_rupees, SelectedPlan};
use juniordream_core::types::SessionId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCheckout {
    pub plan: SelectedPlan,
}

#[derive(Debug, Deserialize)]
pub struct SelectPaymentMethod {
    pub method: PaymentMethod,
}

/// Enrollment stage as shown to the client.
#[derive(Debug, Serialize)]
pub struct EnrollmentView {
    pub step: u8,
    pub step_label: &'static str,
    pub can_advance: bool,
    pub form: EnrollmentForm,
}

/// Payment stage as shown to the client.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub breakdown: PriceBreakdown,
    /// Total as displayed, e.g. `"₹3,539 per month"`.
    pub total_display: String,
    pub phase: PaymentPhase,
    pub can_pay: bool,
}

/// Snapshot of a checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub id: SessionId,
    pub plan: SelectedPlan,
    pub stage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<EnrollmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<EnrollmentConfirmation>,
    /// Navigation the client should perform, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationRequest>,
}

impl CheckoutView {
    fn new(id: SessionId, flow: &CheckoutFlow) -> Self {
        let mut view = Self {
            id,
            plan: SelectedPlan::clone(flow.plan()),
            stage: flow.stage().name(),
            enrollment: None,
            payment: None,
            confirmation: None,
            navigation: None,
        };

        match flow.stage() {
            CheckoutStage::Enrolling(wizard) => {
                view.enrollment = Some(EnrollmentView {
                    step: wizard.step().number(),
                    step_label: wizard.step().label(),
                    can_advance: wizard.can_advance(),
                    form: wizard.form().clone(),
                });
            }
            CheckoutStage::Paying(payment) => {
                let breakdown = *payment.breakdown();
                view.payment = Some(PaymentView {
                    breakdown,
                    total_display: format!(
                        "{} {}",
                        format_rupees(breakdown.total),
                        breakdown.billing_cycle.period_label()
                    ),
                    phase: payment.phase().clone(),
                    can_pay: payment.can_pay(),
                });
            }
            CheckoutStage::Completed(confirmation) => {
                view.confirmation = Some(confirmation.clone());
            }
            CheckoutStage::Cancelled => {}
        }
        view
    }

    fn navigating(mut self, request: NavigationRequest) -> Self {
        self.navigation = Some(request);
        self
    }
}

// ---------------------------------------------------------------------------
// POST /checkouts
// ---------------------------------------------------------------------------

/// Start a checkout for the chosen plan, on the first enrollment step.
pub async fn create_checkout(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCheckout>,
) -> AppResult<impl IntoResponse> {
    let flow = CheckoutFlow::start(body.plan)?;
    let plan_name = flow.plan().name.clone();
    let (id, handle) = state.checkouts.insert(flow).await;

    tracing::info!(checkout_id = %id, plan = %plan_name, "Checkout created");

    let view = CheckoutView::new(id, &*handle.lock().await);
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /checkouts/{id}
// ---------------------------------------------------------------------------

pub async fn get_checkout(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let view = CheckoutView::new(id, &*handle.lock().await);
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /checkouts/{id}/fields
// ---------------------------------------------------------------------------

/// Apply one enrollment field edit.
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(field): AppJson<EnrollmentField>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let mut flow = handle.lock().await;
    flow.update(field)?;
    Ok(Json(DataResponse {
        data: CheckoutView::new(id, &flow),
    }))
}

// ---------------------------------------------------------------------------
// POST /checkouts/{id}/next
// ---------------------------------------------------------------------------

/// Advance the enrollment. Leaving the last step opens payment.
pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let mut flow = handle.lock().await;
    let movement = flow.next()?;

    tracing::info!(checkout_id = %id, ?movement, "Checkout advanced");

    Ok(Json(DataResponse {
        data: CheckoutView::new(id, &flow),
    }))
}

// ---------------------------------------------------------------------------
// POST /checkouts/{id}/previous
// ---------------------------------------------------------------------------

/// Step back. Backing out of the first step cancels the checkout and asks the
/// client to return to the pricing page.
pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let mut flow = handle.lock().await;

    let view = match flow.previous()? {
        CheckoutMove::Leave(request) => {
            state.checkouts.remove(id).await;
            tracing::info!(checkout_id = %id, "Checkout cancelled");
            CheckoutView::new(id, &flow).navigating(request)
        }
        _ => CheckoutView::new(id, &flow),
    };
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /checkouts/{id}/payment-method
// ---------------------------------------------------------------------------

pub async fn select_payment_method(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(body): AppJson<SelectPaymentMethod>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let mut flow = handle.lock().await;
    flow.select_payment_method(body.method)?;
    Ok(Json(DataResponse {
        data: CheckoutView::new(id, &flow),
    }))
}

// ---------------------------------------------------------------------------
// POST /checkouts/{id}/pay
// ---------------------------------------------------------------------------

/// Pay with the selected method and wait for the backend to settle.
///
/// The session lock is released while the backend call is in flight; the
/// checkout sits in `Processing` meanwhile, so concurrent requests see it as
/// busy rather than block. The call and its settlement run on a spawned task,
/// so the checkout still settles if this request is dropped or times out.
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;

    let request = handle.lock().await.begin_payment()?;
    tracing::info!(
        checkout_id = %id,
        method = request.method.id(),
        amount = request.amount,
        "Payment started"
    );

    let backend = Arc::clone(&state.backend);
    let settled = tokio::spawn(async move {
        let outcome = backend.process_payment(&request).await;
        let mut flow = handle.lock().await;
        flow.settle_payment(outcome).map(|_| CheckoutView::new(id, &flow))
    });

    let view = settled.await??;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /checkouts/{id}/payment/back
// ---------------------------------------------------------------------------

/// Return from payment to the last enrollment step, form intact.
pub async fn back_to_enrollment(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let mut flow = handle.lock().await;
    flow.back_to_enrollment()?;
    Ok(Json(DataResponse {
        data: CheckoutView::new(id, &flow),
    }))
}

// ---------------------------------------------------------------------------
// POST /checkouts/{id}/finish
// ---------------------------------------------------------------------------

/// "Back to Home" from the success view. Discards the checkout.
pub async fn finish(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.checkouts.get(id).await?;
    let flow = handle.lock().await;
    let request = flow.finish()?;
    state.checkouts.remove(id).await;

    tracing::info!(checkout_id = %id, "Checkout finished");

    Ok(Json(DataResponse {
        data: CheckoutView::new(id, &flow).navigating(request),
    }))
}
