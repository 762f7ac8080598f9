//! Handlers for the 6-step parent onboarding wizard.
//!
//! Provides endpoints for creating a session, editing the profile, moving
//! between steps, submitting, and scheduling the free session that follows.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use juniordream_core::navigation::NavigationRequest;
use juniordream_core::onboarding::{
    Challenge, MeetingField, MeetingForm, OnboardingField, OnboardingForm, OnboardingWizard,
    PhaseFlags, Strength, SubmissionPhase, TOTAL_STEPS,
};
use juniordream_core::types::SessionId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ToggleStrength {
    pub strength: Strength,
}

#[derive(Debug, Deserialize)]
pub struct ToggleChallenge {
    pub challenge: Challenge,
}

/// Snapshot of an onboarding session.
#[derive(Debug, Serialize)]
pub struct OnboardingView {
    pub id: SessionId,
    pub step: u8,
    pub step_label: &'static str,
    pub total_steps: u8,
    pub can_advance: bool,
    pub can_go_home: bool,
    pub form: OnboardingForm,
    pub meeting: MeetingForm,
    pub phase: SubmissionPhase,
    pub flags: PhaseFlags,
    /// Navigation the client should perform, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationRequest>,
}

impl OnboardingView {
    fn new(id: SessionId, wizard: &OnboardingWizard) -> Self {
        Self {
            id,
            step: wizard.step().number(),
            step_label: wizard.step().label(),
            total_steps: TOTAL_STEPS,
            can_advance: wizard.can_advance(),
            can_go_home: wizard.can_go_home(),
            form: wizard.form().clone(),
            meeting: wizard.meeting().clone(),
            phase: wizard.phase().clone(),
            flags: wizard.phase().flags(),
            navigation: None,
        }
    }

    fn navigating(mut self, request: NavigationRequest) -> Self {
        self.navigation = Some(request);
        self
    }
}

/// Today's date where the server runs; meeting dates may not precede it.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions
// ---------------------------------------------------------------------------

/// Start a new onboarding session on the welcome step.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (id, handle) = state.onboarding.insert(OnboardingWizard::new()).await;

    tracing::info!(session_id = %id, "Onboarding session created");

    let view = OnboardingView::new(id, &*handle.lock().await);
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /onboarding-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let view = OnboardingView::new(id, &*handle.lock().await);
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/fields
// ---------------------------------------------------------------------------

/// Apply one profile field edit. Mobile numbers are normalised on the way in.
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(field): AppJson<OnboardingField>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.update(field)?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/strengths/toggle
// ---------------------------------------------------------------------------

pub async fn toggle_strength(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(body): AppJson<ToggleStrength>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.toggle_strength(body.strength)?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/challenges/toggle
// ---------------------------------------------------------------------------

pub async fn toggle_challenge(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(body): AppJson<ToggleChallenge>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.toggle_challenge(body.challenge)?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/advance
// ---------------------------------------------------------------------------

/// Advance to the next step if the current one is complete.
pub async fn advance_step(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    let from_step = wizard.step().number();
    let to_step = wizard.next()?.number();

    tracing::info!(session_id = %id, from_step, to_step, "Onboarding session advanced");

    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/go-back
// ---------------------------------------------------------------------------

pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.back()?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/go-home
// ---------------------------------------------------------------------------

/// Abandon the wizard for the site root. Discards the session.
pub async fn go_home(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let wizard = handle.lock().await;
    let request = wizard.go_home()?;
    state.onboarding.remove(id).await;

    tracing::info!(session_id = %id, step = wizard.step().number(), "Onboarding abandoned");

    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard).navigating(request),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/submit
// ---------------------------------------------------------------------------

/// Submit the completed profile and wait for the backend to settle.
///
/// The session lock is released while the backend call is in flight; the
/// wizard is `Submitting` meanwhile so a second submit is refused. The call
/// settles on a spawned task, so a dropped request cannot strand the wizard.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;

    let profile = handle.lock().await.begin_submission()?;
    tracing::info!(session_id = %id, "Onboarding submission started");

    let backend = Arc::clone(&state.backend);
    let settled = tokio::spawn(async move {
        let outcome = backend.submit_onboarding(&profile).await;
        let mut wizard = handle.lock().await;
        wizard
            .complete_submission(outcome)
            .map(|_| OnboardingView::new(id, &wizard))
    });

    let view = settled.await??;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/schedule/start
// ---------------------------------------------------------------------------

pub async fn start_scheduling(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.start_scheduling()?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/schedule
// ---------------------------------------------------------------------------

/// Edit one meeting field. Dates before today are refused.
pub async fn update_meeting(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    AppJson(field): AppJson<MeetingField>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.update_meeting(field, today())?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/schedule/confirm
// ---------------------------------------------------------------------------

pub async fn confirm_schedule(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let mut wizard = handle.lock().await;
    wizard.confirm_schedule(today())?;
    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard),
    }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/close
// ---------------------------------------------------------------------------

/// Dismiss the confirmation and head to the site root. Discards the session.
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let handle = state.onboarding.get(id).await?;
    let wizard = handle.lock().await;
    let request = wizard.close_confirmation()?;
    state.onboarding.remove(id).await;

    tracing::info!(session_id = %id, "Onboarding completed");

    Ok(Json(DataResponse {
        data: OnboardingView::new(id, &wizard).navigating(request),
    }))
}
