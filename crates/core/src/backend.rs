//! The backend capability the funnel submits to.
//!
//! Payment and onboarding submission both go through [`FunnelBackend`]. The
//! wizards only care that a call settles with a receipt or an error; the
//! shipped [`SimulatedBackend`] waits a fixed delay and always succeeds.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::onboarding::OnboardingProfile;
use crate::payment::{PaymentMethod, PaymentRequest};
use crate::types::Timestamp;

/// Delay before a simulated payment reports success.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// Delay before a simulated onboarding submission settles.
pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(1500);

/// A rejected backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Proof of a settled payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub reference: Uuid,
    pub method: PaymentMethod,
    /// Amount charged, GST included, in whole rupees.
    pub amount: u64,
    pub paid_at: Timestamp,
}

/// Proof of an accepted onboarding submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub submitted_at: Timestamp,
}

/// Submit-and-await operations used by the wizards.
#[async_trait]
pub trait FunnelBackend: Send + Sync {
    /// Charge the enrollment described by `request`.
    async fn process_payment(&self, request: &PaymentRequest)
        -> Result<PaymentReceipt, BackendError>;

    /// Hand over a completed onboarding profile.
    async fn submit_onboarding(
        &self,
        profile: &OnboardingProfile,
    ) -> Result<SubmissionReceipt, BackendError>;
}

/// Backend stand-in: sleeps for a fixed delay, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    payment_delay: Duration,
    submission_delay: Duration,
}

impl SimulatedBackend {
    pub fn new(payment_delay: Duration, submission_delay: Duration) -> Self {
        Self {
            payment_delay,
            submission_delay,
        }
    }

    /// Settle every call immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_DELAY, DEFAULT_SUBMISSION_DELAY)
    }
}

#[async_trait]
impl FunnelBackend for SimulatedBackend {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, BackendError> {
        tracing::info!(
            plan = %request.plan_name,
            method = request.method.id(),
            amount = request.amount,
            "Processing simulated payment"
        );
        tokio::time::sleep(self.payment_delay).await;

        Ok(PaymentReceipt {
            reference: Uuid::new_v4(),
            method: request.method,
            amount: request.amount,
            paid_at: chrono::Utc::now(),
        })
    }

    async fn submit_onboarding(
        &self,
        profile: &OnboardingProfile,
    ) -> Result<SubmissionReceipt, BackendError> {
        tracing::info!(
            parent = %profile.parent_name,
            child = %profile.child_name,
            dream_career = profile.dream_career.title(),
            strengths = profile.strengths.len(),
            challenges = profile.challenges.len(),
            "Submitting simulated onboarding profile"
        );
        tokio::time::sleep(self.submission_delay).await;

        Ok(SubmissionReceipt {
            reference: Uuid::new_v4(),
            submitted_at: chrono::Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BillingCycle;

    fn request() -> PaymentRequest {
        PaymentRequest {
            plan_name: "Pro".to_string(),
            student_name: "Aarav".to_string(),
            method: PaymentMethod::Upi,
            billing_cycle: BillingCycle::Monthly,
            amount: 3539,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_payment_waits_fixed_delay_then_succeeds() {
        let backend = SimulatedBackend::default();
        let start = tokio::time::Instant::now();

        let receipt = backend.process_payment(&request()).await.unwrap();

        assert!(start.elapsed() >= DEFAULT_PAYMENT_DELAY);
        assert_eq!(receipt.method, PaymentMethod::Upi);
        assert_eq!(receipt.amount, 3539);
    }

    #[tokio::test]
    async fn instant_backend_always_succeeds() {
        let backend = SimulatedBackend::instant();
        for _ in 0..3 {
            assert!(backend.process_payment(&request()).await.is_ok());
        }
    }

    #[test]
    fn backend_error_displays_message() {
        assert_eq!(BackendError::new("gateway down").to_string(), "gateway down");
    }
}
