//! Payment stage of the checkout.
//!
//! Takes the selected plan and the completed enrollment, prices it (plan fee
//! plus 18% GST), and runs a single payment through a [`FunnelBackend`].
//! "Pay" is only possible once a method is chosen, and the simulator is busy
//! for the whole backend call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, FunnelBackend, PaymentReceipt};
use crate::enrollment::EnrollmentSnapshot;
use crate::error::CoreError;
use crate::plan::{BillingCycle, SelectedPlan};

/// GST charged on top of the plan fee, in percent.
pub const GST_PERCENT: u64 = 18;

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
    NetBanking,
}

/// Every supported method, in display order.
pub const ALL_PAYMENT_METHODS: [PaymentMethod; 3] =
    [PaymentMethod::Upi, PaymentMethod::Card, PaymentMethod::NetBanking];

impl PaymentMethod {
    pub fn id(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::NetBanking => "netbanking",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Credit/Debit Card",
            Self::NetBanking => "Net Banking",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Upi => "Google Pay, PhonePe, Paytm",
            Self::Card => "Visa, Mastercard, RuPay",
            Self::NetBanking => "All major banks",
        }
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Amounts shown in the order summary, in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub billing_cycle: BillingCycle,
    pub plan_price: u64,
    pub gst: u64,
    pub total: u64,
    /// `monthly * 12 - annual` on yearly billing, zero otherwise.
    pub savings: i64,
}

/// `amount * percent / 100`, rounded half up.
fn percent_of(amount: u64, percent: u64) -> Result<u64, CoreError> {
    amount
        .checked_mul(percent)
        .and_then(|scaled| scaled.checked_add(50))
        .map(|scaled| scaled / 100)
        .ok_or_else(|| CoreError::Validation(format!("Amount {amount} is too large to price")))
}

fn signed(amount: u64) -> Result<i64, CoreError> {
    i64::try_from(amount)
        .map_err(|_| CoreError::Validation(format!("Amount {amount} is too large to price")))
}

/// Price `plan` for `cycle`.
pub fn compute_breakdown(
    plan: &SelectedPlan,
    cycle: BillingCycle,
) -> Result<PriceBreakdown, CoreError> {
    let plan_price = plan.fee_for(cycle)?;

    let savings = match cycle {
        BillingCycle::Monthly => 0,
        BillingCycle::Yearly => {
            let monthly = signed(plan.fee_for(BillingCycle::Monthly)?)?;
            let yearly_at_monthly = monthly.checked_mul(12).ok_or_else(|| {
                CoreError::Validation(format!("Amount {monthly} is too large to price"))
            })?;
            yearly_at_monthly - signed(plan_price)?
        }
    };

    Ok(PriceBreakdown {
        billing_cycle: cycle,
        plan_price,
        gst: percent_of(plan_price, GST_PERCENT)?,
        total: percent_of(plan_price, 100 + GST_PERCENT)?,
        savings,
    })
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// What the backend is asked to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub plan_name: String,
    pub student_name: String,
    pub method: PaymentMethod,
    pub billing_cycle: BillingCycle,
    /// Total including GST.
    pub amount: u64,
}

/// Where the payment stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum PaymentPhase {
    /// No method chosen; "Pay" disabled.
    AwaitingMethod,
    /// Method chosen; "Pay" enabled.
    Ready(PaymentMethod),
    /// Backend call in flight; every control disabled.
    Processing(PaymentMethod),
    /// Paid.
    Succeeded(PaymentReceipt),
}

/// Payment stage for one completed enrollment.
#[derive(Debug, Clone)]
pub struct PaymentSimulator {
    plan: Arc<SelectedPlan>,
    enrollment: EnrollmentSnapshot,
    breakdown: PriceBreakdown,
    phase: PaymentPhase,
}

impl PaymentSimulator {
    pub fn new(
        plan: Arc<SelectedPlan>,
        enrollment: EnrollmentSnapshot,
        billing_cycle: BillingCycle,
    ) -> Result<Self, CoreError> {
        let breakdown = compute_breakdown(&plan, billing_cycle)?;
        Ok(Self {
            plan,
            enrollment,
            breakdown,
            phase: PaymentPhase::AwaitingMethod,
        })
    }

    pub fn plan(&self) -> &Arc<SelectedPlan> {
        &self.plan
    }

    pub fn enrollment(&self) -> &EnrollmentSnapshot {
        &self.enrollment
    }

    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    pub fn phase(&self) -> &PaymentPhase {
        &self.phase
    }

    /// Whether the "Pay" control is enabled.
    pub fn can_pay(&self) -> bool {
        matches!(self.phase, PaymentPhase::Ready(_))
    }

    /// Processing or already paid: the stage can no longer be left.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.phase,
            PaymentPhase::Processing(_) | PaymentPhase::Succeeded(_)
        )
    }

    /// Choose (or change) the payment method.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CoreError> {
        match self.phase {
            PaymentPhase::AwaitingMethod | PaymentPhase::Ready(_) => {
                self.phase = PaymentPhase::Ready(method);
                Ok(())
            }
            PaymentPhase::Processing(_) => Err(CoreError::Conflict(
                "Payment is processing; the method can no longer change".to_string(),
            )),
            PaymentPhase::Succeeded(_) => {
                Err(CoreError::Conflict("Payment already completed".to_string()))
            }
        }
    }

    /// Enter `Processing` and return the request to hand to the backend.
    pub fn begin(&mut self) -> Result<PaymentRequest, CoreError> {
        let method = match self.phase {
            PaymentPhase::Ready(method) => method,
            PaymentPhase::AwaitingMethod => {
                return Err(CoreError::Validation(
                    "Select a payment method first".to_string(),
                ))
            }
            PaymentPhase::Processing(_) => {
                return Err(CoreError::Conflict(
                    "Payment is already processing".to_string(),
                ))
            }
            PaymentPhase::Succeeded(_) => {
                return Err(CoreError::Conflict("Payment already completed".to_string()))
            }
        };

        self.phase = PaymentPhase::Processing(method);
        Ok(PaymentRequest {
            plan_name: self.plan.name.clone(),
            student_name: self.enrollment.student_name.clone(),
            method,
            billing_cycle: self.breakdown.billing_cycle,
            amount: self.breakdown.total,
        })
    }

    /// Record the backend's answer for the call started by [`begin`](Self::begin).
    ///
    /// A rejection returns the simulator to `Ready` with the same method.
    pub fn settle(
        &mut self,
        outcome: Result<PaymentReceipt, BackendError>,
    ) -> Result<PaymentReceipt, CoreError> {
        let PaymentPhase::Processing(method) = self.phase else {
            return Err(CoreError::Conflict(
                "No payment is processing".to_string(),
            ));
        };

        match outcome {
            Ok(receipt) => {
                tracing::info!(reference = %receipt.reference, amount = receipt.amount, "Payment settled");
                self.phase = PaymentPhase::Succeeded(receipt.clone());
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Payment rejected");
                self.phase = PaymentPhase::Ready(method);
                Err(CoreError::Submission(err.message))
            }
        }
    }

    /// Run one payment end to end against `backend`.
    pub async fn pay(&mut self, backend: &dyn FunnelBackend) -> Result<PaymentReceipt, CoreError> {
        let request = self.begin()?;
        let outcome = backend.process_payment(&request).await;
        self.settle(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
