//! Enrollment -> payment -> success handoff for one selected plan.
//!
//! [`CheckoutFlow`] owns whichever stage is current. Each transition consumes
//! the previous stage, so a flow is never enrolling and paying at once.

use std::sync::Arc;

use serde::Serialize;

use crate::backend::{BackendError, FunnelBackend, PaymentReceipt};
use crate::enrollment::{
    EnrollmentAdvance, EnrollmentField, EnrollmentRetreat, EnrollmentStep, EnrollmentWizard,
};
use crate::error::CoreError;
use crate::navigation::{NavigationRequest, Page};
use crate::payment::{PaymentMethod, PaymentRequest, PaymentSimulator};
use crate::plan::{BillingCycle, SelectedPlan};

/// Billing cycle the checkout charges.
pub const CHECKOUT_BILLING_CYCLE: BillingCycle = BillingCycle::Monthly;

/// What the success view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentConfirmation {
    pub student_name: String,
    pub plan_name: String,
    pub receipt: PaymentReceipt,
}

#[derive(Debug, Clone)]
pub enum CheckoutStage {
    Enrolling(EnrollmentWizard),
    Paying(PaymentSimulator),
    Completed(EnrollmentConfirmation),
    /// Backed out of the first enrollment step.
    Cancelled,
}

impl CheckoutStage {
    fn payment_mut(&mut self) -> Result<&mut PaymentSimulator, CoreError> {
        match self {
            Self::Paying(payment) => Ok(payment),
            other => Err(CoreError::Conflict(format!(
                "Checkout is {}, not paying",
                other.name()
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Enrolling(_) => "enrolling",
            Self::Paying(_) => "paying",
            Self::Completed(_) => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Result of an enrollment navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMove {
    /// Still enrolling, now on this step.
    Enrollment(EnrollmentStep),
    /// Enrollment completed; the payment stage is open.
    Payment,
    /// The flow ended and the host should navigate.
    Leave(NavigationRequest),
}

/// One visitor's checkout for one plan.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    plan: Arc<SelectedPlan>,
    stage: CheckoutStage,
}

impl CheckoutFlow {
    /// Start enrolling for `plan`. Plans without numeric fees cannot be bought.
    pub fn start(plan: SelectedPlan) -> Result<Self, CoreError> {
        plan.validate()?;
        let plan = Arc::new(plan);
        Ok(Self {
            stage: CheckoutStage::Enrolling(EnrollmentWizard::new(Arc::clone(&plan))),
            plan,
        })
    }

    pub fn plan(&self) -> &Arc<SelectedPlan> {
        &self.plan
    }

    pub fn stage(&self) -> &CheckoutStage {
        &self.stage
    }

    fn wizard_mut(&mut self) -> Result<&mut EnrollmentWizard, CoreError> {
        match &mut self.stage {
            CheckoutStage::Enrolling(wizard) => Ok(wizard),
            other => Err(CoreError::Conflict(format!(
                "Checkout is {}, not enrolling",
                other.name()
            ))),
        }
    }

    // -- enrollment --

    pub fn update(&mut self, field: EnrollmentField) -> Result<(), CoreError> {
        self.wizard_mut()?.update(field);
        Ok(())
    }

    /// Advance the enrollment; leaving the last step opens payment.
    pub fn next(&mut self) -> Result<CheckoutMove, CoreError> {
        match self.wizard_mut()?.next()? {
            EnrollmentAdvance::Step(step) => Ok(CheckoutMove::Enrollment(step)),
            EnrollmentAdvance::Completed(snapshot) => {
                let payment = PaymentSimulator::new(
                    Arc::clone(&self.plan),
                    snapshot,
                    CHECKOUT_BILLING_CYCLE,
                )?;
                tracing::debug!(plan = %self.plan.name, "Enrollment complete, opening payment");
                self.stage = CheckoutStage::Paying(payment);
                Ok(CheckoutMove::Payment)
            }
        }
    }

    /// Step back; backing out of the first step returns to the pricing page.
    pub fn previous(&mut self) -> Result<CheckoutMove, CoreError> {
        match self.wizard_mut()?.prev() {
            EnrollmentRetreat::Step(step) => Ok(CheckoutMove::Enrollment(step)),
            EnrollmentRetreat::Cancelled => {
                self.stage = CheckoutStage::Cancelled;
                Ok(CheckoutMove::Leave(NavigationRequest::Fragment(Page::Pricing)))
            }
        }
    }

    // -- payment --

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CoreError> {
        self.stage.payment_mut()?.select_method(method)
    }

    /// Leave payment for the last enrollment step, form intact.
    pub fn back_to_enrollment(&mut self) -> Result<EnrollmentStep, CoreError> {
        let payment = self.stage.payment_mut()?;
        if payment.is_locked() {
            return Err(CoreError::Conflict(
                "Payment is under way; cannot go back".to_string(),
            ));
        }

        let wizard = EnrollmentWizard::resume(Arc::clone(&self.plan), payment.enrollment());
        let step = wizard.step();
        self.stage = CheckoutStage::Enrolling(wizard);
        Ok(step)
    }

    /// Start the payment call; see [`PaymentSimulator::begin`].
    pub fn begin_payment(&mut self) -> Result<PaymentRequest, CoreError> {
        self.stage.payment_mut()?.begin()
    }

    /// Settle the payment call. Success completes the checkout.
    pub fn settle_payment(
        &mut self,
        outcome: Result<PaymentReceipt, BackendError>,
    ) -> Result<EnrollmentConfirmation, CoreError> {
        let payment = self.stage.payment_mut()?;
        let receipt = payment.settle(outcome)?;

        let confirmation = EnrollmentConfirmation {
            student_name: payment.enrollment().student_name.clone(),
            plan_name: self.plan.name.clone(),
            receipt,
        };
        self.stage = CheckoutStage::Completed(confirmation.clone());
        Ok(confirmation)
    }

    /// Run the payment end to end against `backend`.
    pub async fn pay(
        &mut self,
        backend: &dyn FunnelBackend,
    ) -> Result<EnrollmentConfirmation, CoreError> {
        let request = self.begin_payment()?;
        let outcome = backend.process_payment(&request).await;
        self.settle_payment(outcome)
    }

    /// "Back to Home" on the success view. The host discards the flow after.
    pub fn finish(&self) -> Result<NavigationRequest, CoreError> {
        match &self.stage {
            CheckoutStage::Completed(_) => Ok(NavigationRequest::Fragment(Page::Home)),
            other => Err(CoreError::Conflict(format!(
                "Checkout is {}, not completed",
                other.name()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackend, SubmissionReceipt};
    use crate::enrollment::{BatchSlot, Board, CareerGoal, Relationship, SchoolClass};
    use crate::onboarding::OnboardingProfile;
    use crate::payment::PaymentPhase;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct DecliningBackend;

    #[async_trait]
    impl FunnelBackend for DecliningBackend {
        async fn process_payment(
            &self,
            _request: &PaymentRequest,
        ) -> Result<PaymentReceipt, BackendError> {
            Err(BackendError::new("card declined"))
        }

        async fn submit_onboarding(
            &self,
            _profile: &OnboardingProfile,
        ) -> Result<SubmissionReceipt, BackendError> {
            Err(BackendError::new("unused"))
        }
    }

    fn pro_plan() -> SelectedPlan {
        SelectedPlan {
            name: "Pro".to_string(),
            class_range: "Class 9-10".to_string(),
            monthly_fee: "₹2,999".to_string(),
            annual_fee: "₹29,999".to_string(),
            color: String::new(),
        }
    }

    fn fill_all(flow: &mut CheckoutFlow) {
        for field in [
            EnrollmentField::StudentName("Aarav Sharma".into()),
            EnrollmentField::DateOfBirth(NaiveDate::from_ymd_opt(2011, 4, 2)),
            EnrollmentField::CurrentClass(Some(SchoolClass::Nine)),
            EnrollmentField::SchoolName("DPS Noida".into()),
            EnrollmentField::Board(Some(Board::Cbse)),
            EnrollmentField::CareerGoal(Some(CareerGoal::Engineer)),
            EnrollmentField::ParentName("Meera Sharma".into()),
            EnrollmentField::Relationship(Some(Relationship::Mother)),
            EnrollmentField::Phone("9876543210".into()),
            EnrollmentField::PreferredBatch(Some(BatchSlot::SixToSeven)),
        ] {
            flow.update(field).unwrap();
        }
    }

    fn flow_at_payment() -> CheckoutFlow {
        let mut flow = CheckoutFlow::start(pro_plan()).unwrap();
        fill_all(&mut flow);
        flow.next().unwrap();
        flow.next().unwrap();
        assert_eq!(flow.next().unwrap(), CheckoutMove::Payment);
        flow
    }

    #[test]
    fn start_rejects_unpriced_plans() {
        let mut plan = pro_plan();
        plan.monthly_fee = "Free".into();
        assert_matches!(CheckoutFlow::start(plan), Err(CoreError::Validation(_)));
    }

    #[test]
    fn prev_on_first_step_returns_to_pricing() {
        let mut flow = CheckoutFlow::start(pro_plan()).unwrap();
        assert_eq!(
            flow.previous().unwrap(),
            CheckoutMove::Leave(NavigationRequest::Fragment(Page::Pricing))
        );
        assert_matches!(flow.stage(), CheckoutStage::Cancelled);
        assert_matches!(flow.next(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn next_on_last_step_opens_monthly_payment() {
        let flow = flow_at_payment();
        let CheckoutStage::Paying(payment) = flow.stage() else {
            panic!("expected paying stage");
        };
        assert_eq!(payment.breakdown().billing_cycle, BillingCycle::Monthly);
        assert_eq!(payment.breakdown().total, 3539);
        assert_eq!(payment.enrollment().student_name, "Aarav Sharma");
        assert!(Arc::ptr_eq(payment.plan(), flow.plan()));
    }

    #[test]
    fn incomplete_step_blocks_next() {
        let mut flow = CheckoutFlow::start(pro_plan()).unwrap();
        assert_matches!(flow.next(), Err(CoreError::Validation(_)));
        assert_matches!(flow.stage(), CheckoutStage::Enrolling(w) if w.step() == EnrollmentStep::Student);
    }

    #[test]
    fn payment_back_keeps_form() {
        let mut flow = flow_at_payment();
        flow.select_payment_method(PaymentMethod::Card).unwrap();

        assert_eq!(flow.back_to_enrollment().unwrap(), EnrollmentStep::Batch);
        let CheckoutStage::Enrolling(wizard) = flow.stage() else {
            panic!("expected enrolling stage");
        };
        assert_eq!(wizard.form().student_name, "Aarav Sharma");
        assert_eq!(wizard.form().preferred_batch, Some(BatchSlot::SixToSeven));

        assert_eq!(flow.next().unwrap(), CheckoutMove::Payment);
    }

    #[test]
    fn enrollment_actions_refused_while_paying() {
        let mut flow = flow_at_payment();
        assert_matches!(
            flow.update(EnrollmentField::SchoolName("x".into())),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(flow.previous(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn cannot_go_back_while_processing() {
        let mut flow = flow_at_payment();
        flow.select_payment_method(PaymentMethod::Upi).unwrap();
        flow.begin_payment().unwrap();
        assert_matches!(flow.back_to_enrollment(), Err(CoreError::Conflict(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn pay_completes_with_confirmation() {
        let mut flow = flow_at_payment();
        assert_matches!(flow.pay(&SimulatedBackend::default()).await, Err(CoreError::Validation(_)));

        flow.select_payment_method(PaymentMethod::NetBanking).unwrap();
        let confirmation = flow.pay(&SimulatedBackend::default()).await.unwrap();

        assert_eq!(confirmation.student_name, "Aarav Sharma");
        assert_eq!(confirmation.plan_name, "Pro");
        assert_eq!(confirmation.receipt.amount, 3539);
        assert_matches!(flow.stage(), CheckoutStage::Completed(_));
        assert_eq!(flow.finish().unwrap(), NavigationRequest::Fragment(Page::Home));
    }

    #[tokio::test]
    async fn declined_payment_stays_on_payment() {
        let mut flow = flow_at_payment();
        flow.select_payment_method(PaymentMethod::Card).unwrap();

        assert_matches!(flow.pay(&DecliningBackend).await, Err(CoreError::Submission(_)));
        let CheckoutStage::Paying(payment) = flow.stage() else {
            panic!("expected paying stage");
        };
        assert_eq!(payment.phase(), &PaymentPhase::Ready(PaymentMethod::Card));
    }

    #[test]
    fn finish_requires_completion() {
        let flow = CheckoutFlow::start(pro_plan()).unwrap();
        assert_matches!(flow.finish(), Err(CoreError::Conflict(_)));
    }
}
