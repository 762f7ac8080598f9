//! Three-step enrollment wizard (student -> parent -> batch).
//!
//! The wizard accumulates an [`EnrollmentForm`] field by field. `next` is
//! gated on the current step's required fields being present; leaving the
//! last step hands an immutable [`EnrollmentSnapshot`] to the payment stage.
//! Validation is presence-only: no phone or email format checks.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::plan::SelectedPlan;

// ---------------------------------------------------------------------------
// Choice lists
// ---------------------------------------------------------------------------

/// School class the student currently attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolClass {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "12")]
    Twelve,
}

impl SchoolClass {
    pub fn number(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten => 10,
            Self::Eleven => 11,
            Self::Twelve => 12,
        }
    }

    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            9 => Ok(Self::Nine),
            10 => Ok(Self::Ten),
            11 => Ok(Self::Eleven),
            12 => Ok(Self::Twelve),
            _ => Err(CoreError::Validation(format!(
                "Invalid class {n}. Must be between 6 and 12"
            ))),
        }
    }
}

/// Examination board of the student's school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Board {
    #[serde(rename = "CBSE")]
    Cbse,
    #[serde(rename = "ICSE")]
    Icse,
    #[serde(rename = "State Board")]
    StateBoard,
    Other,
}

/// "What do you want your child to become?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareerGoal {
    Engineer,
    Doctor,
    #[serde(rename = "IAS Officer")]
    IasOfficer,
    Scientist,
    #[serde(rename = "CA")]
    CharteredAccountant,
    Lawyer,
    #[serde(rename = "Software Developer")]
    SoftwareDeveloper,
    Other,
}

/// Relationship of the contact adult to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Father,
    Mother,
    Guardian,
    Other,
}

/// Daily one-hour class windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchSlot {
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "6-7")]
    SixToSeven,
    #[serde(rename = "7-8")]
    SevenToEight,
}

impl BatchSlot {
    pub fn label(self) -> &'static str {
        match self {
            Self::FiveToSix => "5:00 PM - 6:00 PM",
            Self::SixToSeven => "6:00 PM - 7:00 PM",
            Self::SevenToEight => "7:00 PM - 8:00 PM",
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The three enrollment steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStep {
    Student,
    Parent,
    Batch,
}

impl EnrollmentStep {
    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::Student => 1,
            Self::Parent => 2,
            Self::Batch => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "Student Information",
            Self::Parent => "Parent Information",
            Self::Batch => "Select Batch Timing",
        }
    }

    fn following(self) -> Option<Self> {
        match self {
            Self::Student => Some(Self::Parent),
            Self::Parent => Some(Self::Batch),
            Self::Batch => None,
        }
    }

    fn preceding(self) -> Option<Self> {
        match self {
            Self::Student => None,
            Self::Parent => Some(Self::Student),
            Self::Batch => Some(Self::Parent),
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Everything entered so far. Unset choices are `None`, untouched text is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentForm {
    pub student_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub current_class: Option<SchoolClass>,
    pub school_name: String,
    pub board: Option<Board>,
    pub career_goal: Option<CareerGoal>,

    pub parent_name: String,
    pub relationship: Option<Relationship>,
    pub email: String,
    pub phone: String,
    pub alternate_phone: String,

    pub preferred_batch: Option<BatchSlot>,
}

/// A single field edit, as sent by an input's change event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EnrollmentField {
    StudentName(String),
    DateOfBirth(Option<NaiveDate>),
    CurrentClass(Option<SchoolClass>),
    SchoolName(String),
    Board(Option<Board>),
    CareerGoal(Option<CareerGoal>),
    ParentName(String),
    Relationship(Option<Relationship>),
    Email(String),
    Phone(String),
    AlternatePhone(String),
    PreferredBatch(Option<BatchSlot>),
}

impl EnrollmentForm {
    /// Apply one field edit.
    pub fn apply(&mut self, field: EnrollmentField) {
        match field {
            EnrollmentField::StudentName(v) => self.student_name = v,
            EnrollmentField::DateOfBirth(v) => self.date_of_birth = v,
            EnrollmentField::CurrentClass(v) => self.current_class = v,
            EnrollmentField::SchoolName(v) => self.school_name = v,
            EnrollmentField::Board(v) => self.board = v,
            EnrollmentField::CareerGoal(v) => self.career_goal = v,
            EnrollmentField::ParentName(v) => self.parent_name = v,
            EnrollmentField::Relationship(v) => self.relationship = v,
            EnrollmentField::Email(v) => self.email = v,
            EnrollmentField::Phone(v) => self.phone = v,
            EnrollmentField::AlternatePhone(v) => self.alternate_phone = v,
            EnrollmentField::PreferredBatch(v) => self.preferred_batch = v,
        }
    }

    /// Required fields of `step` that are still empty.
    pub fn missing_fields(&self, step: EnrollmentStep) -> Vec<&'static str> {
        let required: Vec<(&'static str, bool)> = match step {
            EnrollmentStep::Student => vec![
                ("student_name", !self.student_name.is_empty()),
                ("date_of_birth", self.date_of_birth.is_some()),
                ("current_class", self.current_class.is_some()),
                ("school_name", !self.school_name.is_empty()),
                ("board", self.board.is_some()),
                ("career_goal", self.career_goal.is_some()),
            ],
            EnrollmentStep::Parent => vec![
                ("parent_name", !self.parent_name.is_empty()),
                ("relationship", self.relationship.is_some()),
                ("phone", !self.phone.is_empty()),
            ],
            EnrollmentStep::Batch => vec![("preferred_batch", self.preferred_batch.is_some())],
        };

        required
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect()
    }

    /// Whether every required field of `step` is present.
    pub fn is_step_valid(&self, step: EnrollmentStep) -> bool {
        self.missing_fields(step).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A completed enrollment, handed to the payment stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSnapshot {
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub current_class: SchoolClass,
    pub school_name: String,
    pub board: Board,
    pub career_goal: CareerGoal,

    pub parent_name: String,
    pub relationship: Relationship,
    /// `None` when left blank.
    pub email: Option<String>,
    pub phone: String,
    /// `None` when left blank.
    pub alternate_phone: Option<String>,

    pub preferred_batch: BatchSlot,
}

impl TryFrom<&EnrollmentForm> for EnrollmentSnapshot {
    type Error = CoreError;

    fn try_from(form: &EnrollmentForm) -> Result<Self, Self::Error> {
        let missing: Vec<&str> = [
            EnrollmentStep::Student,
            EnrollmentStep::Parent,
            EnrollmentStep::Batch,
        ]
        .into_iter()
        .flat_map(|step| form.missing_fields(step))
        .collect();

        let (
            Some(date_of_birth),
            Some(current_class),
            Some(board),
            Some(career_goal),
            Some(relationship),
            Some(preferred_batch),
            true,
        ) = (
            form.date_of_birth,
            form.current_class,
            form.board,
            form.career_goal,
            form.relationship,
            form.preferred_batch,
            missing.is_empty(),
        )
        else {
            return Err(CoreError::Validation(format!(
                "Enrollment is incomplete; missing: {}",
                missing.join(", ")
            )));
        };

        let optional = |s: &String| (!s.is_empty()).then(|| s.clone());

        Ok(Self {
            student_name: form.student_name.clone(),
            date_of_birth,
            current_class,
            school_name: form.school_name.clone(),
            board,
            career_goal,
            parent_name: form.parent_name.clone(),
            relationship,
            email: optional(&form.email),
            phone: form.phone.clone(),
            alternate_phone: optional(&form.alternate_phone),
            preferred_batch,
        })
    }
}

impl From<&EnrollmentSnapshot> for EnrollmentForm {
    fn from(snapshot: &EnrollmentSnapshot) -> Self {
        Self {
            student_name: snapshot.student_name.clone(),
            date_of_birth: Some(snapshot.date_of_birth),
            current_class: Some(snapshot.current_class),
            school_name: snapshot.school_name.clone(),
            board: Some(snapshot.board),
            career_goal: Some(snapshot.career_goal),
            parent_name: snapshot.parent_name.clone(),
            relationship: Some(snapshot.relationship),
            email: snapshot.email.clone().unwrap_or_default(),
            phone: snapshot.phone.clone(),
            alternate_phone: snapshot.alternate_phone.clone().unwrap_or_default(),
            preferred_batch: Some(snapshot.preferred_batch),
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Outcome of a successful `next`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentAdvance {
    /// Moved to the given step.
    Step(EnrollmentStep),
    /// Left the last step; the form is complete.
    Completed(EnrollmentSnapshot),
}

/// Outcome of `prev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentRetreat {
    /// Moved back to the given step.
    Step(EnrollmentStep),
    /// `prev` on the first step: back to the plans.
    Cancelled,
}

/// The enrollment wizard for one selected plan.
#[derive(Debug, Clone)]
pub struct EnrollmentWizard {
    plan: Arc<SelectedPlan>,
    step: EnrollmentStep,
    form: EnrollmentForm,
}

impl EnrollmentWizard {
    /// Start an empty wizard on the first step.
    pub fn new(plan: Arc<SelectedPlan>) -> Self {
        Self {
            plan,
            step: EnrollmentStep::Student,
            form: EnrollmentForm::default(),
        }
    }

    /// Reopen a completed enrollment on its last step, form intact.
    pub fn resume(plan: Arc<SelectedPlan>, snapshot: &EnrollmentSnapshot) -> Self {
        Self {
            plan,
            step: EnrollmentStep::Batch,
            form: EnrollmentForm::from(snapshot),
        }
    }

    pub fn plan(&self) -> &Arc<SelectedPlan> {
        &self.plan
    }

    pub fn step(&self) -> EnrollmentStep {
        self.step
    }

    pub fn form(&self) -> &EnrollmentForm {
        &self.form
    }

    pub fn update(&mut self, field: EnrollmentField) {
        self.form.apply(field);
    }

    /// Whether the "Next" control is enabled.
    pub fn can_advance(&self) -> bool {
        self.form.is_step_valid(self.step)
    }

    /// Advance one step, or complete the enrollment from the last step.
    pub fn next(&mut self) -> Result<EnrollmentAdvance, CoreError> {
        let missing = self.form.missing_fields(self.step);
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Step {} ({}) requires: {}",
                self.step.number(),
                self.step.label(),
                missing.join(", ")
            )));
        }

        match self.step.following() {
            Some(next) => {
                self.step = next;
                Ok(EnrollmentAdvance::Step(next))
            }
            None => EnrollmentSnapshot::try_from(&self.form).map(EnrollmentAdvance::Completed),
        }
    }

    /// Go back one step, or cancel from the first step.
    pub fn prev(&mut self) -> EnrollmentRetreat {
        match self.step.preceding() {
            Some(prev) => {
                self.step = prev;
                EnrollmentRetreat::Step(prev)
            }
            None => EnrollmentRetreat::Cancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn plan() -> Arc<SelectedPlan> {
        Arc::new(SelectedPlan {
            name: "Pro".to_string(),
            class_range: "Class 9-10".to_string(),
            monthly_fee: "₹2,999".to_string(),
            annual_fee: "₹29,999".to_string(),
            color: String::new(),
        })
    }

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 4, 12).unwrap()
    }

    fn fill_student(wizard: &mut EnrollmentWizard) {
        wizard.update(EnrollmentField::StudentName("Aarav Sharma".into()));
        wizard.update(EnrollmentField::DateOfBirth(Some(dob())));
        wizard.update(EnrollmentField::CurrentClass(Some(SchoolClass::Nine)));
        wizard.update(EnrollmentField::SchoolName("DPS Noida".into()));
        wizard.update(EnrollmentField::Board(Some(Board::Cbse)));
        wizard.update(EnrollmentField::CareerGoal(Some(CareerGoal::Doctor)));
    }

    fn fill_parent(wizard: &mut EnrollmentWizard) {
        wizard.update(EnrollmentField::ParentName("Meera Sharma".into()));
        wizard.update(EnrollmentField::Relationship(Some(Relationship::Mother)));
        wizard.update(EnrollmentField::Phone("98765 43210".into()));
    }

    #[test]
    fn starts_empty_on_student_step() {
        let wizard = EnrollmentWizard::new(plan());
        assert_eq!(wizard.step(), EnrollmentStep::Student);
        assert_eq!(wizard.form(), &EnrollmentForm::default());
        assert!(!wizard.can_advance());
    }

    #[test]
    fn student_step_requires_every_field() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        assert!(wizard.can_advance());

        wizard.update(EnrollmentField::SchoolName(String::new()));
        assert!(!wizard.can_advance());
        assert_eq!(
            wizard.form().missing_fields(EnrollmentStep::Student),
            vec!["school_name"]
        );

        wizard.update(EnrollmentField::SchoolName("DPS".into()));
        wizard.update(EnrollmentField::Board(None));
        assert!(!wizard.can_advance());
    }

    #[test]
    fn next_is_refused_while_step_invalid() {
        let mut wizard = EnrollmentWizard::new(plan());
        wizard.update(EnrollmentField::StudentName("Aarav".into()));

        assert_matches!(wizard.next(), Err(CoreError::Validation(msg)) if msg.contains("date_of_birth"));
        assert_eq!(wizard.step(), EnrollmentStep::Student);
    }

    #[test]
    fn parent_step_ignores_optional_contacts() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        wizard.next().unwrap();

        assert!(!wizard.can_advance());
        fill_parent(&mut wizard);
        assert!(wizard.form().email.is_empty());
        assert!(wizard.can_advance());
    }

    #[test]
    fn parent_step_requires_phone() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        wizard.next().unwrap();
        fill_parent(&mut wizard);
        wizard.update(EnrollmentField::Email("meera@example.com".into()));
        wizard.update(EnrollmentField::Phone(String::new()));

        assert!(!wizard.can_advance());
    }

    #[test]
    fn presence_is_the_only_check() {
        let mut form = EnrollmentForm::default();
        form.apply(EnrollmentField::ParentName(" ".into()));
        form.apply(EnrollmentField::Relationship(Some(Relationship::Other)));
        form.apply(EnrollmentField::Phone("not-a-number".into()));
        form.apply(EnrollmentField::Email("not-an-email".into()));

        assert!(form.is_step_valid(EnrollmentStep::Parent));
    }

    #[test]
    fn happy_path_emits_snapshot_with_entered_values() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        assert_eq!(wizard.next().unwrap(), EnrollmentAdvance::Step(EnrollmentStep::Parent));
        fill_parent(&mut wizard);
        wizard.update(EnrollmentField::AlternatePhone("011-2345678".into()));
        assert_eq!(wizard.next().unwrap(), EnrollmentAdvance::Step(EnrollmentStep::Batch));

        assert!(!wizard.can_advance());
        wizard.update(EnrollmentField::PreferredBatch(Some(BatchSlot::SixToSeven)));

        let snapshot = assert_matches!(wizard.next(), Ok(EnrollmentAdvance::Completed(s)) => s);
        assert_eq!(snapshot.student_name, "Aarav Sharma");
        assert_eq!(snapshot.date_of_birth, dob());
        assert_eq!(snapshot.current_class, SchoolClass::Nine);
        assert_eq!(snapshot.school_name, "DPS Noida");
        assert_eq!(snapshot.board, Board::Cbse);
        assert_eq!(snapshot.career_goal, CareerGoal::Doctor);
        assert_eq!(snapshot.parent_name, "Meera Sharma");
        assert_eq!(snapshot.relationship, Relationship::Mother);
        assert_eq!(snapshot.email, None);
        assert_eq!(snapshot.phone, "98765 43210");
        assert_eq!(snapshot.alternate_phone.as_deref(), Some("011-2345678"));
        assert_eq!(snapshot.preferred_batch, BatchSlot::SixToSeven);

        // Completing does not move the wizard.
        assert_eq!(wizard.step(), EnrollmentStep::Batch);
    }

    #[test]
    fn prev_walks_back_then_cancels() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        wizard.next().unwrap();
        fill_parent(&mut wizard);
        wizard.next().unwrap();

        assert_eq!(wizard.prev(), EnrollmentRetreat::Step(EnrollmentStep::Parent));
        assert_eq!(wizard.prev(), EnrollmentRetreat::Step(EnrollmentStep::Student));
        assert_eq!(wizard.prev(), EnrollmentRetreat::Cancelled);
        assert_eq!(wizard.step(), EnrollmentStep::Student);
        // Going back keeps what was typed.
        assert_eq!(wizard.form().parent_name, "Meera Sharma");
    }

    #[test]
    fn resume_restores_form_on_batch_step() {
        let mut wizard = EnrollmentWizard::new(plan());
        fill_student(&mut wizard);
        wizard.next().unwrap();
        fill_parent(&mut wizard);
        wizard.next().unwrap();
        wizard.update(EnrollmentField::PreferredBatch(Some(BatchSlot::FiveToSix)));
        let snapshot = assert_matches!(wizard.next(), Ok(EnrollmentAdvance::Completed(s)) => s);

        let resumed = EnrollmentWizard::resume(plan(), &snapshot);
        assert_eq!(resumed.step(), EnrollmentStep::Batch);
        assert_eq!(resumed.form(), wizard.form());
    }

    #[test]
    fn snapshot_rejects_incomplete_form() {
        let form = EnrollmentForm::default();
        assert_matches!(EnrollmentSnapshot::try_from(&form), Err(CoreError::Validation(_)));
    }

    #[test]
    fn field_updates_deserialize_from_json() {
        let field: EnrollmentField =
            serde_json::from_value(serde_json::json!({ "field": "board", "value": "State Board" }))
                .unwrap();
        assert_eq!(field, EnrollmentField::Board(Some(Board::StateBoard)));

        let field: EnrollmentField =
            serde_json::from_value(serde_json::json!({ "field": "current_class", "value": "10" }))
                .unwrap();
        assert_eq!(field, EnrollmentField::CurrentClass(Some(SchoolClass::Ten)));

        let field: EnrollmentField =
            serde_json::from_value(serde_json::json!({ "field": "preferred_batch", "value": null }))
                .unwrap();
        assert_eq!(field, EnrollmentField::PreferredBatch(None));
    }

    #[test]
    fn school_class_numbers() {
        for n in 6..=12 {
            assert_eq!(SchoolClass::from_number(n).unwrap().number(), n);
        }
        assert!(SchoolClass::from_number(5).is_err());
        assert!(SchoolClass::from_number(13).is_err());
    }
}
