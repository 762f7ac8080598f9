//! Parent onboarding wizard (6 steps) and its post-submission sub-flow.
//!
//! Steps 1-5 collect a profile of the parent and child; each step gates
//! `next` on its own predicate. Step 6 is the summary, where the profile is
//! submitted and a free session can then be scheduled:
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Submitted --schedule--> Scheduling --confirm--> Scheduled
//!   ^                   |
//!   +------ error ------+
//! ```
//!
//! Profile fields are frozen outside `Idle` so the submitted data cannot drift
//! from what is displayed.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backend::{FunnelBackend, SubmissionReceipt};
use crate::error::CoreError;
use crate::navigation::NavigationRequest;

/// Number of digits in an Indian mobile number.
pub const MOBILE_NUMBER_LEN: usize = 10;

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 6;

// ---------------------------------------------------------------------------
// Choice lists
// ---------------------------------------------------------------------------

/// Class range of the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildClassRange {
    #[serde(rename = "5th-8th")]
    Grades5To8,
    #[serde(rename = "9th-10th")]
    Grades9To10,
    #[serde(rename = "11th-12th")]
    Grades11To12,
    College,
}

/// The parent's dream career for the child (single choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DreamCareer {
    Doctor,
    Engineer,
    #[serde(rename = "IAS/UPSC Officer")]
    CivilServant,
    #[serde(rename = "MBA/Business Leader")]
    BusinessLeader,
    #[serde(rename = "Scientist/Researcher")]
    Scientist,
    #[serde(rename = "Not decided yet")]
    Undecided,
}

/// Every dream career, in display order.
pub const ALL_DREAM_CAREERS: [DreamCareer; 6] = [
    DreamCareer::Doctor,
    DreamCareer::Engineer,
    DreamCareer::CivilServant,
    DreamCareer::BusinessLeader,
    DreamCareer::Scientist,
    DreamCareer::Undecided,
];

impl DreamCareer {
    pub fn title(self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Engineer => "Engineer",
            Self::CivilServant => "IAS/UPSC Officer",
            Self::BusinessLeader => "MBA/Business Leader",
            Self::Scientist => "Scientist/Researcher",
            Self::Undecided => "Not decided yet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Doctor => "My child becomes a doctor and saves lives",
            Self::Engineer => "My child becomes an engineer from IIT/NIT",
            Self::CivilServant => "My child serves the nation",
            Self::BusinessLeader => "My child becomes a successful business leader",
            Self::Scientist => "My child makes new discoveries and inventions",
            Self::Undecided => "We need guidance to choose the right path",
        }
    }
}

/// Strength tags (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    #[serde(rename = "Academically Strong")]
    AcademicallyStrong,
    #[serde(rename = "Good Communication")]
    GoodCommunication,
    #[serde(rename = "Leadership Qualities")]
    LeadershipQualities,
    #[serde(rename = "Curious Mind")]
    CuriousMind,
    Determined,
}

/// Challenge tags (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Challenge {
    #[serde(rename = "Concentration Issues")]
    ConcentrationIssues,
    #[serde(rename = "Low Marks")]
    LowMarks,
    #[serde(rename = "Exam Fear")]
    ExamFear,
    #[serde(rename = "Lacks Direction")]
    LacksDirection,
    #[serde(rename = "Weak Communication")]
    WeakCommunication,
    #[serde(rename = "Other Challenges")]
    Other,
}

/// Bookable start times for the free session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingSlot {
    #[serde(rename = "10:00 AM")]
    TenAm,
    #[serde(rename = "10:30 AM")]
    TenThirtyAm,
    #[serde(rename = "11:00 AM")]
    ElevenAm,
    #[serde(rename = "11:30 AM")]
    ElevenThirtyAm,
    #[serde(rename = "12:00 PM")]
    Noon,
    #[serde(rename = "4:00 PM")]
    FourPm,
    #[serde(rename = "4:30 PM")]
    FourThirtyPm,
    #[serde(rename = "5:00 PM")]
    FivePm,
    #[serde(rename = "5:30 PM")]
    FiveThirtyPm,
}

/// Every meeting slot, in display order.
pub const ALL_MEETING_SLOTS: [MeetingSlot; 9] = [
    MeetingSlot::TenAm,
    MeetingSlot::TenThirtyAm,
    MeetingSlot::ElevenAm,
    MeetingSlot::ElevenThirtyAm,
    MeetingSlot::Noon,
    MeetingSlot::FourPm,
    MeetingSlot::FourThirtyPm,
    MeetingSlot::FivePm,
    MeetingSlot::FiveThirtyPm,
];

// ---------------------------------------------------------------------------
// Mobile number
// ---------------------------------------------------------------------------

/// Keep only ASCII digits and cut to [`MOBILE_NUMBER_LEN`].
pub fn normalize_mobile_number(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MOBILE_NUMBER_LEN)
        .collect()
}

/// A mobile number as stored: 0-10 ASCII digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Normalise raw keystroke input.
    pub fn from_input(input: &str) -> Self {
        Self(normalize_mobile_number(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exactly ten digits.
    pub fn is_complete(&self) -> bool {
        self.0.len() == MOBILE_NUMBER_LEN
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    BasicInfo,
    DreamCareer,
    Strengths,
    Challenges,
    Summary,
}

impl OnboardingStep {
    /// Convert a 1-based step number.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Welcome),
            2 => Ok(Self::BasicInfo),
            3 => Ok(Self::DreamCareer),
            4 => Ok(Self::Strengths),
            5 => Ok(Self::Challenges),
            6 => Ok(Self::Summary),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between 1 and {TOTAL_STEPS}"
            ))),
        }
    }

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::Welcome => 1,
            Self::BasicInfo => 2,
            Self::DreamCareer => 3,
            Self::Strengths => 4,
            Self::Challenges => 5,
            Self::Summary => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::BasicInfo => "Basic Info",
            Self::DreamCareer => "Your Dream",
            Self::Strengths => "Child's Strengths",
            Self::Challenges => "Challenges",
            Self::Summary => "Success!",
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Profile data gathered on steps 2-5.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnboardingForm {
    pub parent_name: String,
    pub child_name: String,
    /// Kept as typed; only presence is checked.
    pub child_age: String,
    pub child_class: Option<ChildClassRange>,
    pub location: String,
    pub mobile_number: MobileNumber,
    pub dream_career: Option<DreamCareer>,
    pub strengths: BTreeSet<Strength>,
    pub challenges: BTreeSet<Challenge>,
}

/// A single profile field edit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum OnboardingField {
    ParentName(String),
    ChildName(String),
    ChildAge(String),
    ChildClass(Option<ChildClassRange>),
    Location(String),
    /// Raw input; normalised before it is stored.
    MobileNumber(String),
    DreamCareer(Option<DreamCareer>),
}

impl OnboardingForm {
    pub fn apply(&mut self, field: OnboardingField) {
        match field {
            OnboardingField::ParentName(v) => self.parent_name = v,
            OnboardingField::ChildName(v) => self.child_name = v,
            OnboardingField::ChildAge(v) => self.child_age = v,
            OnboardingField::ChildClass(v) => self.child_class = v,
            OnboardingField::Location(v) => self.location = v,
            OnboardingField::MobileNumber(raw) => self.mobile_number = MobileNumber::from_input(&raw),
            OnboardingField::DreamCareer(v) => self.dream_career = v,
        }
    }

    /// Flip membership of `strength`; returns whether it is now selected.
    pub fn toggle_strength(&mut self, strength: Strength) -> bool {
        toggle(&mut self.strengths, strength)
    }

    /// Flip membership of `challenge`; returns whether it is now selected.
    pub fn toggle_challenge(&mut self, challenge: Challenge) -> bool {
        toggle(&mut self.challenges, challenge)
    }

    /// Requirements of `step` that are not yet met.
    pub fn missing_fields(&self, step: OnboardingStep) -> Vec<&'static str> {
        let required: Vec<(&'static str, bool)> = match step {
            OnboardingStep::Welcome | OnboardingStep::Summary => Vec::new(),
            OnboardingStep::BasicInfo => vec![
                ("parent_name", !self.parent_name.is_empty()),
                ("child_name", !self.child_name.is_empty()),
                ("child_age", !self.child_age.is_empty()),
                ("child_class", self.child_class.is_some()),
                ("location", !self.location.is_empty()),
                ("mobile_number", self.mobile_number.is_complete()),
            ],
            OnboardingStep::DreamCareer => vec![("dream_career", self.dream_career.is_some())],
            OnboardingStep::Strengths => vec![("strengths", !self.strengths.is_empty())],
            OnboardingStep::Challenges => vec![("challenges", !self.challenges.is_empty())],
        };

        required
            .into_iter()
            .filter_map(|(name, met)| (!met).then_some(name))
            .collect()
    }

    pub fn is_step_valid(&self, step: OnboardingStep) -> bool {
        self.missing_fields(step).is_empty()
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, item: T) -> bool {
    if set.remove(&item) {
        false
    } else {
        set.insert(item);
        true
    }
}

/// A complete profile, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingProfile {
    pub parent_name: String,
    pub child_name: String,
    pub child_age: String,
    pub child_class: ChildClassRange,
    pub location: String,
    pub mobile_number: String,
    pub dream_career: DreamCareer,
    pub strengths: BTreeSet<Strength>,
    pub challenges: BTreeSet<Challenge>,
}

impl TryFrom<&OnboardingForm> for OnboardingProfile {
    type Error = CoreError;

    fn try_from(form: &OnboardingForm) -> Result<Self, Self::Error> {
        let missing: Vec<&str> = [
            OnboardingStep::BasicInfo,
            OnboardingStep::DreamCareer,
            OnboardingStep::Strengths,
            OnboardingStep::Challenges,
        ]
        .into_iter()
        .flat_map(|step| form.missing_fields(step))
        .collect();

        let (Some(child_class), Some(dream_career), true) =
            (form.child_class, form.dream_career, missing.is_empty())
        else {
            return Err(CoreError::Validation(format!(
                "Onboarding profile is incomplete; missing: {}",
                missing.join(", ")
            )));
        };

        Ok(Self {
            parent_name: form.parent_name.clone(),
            child_name: form.child_name.clone(),
            child_age: form.child_age.clone(),
            child_class,
            location: form.location.clone(),
            mobile_number: form.mobile_number.as_str().to_string(),
            dream_career,
            strengths: form.strengths.clone(),
            challenges: form.challenges.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// Free-session request, editable only while scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeetingForm {
    pub date: Option<NaiveDate>,
    pub time: Option<MeetingSlot>,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum MeetingField {
    Date(Option<NaiveDate>),
    Time(Option<MeetingSlot>),
    Address(String),
}

/// A confirmed free session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSession {
    pub date: NaiveDate,
    pub time: MeetingSlot,
    pub address: String,
    pub parent_name: String,
    pub child_name: String,
    pub mobile_number: String,
}

// ---------------------------------------------------------------------------
// Submission phase
// ---------------------------------------------------------------------------

/// Step-6 sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionPhase {
    /// Summary with the Submit button.
    Idle,
    /// Backend call in flight.
    Submitting,
    /// Accepted; "Schedule Free Session" offered.
    Submitted { receipt: SubmissionReceipt },
    /// Date/time/address sub-form shown.
    Scheduling { receipt: SubmissionReceipt },
    /// Confirmation overlay shown.
    Scheduled {
        receipt: SubmissionReceipt,
        session: ScheduledSession,
    },
}

/// Data-free discriminant of [`SubmissionPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    Submitting,
    Submitted,
    Scheduling,
    Scheduled,
}

/// The phase spelled as the four independent UI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseFlags {
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub show_scheduling: bool,
    pub show_success_popup: bool,
}

impl PhaseKind {
    pub fn flags(self) -> PhaseFlags {
        let (is_submitting, is_submitted, show_scheduling, show_success_popup) = match self {
            Self::Idle => (false, false, false, false),
            Self::Submitting => (true, false, false, false),
            Self::Submitted => (false, true, false, false),
            Self::Scheduling => (false, true, true, false),
            Self::Scheduled => (false, true, true, true),
        };
        PhaseFlags {
            is_submitting,
            is_submitted,
            show_scheduling,
            show_success_popup,
        }
    }

    /// Decode a flag combination; `None` for combinations no phase produces.
    pub fn from_flags(flags: PhaseFlags) -> Option<Self> {
        [
            Self::Idle,
            Self::Submitting,
            Self::Submitted,
            Self::Scheduling,
            Self::Scheduled,
        ]
        .into_iter()
        .find(|kind| kind.flags() == flags)
    }
}

impl SubmissionPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Submitting => PhaseKind::Submitting,
            Self::Submitted { .. } => PhaseKind::Submitted,
            Self::Scheduling { .. } => PhaseKind::Scheduling,
            Self::Scheduled { .. } => PhaseKind::Scheduled,
        }
    }

    pub fn flags(&self) -> PhaseFlags {
        self.kind().flags()
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// One parent's pass through the onboarding flow.
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: OnboardingStep,
    form: OnboardingForm,
    meeting: MeetingForm,
    phase: SubmissionPhase,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::Welcome,
            form: OnboardingForm::default(),
            meeting: MeetingForm::default(),
            phase: SubmissionPhase::Idle,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn form(&self) -> &OnboardingForm {
        &self.form
    }

    pub fn meeting(&self) -> &MeetingForm {
        &self.meeting
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    /// Whether the "Continue" control is enabled.
    pub fn can_advance(&self) -> bool {
        self.step != OnboardingStep::Summary
            && matches!(self.phase, SubmissionPhase::Idle)
            && self.form.is_step_valid(self.step)
    }

    /// Whether the standalone "go home" action is offered.
    pub fn can_go_home(&self) -> bool {
        self.step != OnboardingStep::Summary
    }

    fn ensure_idle(&self, action: &str) -> Result<(), CoreError> {
        match self.phase {
            SubmissionPhase::Idle => Ok(()),
            _ => Err(CoreError::Conflict(format!(
                "Cannot {action} once the profile has been submitted"
            ))),
        }
    }

    pub fn update(&mut self, field: OnboardingField) -> Result<(), CoreError> {
        self.ensure_idle("edit the profile")?;
        self.form.apply(field);
        Ok(())
    }

    pub fn toggle_strength(&mut self, strength: Strength) -> Result<bool, CoreError> {
        self.ensure_idle("edit the profile")?;
        Ok(self.form.toggle_strength(strength))
    }

    pub fn toggle_challenge(&mut self, challenge: Challenge) -> Result<bool, CoreError> {
        self.ensure_idle("edit the profile")?;
        Ok(self.form.toggle_challenge(challenge))
    }

    /// Advance one step if the current one is valid. Stays put on the summary.
    pub fn next(&mut self) -> Result<OnboardingStep, CoreError> {
        self.ensure_idle("change steps")?;

        let missing = self.form.missing_fields(self.step);
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Step {} ({}) requires: {}",
                self.step.number(),
                self.step.label(),
                missing.join(", ")
            )));
        }

        if self.step.number() < TOTAL_STEPS {
            self.step = OnboardingStep::from_number(self.step.number() + 1)?;
        }
        Ok(self.step)
    }

    /// Go back one step, never before the first.
    pub fn back(&mut self) -> Result<OnboardingStep, CoreError> {
        self.ensure_idle("change steps")?;
        if self.step.number() > 1 {
            self.step = OnboardingStep::from_number(self.step.number() - 1)?;
        }
        Ok(self.step)
    }

    /// Leave the flow for the site root. Not offered on the summary step.
    pub fn go_home(&self) -> Result<NavigationRequest, CoreError> {
        if !self.can_go_home() {
            return Err(CoreError::Conflict(
                "Going home is not available on the final step".to_string(),
            ));
        }
        Ok(NavigationRequest::Root)
    }

    /// Enter `Submitting` and return the profile to hand to the backend.
    pub fn begin_submission(&mut self) -> Result<OnboardingProfile, CoreError> {
        if self.step != OnboardingStep::Summary {
            return Err(CoreError::Validation(format!(
                "Cannot submit from step {}; finish the wizard first",
                self.step.number()
            )));
        }
        match self.phase {
            SubmissionPhase::Idle => {}
            SubmissionPhase::Submitting => {
                return Err(CoreError::Conflict("Submission already in progress".to_string()))
            }
            _ => return Err(CoreError::Conflict("Profile already submitted".to_string())),
        }

        let profile = OnboardingProfile::try_from(&self.form)?;
        self.phase = SubmissionPhase::Submitting;
        Ok(profile)
    }

    /// Record the backend's answer for the call started by
    /// [`begin_submission`](Self::begin_submission).
    ///
    /// On failure the wizard returns to `Idle` with the form untouched.
    pub fn complete_submission(
        &mut self,
        outcome: Result<SubmissionReceipt, crate::backend::BackendError>,
    ) -> Result<SubmissionReceipt, CoreError> {
        if !matches!(self.phase, SubmissionPhase::Submitting) {
            return Err(CoreError::Conflict("No submission is in progress".to_string()));
        }

        match outcome {
            Ok(receipt) => {
                tracing::info!(reference = %receipt.reference, "Onboarding profile submitted");
                self.phase = SubmissionPhase::Submitted {
                    receipt: receipt.clone(),
                };
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Onboarding submission failed");
                self.phase = SubmissionPhase::Idle;
                Err(CoreError::Submission(err.message))
            }
        }
    }

    /// Submit the profile to `backend` and wait for it to settle.
    pub async fn submit(
        &mut self,
        backend: &dyn FunnelBackend,
    ) -> Result<SubmissionReceipt, CoreError> {
        let profile = self.begin_submission()?;
        let outcome = backend.submit_onboarding(&profile).await;
        self.complete_submission(outcome)
    }

    /// Open the scheduling sub-form.
    pub fn start_scheduling(&mut self) -> Result<(), CoreError> {
        match &self.phase {
            SubmissionPhase::Submitted { receipt } => {
                let receipt = receipt.clone();
                self.phase = SubmissionPhase::Scheduling { receipt };
                Ok(())
            }
            SubmissionPhase::Scheduling { .. } => Ok(()),
            _ => Err(CoreError::Conflict(
                "Scheduling opens only after the profile is submitted".to_string(),
            )),
        }
    }

    /// Edit the meeting request. Dates before `today` are refused.
    pub fn update_meeting(&mut self, field: MeetingField, today: NaiveDate) -> Result<(), CoreError> {
        if !matches!(self.phase, SubmissionPhase::Scheduling { .. }) {
            return Err(CoreError::Conflict(
                "Meeting details can only be edited while scheduling".to_string(),
            ));
        }

        match field {
            MeetingField::Date(Some(date)) if date < today => {
                return Err(CoreError::Validation(format!(
                    "Meeting date {date} is in the past"
                )));
            }
            MeetingField::Date(date) => self.meeting.date = date,
            MeetingField::Time(time) => self.meeting.time = time,
            MeetingField::Address(address) => self.meeting.address = address,
        }
        Ok(())
    }

    /// Confirm the meeting. Every field must be filled and the date not past.
    pub fn confirm_schedule(&mut self, today: NaiveDate) -> Result<ScheduledSession, CoreError> {
        let receipt = match &self.phase {
            SubmissionPhase::Scheduling { receipt } => receipt.clone(),
            _ => return Err(CoreError::Conflict("Not scheduling a session".to_string())),
        };

        let (Some(date), Some(time), false) = (
            self.meeting.date,
            self.meeting.time,
            self.meeting.address.is_empty(),
        ) else {
            return Err(CoreError::Validation(
                "Please fill in all scheduling details".to_string(),
            ));
        };
        if date < today {
            return Err(CoreError::Validation(format!(
                "Meeting date {date} is in the past"
            )));
        }

        let session = ScheduledSession {
            date,
            time,
            address: self.meeting.address.clone(),
            parent_name: self.form.parent_name.clone(),
            child_name: self.form.child_name.clone(),
            mobile_number: self.form.mobile_number.as_str().to_string(),
        };
        tracing::info!(%date, child = %session.child_name, "Free session scheduled");

        self.phase = SubmissionPhase::Scheduled {
            receipt,
            session: session.clone(),
        };
        Ok(session)
    }

    /// Dismiss the confirmation overlay, which leaves for the site root.
    pub fn close_confirmation(&self) -> Result<NavigationRequest, CoreError> {
        match self.phase {
            SubmissionPhase::Scheduled { .. } => Ok(NavigationRequest::Root),
            _ => Err(CoreError::Conflict("No confirmation is showing".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
