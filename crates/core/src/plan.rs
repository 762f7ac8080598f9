//! Pricing plans as chosen on the pricing page.
//!
//! A [`SelectedPlan`] is supplied by the caller and threaded unchanged through
//! enrollment, payment and the success view, so it is shared as
//! `Arc<SelectedPlan>` and never mutated.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Indian rupee sign used in displayed fees.
pub const RUPEE_SIGN: char = '₹';

/// Largest fee a plan may carry, in whole rupees (₹1 crore).
pub const MAX_PLAN_FEE: u64 = 10_000_000;

/// A plan picked on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPlan {
    pub name: String,
    pub class_range: String,
    /// Displayed monthly fee, e.g. `"₹2,999"`.
    pub monthly_fee: String,
    /// Displayed annual fee, e.g. `"₹29,999"`.
    pub annual_fee: String,
    #[serde(default)]
    pub color: String,
}

impl SelectedPlan {
    /// Reject plans missing the fields every later stage displays.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("Plan name is required".to_string()));
        }
        parse_rupee_amount(&self.monthly_fee)?;
        parse_rupee_amount(&self.annual_fee)?;
        Ok(())
    }

    /// Fee charged for one billing period of `cycle`.
    pub fn fee_for(&self, cycle: BillingCycle) -> Result<u64, CoreError> {
        match cycle {
            BillingCycle::Monthly => parse_rupee_amount(&self.monthly_fee),
            BillingCycle::Yearly => parse_rupee_amount(&self.annual_fee),
        }
    }
}

/// Billing period for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// Suffix shown next to an amount.
    pub fn period_label(self) -> &'static str {
        match self {
            Self::Monthly => "per month",
            Self::Yearly => "per year",
        }
    }
}

/// Parse a displayed rupee amount such as `"₹2,999"` into whole rupees.
///
/// The rupee sign, digit-group commas and whitespace are ignored. Anything
/// else (e.g. `"Free"` or `"Custom"`) is rejected, as is any amount above
/// [`MAX_PLAN_FEE`].
pub fn parse_rupee_amount(raw: &str) -> Result<u64, CoreError> {
    let digits: String = raw
        .chars()
        .filter(|c| *c != RUPEE_SIGN && *c != ',' && !c.is_whitespace())
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "'{raw}' is not a rupee amount"
        )));
    }

    let amount = digits
        .parse::<u64>()
        .map_err(|e| CoreError::Validation(format!("'{raw}' is not a rupee amount: {e}")))?;

    if amount > MAX_PLAN_FEE {
        return Err(CoreError::Validation(format!(
            "'{raw}' exceeds the maximum fee of {}",
            format_rupees(MAX_PLAN_FEE)
        )));
    }
    Ok(amount)
}

/// Format whole rupees with Indian digit grouping, e.g. `353900` -> `"₹3,53,900"`.
pub fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("{RUPEE_SIGN}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{RUPEE_SIGN}{},{tail}", groups.join(","))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
