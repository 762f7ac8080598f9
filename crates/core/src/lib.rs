//! Domain logic for the JuniorDream enrollment funnel.
//!
//! Every wizard in this crate is a plain state machine: callers feed it field
//! updates and transition requests, and it answers with the new state or a
//! [`error::CoreError`]. Side effects (navigation, the simulated backend) are
//! expressed as values or traits so hosts decide how to carry them out.

pub mod backend;
pub mod checkout;
pub mod contact;
pub mod enrollment;
pub mod error;
pub mod navigation;
pub mod onboarding;
pub mod payment;
pub mod plan;
pub mod types;
