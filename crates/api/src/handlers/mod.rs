pub mod checkout;
pub mod contact;
pub mod onboarding;
pub mod pages;
