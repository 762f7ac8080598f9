use std::sync::Arc;

use juniordream_core::backend::FunnelBackend;
use juniordream_core::checkout::CheckoutFlow;
use juniordream_core::onboarding::OnboardingWizard;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where payments and onboarding profiles are submitted.
    pub backend: Arc<dyn FunnelBackend>,
    /// Live enrollment/payment checkouts.
    pub checkouts: Arc<SessionStore<CheckoutFlow>>,
    /// Live parent onboarding sessions.
    pub onboarding: Arc<SessionStore<OnboardingWizard>>,
}

impl AppState {
    pub fn new(config: ServerConfig, backend: Arc<dyn FunnelBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            checkouts: Arc::new(SessionStore::new("Checkout")),
            onboarding: Arc::new(SessionStore::new("OnboardingSession")),
        }
    }
}
