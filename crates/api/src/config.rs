use std::time::Duration;

use juniordream_core::backend::SimulatedBackend;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Delay before a simulated payment succeeds (default: `2000`).
    pub payment_delay_ms: u64,
    /// Delay before a simulated onboarding submission settles (default: `1500`).
    pub submission_delay_ms: u64,
    /// Sessions unseen for this long are evicted (default: `1800`).
    pub session_idle_timeout_secs: u64,
    /// How often idle sessions are swept (default: `60`).
    pub session_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `PAYMENT_DELAY_MS`            | `2000`                  |
    /// | `SUBMISSION_DELAY_MS`         | `1500`                  |
    /// | `SESSION_IDLE_TIMEOUT_SECS`   | `1800`                  |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `60`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let payment_delay_ms: u64 = std::env::var("PAYMENT_DELAY_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("PAYMENT_DELAY_MS must be a valid u64");

        let submission_delay_ms: u64 = std::env::var("SUBMISSION_DELAY_MS")
            .unwrap_or_else(|_| "1500".into())
            .parse()
            .expect("SUBMISSION_DELAY_MS must be a valid u64");

        let session_idle_timeout_secs: u64 = std::env::var("SESSION_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("SESSION_IDLE_TIMEOUT_SECS must be a valid u64");

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            payment_delay_ms,
            submission_delay_ms,
            session_idle_timeout_secs,
            session_sweep_interval_secs,
        }
    }

    /// The simulated backend configured with this server's delays.
    pub fn simulated_backend(&self) -> SimulatedBackend {
        SimulatedBackend::new(
            Duration::from_millis(self.payment_delay_ms),
            Duration::from_millis(self.submission_delay_ms),
        )
    }
}
