//! JuniorDream API server library.
//!
//! Exposes the building blocks (config, state, error handling, session store,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod sweeper;
