//! Session-backed authentication for browser clients.
//!
//! A browser session owns a protected key-value store holding at most one
//! `UserSession`. The identity provider derives an authenticated or
//! anonymous snapshot from that record on demand, and publishes a new
//! snapshot to its subscribers whenever login or logout rewrites it. The
//! credential directory checks username/password pairs against Argon2
//! hashes from an injected account repository.

pub mod config;
pub mod identity;
pub mod routes;
pub mod services;
pub mod state;
