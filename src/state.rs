//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the credential directory (read-only after start-up) and the
//! registry of live browser sessions, each with its own protected store
//! and identity provider.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::services::browser::BrowserSessions;
use crate::services::directory::{CredentialDirectory, DirectoryError, StaticAccounts};
use crate::services::password::CredentialHasher;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<CredentialDirectory>,
    pub sessions: BrowserSessions,
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(directory: CredentialDirectory, sessions: BrowserSessions, cookie_secure: bool) -> Self {
        Self { directory: Arc::new(directory), sessions, cookie_secure }
    }

    /// Build state from config: load or seed accounts, then wire the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the Argon2 parameters are invalid or the accounts
    /// file cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectoryError> {
        let hasher = CredentialHasher::new(config.hash_params)?;

        let accounts = match &config.accounts_file {
            Some(path) => {
                let accounts = StaticAccounts::load(path)?;
                info!(path = %path.display(), "loaded accounts file");
                accounts
            }
            None => {
                warn!("ACCOUNTS_FILE not set; using built-in demo accounts");
                StaticAccounts::seeded(&hasher)?
            }
        };

        let directory = CredentialDirectory::new(Arc::new(accounts), hasher)?;
        info!(accounts = directory.len(), "credential directory ready");

        let sessions = BrowserSessions::new(config.store_timeout).with_ttl(config.session_ttl);
        Ok(Self::new(directory, sessions, config.cookie_secure))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
