//! Credential directory: username/password lookup over a read-only account
//! repository.
//!
//! DESIGN
//! ======
//! Accounts come from an injected `AccountRepository` so the built-in seed
//! list can be swapped for a file or a real credential store without
//! touching `lookup`. Usernames compare case-insensitively, passwords
//! exactly (against an Argon2 hash). A miss is a normal `None`, not an error.
//!
//! TRADE-OFFS
//! ==========
//! The scan is linear; the account list is expected to be tiny. When no
//! username matches, a decoy hash is still verified so an unknown user and
//! a wrong password take the same time.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::password::{CredentialHasher, PasswordError};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read accounts file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid accounts file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// A login-capable account. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    /// Argon2 PHC string. Never the cleartext password.
    pub password_hash: String,
    pub role: String,
}

/// Read-only source of accounts, scanned in order.
pub trait AccountRepository: Send + Sync {
    fn accounts(&self) -> &[UserAccount];
}

// =============================================================================
// STATIC ACCOUNTS
// =============================================================================

/// In-memory account list fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticAccounts {
    accounts: Vec<UserAccount>,
}

impl StaticAccounts {
    #[must_use]
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self { accounts }
    }

    /// Built-in demo accounts: `admin`/`admin` (Administrator) and
    /// `user`/`user` (User), hashed at construction.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    pub fn seeded(hasher: &CredentialHasher) -> Result<Self, DirectoryError> {
        let seed = [("admin", "admin", "Administrator"), ("user", "user", "User")];
        let accounts = seed
            .iter()
            .map(|(username, password, role)| {
                Ok(UserAccount {
                    username: (*username).to_owned(),
                    password_hash: hasher.hash(password)?,
                    role: (*role).to_owned(),
                })
            })
            .collect::<Result<Vec<_>, PasswordError>>()?;
        Ok(Self::new(accounts))
    }

    /// Parse a JSON array of `{username, password_hash, role}` objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match that shape.
    pub fn from_json(raw: &str) -> Result<Self, DirectoryError> {
        let accounts: Vec<UserAccount> = serde_json::from_str(raw)?;
        Ok(Self::new(accounts))
    }

    /// Load accounts from a JSON file (see [`StaticAccounts::from_json`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

impl AccountRepository for StaticAccounts {
    fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

pub struct CredentialDirectory {
    repo: Arc<dyn AccountRepository>,
    hasher: CredentialHasher,
    decoy_hash: String,
}

impl CredentialDirectory {
    /// # Errors
    ///
    /// Returns an error if the decoy hash cannot be computed.
    pub fn new(repo: Arc<dyn AccountRepository>, hasher: CredentialHasher) -> Result<Self, PasswordError> {
        let decoy_hash = hasher.hash("decoy password that never matches")?;
        Ok(Self { repo, hasher, decoy_hash })
    }

    /// Number of accounts in the backing repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.accounts().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.accounts().is_empty()
    }

    /// Find the first account whose username matches case-insensitively and
    /// whose password hash verifies against `password`.
    ///
    /// Argon2 verification is CPU-bound; async callers should run this on a
    /// blocking thread.
    #[must_use]
    pub fn lookup(&self, username: &str, password: &str) -> Option<UserAccount> {
        let wanted = username.to_uppercase();
        let mut candidates = self
            .repo
            .accounts()
            .iter()
            .filter(|account| account.username.to_uppercase() == wanted)
            .peekable();

        if candidates.peek().is_none() {
            let _ = self.hasher.verify(&self.decoy_hash, password);
            return None;
        }

        candidates
            .find(|account| self.hasher.verify(&account.password_hash, password))
            .cloned()
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
