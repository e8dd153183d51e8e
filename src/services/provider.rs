//! Session authentication provider.
//!
//! ARCHITECTURE
//! ============
//! Reads the `UserSession` record from the browser's protected store and
//! derives the current identity from it. Login and logout go through
//! `update_state`, which is the only write path: it mutates the store and
//! then publishes the resulting snapshot to every subscriber.
//!
//! TRADE-OFFS
//! ==========
//! The read path never fails. A missing record, a store error, a timeout or
//! a record that no longer deserializes all yield the anonymous identity,
//! so a tampered session silently logs the user out. The write path does
//! the opposite: store failures propagate and nothing is published.
//!
//! Publishing is best-effort `try_send`. A subscriber whose buffer is full
//! misses that snapshot; subscribers whose receiver was dropped are pruned.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::identity::{IdentitySnapshot, UserSession};
use crate::services::session_store::{SESSION_KEY, SessionStore, StoreError};

/// Per-subscriber channel capacity.
pub const SUBSCRIBER_BUFFER: usize = 16;

#[derive(Debug, thiserror::Error)]
enum SessionReadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session record does not deserialize: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Handle returned by [`SessionAuthProvider::subscribe`].
pub struct Subscription {
    pub id: Uuid,
    pub rx: mpsc::Receiver<IdentitySnapshot>,
}

pub struct SessionAuthProvider {
    store: Arc<dyn SessionStore>,
    store_timeout: Option<Duration>,
    subscribers: Mutex<HashMap<Uuid, mpsc::Sender<IdentitySnapshot>>>,
}

impl SessionAuthProvider {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, store_timeout: Option<Duration>) -> Self {
        Self { store, store_timeout, subscribers: Mutex::new(HashMap::new()) }
    }

    // =========================================================================
    // READ PATH
    // =========================================================================

    /// Derive the current identity from the stored session record.
    pub async fn current_state(&self) -> IdentitySnapshot {
        match self.read_session().await {
            Ok(Some(session)) => IdentitySnapshot::from_session(&session),
            Ok(None) => IdentitySnapshot::anonymous(),
            Err(e) => {
                warn!(error = %e, "session record unreadable; treating as anonymous");
                IdentitySnapshot::anonymous()
            }
        }
    }

    async fn read_session(&self) -> Result<Option<UserSession>, SessionReadError> {
        let Some(raw) = self.bounded(self.store.get(SESSION_KEY)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    // =========================================================================
    // WRITE PATH
    // =========================================================================

    /// Persist (`Some`) or delete (`None`) the session, then publish the
    /// resulting snapshot. Returns the published snapshot.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write or delete fails or times out,
    /// or `StoreError::Encode` if the session does not serialize.
    /// Subscribers are not notified in that case.
    pub async fn update_state(&self, session: Option<UserSession>) -> Result<IdentitySnapshot, StoreError> {
        let snapshot = if let Some(session) = session {
            let raw = serde_json::to_string(&session)?;
            self.bounded(self.store.set(SESSION_KEY, raw)).await?;
            IdentitySnapshot::from_session(&session)
        } else {
            self.bounded(self.store.delete(SESSION_KEY)).await?;
            IdentitySnapshot::anonymous()
        };

        let delivered = self.publish(&snapshot);
        debug!(authenticated = snapshot.is_authenticated(), delivered, "identity state updated");
        Ok(snapshot)
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => call.await,
        }
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    /// Register a new subscriber. Snapshots published after this call are
    /// delivered to the returned receiver.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = Uuid::new_v4();
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, tx);
        Subscription { id, rx }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: Uuid) {
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&id);
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Send a snapshot to every live subscriber. Returns how many accepted it.
    pub fn publish(&self, snapshot: &IdentitySnapshot) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        subscribers.retain(|_, tx| !tx.is_closed());

        let mut delivered = 0;
        for tx in subscribers.values() {
            if tx.try_send(snapshot.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
