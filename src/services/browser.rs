//! Browser-session registry.
//!
//! ARCHITECTURE
//! ============
//! Each browser session owns a private `MemorySessionStore` and the
//! `SessionAuthProvider` that reads and writes it. The browser holds only an
//! opaque random token (in an HttpOnly cookie) that selects its entry here;
//! the `UserSession` itself never leaves the server.
//!
//! A browser session is opened on each successful login and closed on
//! logout, so anonymous visitors never allocate an entry. Every entry also
//! has a fixed lifetime from the moment it was opened. Expired entries read
//! as absent and are removed on lookup or on the next `open`.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::provider::{SessionAuthProvider, Subscription};
use super::session_store::MemorySessionStore;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex browser-session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Default browser-session lifetime: 8 hours.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

struct BrowserSession {
    provider: Arc<SessionAuthProvider>,
    logger: Uuid,
    expires_at: Instant,
}

impl BrowserSession {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }

    fn detach(self) {
        self.provider.unsubscribe(self.logger);
    }
}

#[derive(Clone)]
pub struct BrowserSessions {
    store_timeout: Option<Duration>,
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, BrowserSession>>>,
}

impl BrowserSessions {
    #[must_use]
    pub fn new(store_timeout: Option<Duration>) -> Self {
        Self { store_timeout, ttl: DEFAULT_SESSION_TTL, inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Set the lifetime of sessions opened from now on.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a fresh browser session. Returns its token and provider.
    /// Expired sessions are swept first.
    pub async fn open(&self) -> (String, Arc<SessionAuthProvider>) {
        let token = generate_token();
        let provider = Arc::new(SessionAuthProvider::new(Arc::new(MemorySessionStore::new()), self.store_timeout));
        let logger = spawn_identity_logger(provider.subscribe());

        let now = Instant::now();
        let entry = BrowserSession { provider: provider.clone(), logger, expires_at: now + self.ttl };

        let mut sessions = self.inner.write().await;
        let swept = sweep_expired(&mut sessions, now);
        if swept > 0 {
            debug!(swept, "expired browser sessions removed");
        }
        sessions.insert(token.clone(), entry);
        (token, provider)
    }

    /// Look up a live session. An expired one is removed and reads as absent.
    pub async fn get(&self, token: &str) -> Option<Arc<SessionAuthProvider>> {
        {
            let sessions = self.inner.read().await;
            let entry = sessions.get(token)?;
            if entry.is_live(Instant::now()) {
                return Some(entry.provider.clone());
            }
        }
        self.close(token).await;
        None
    }

    /// Forget a browser session and detach its logger.
    pub async fn close(&self, token: &str) -> bool {
        let Some(entry) = self.inner.write().await.remove(token) else {
            return false;
        };
        entry.detach();
        true
    }

    /// Number of live (unexpired) sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner.read().await.values().filter(|entry| entry.is_live(now)).count()
    }
}

fn sweep_expired(sessions: &mut HashMap<String, BrowserSession>, now: Instant) -> usize {
    let expired: Vec<String> = sessions
        .iter()
        .filter(|(_, entry)| !entry.is_live(now))
        .map(|(token, _)| token.clone())
        .collect();
    for token in &expired {
        if let Some(entry) = sessions.remove(token) {
            entry.detach();
        }
    }
    expired.len()
}

/// Log every identity change a browser session publishes. Returns the
/// subscriber id; the task ends when that subscription is dropped.
fn spawn_identity_logger(subscription: Subscription) -> Uuid {
    let Subscription { id, mut rx } = subscription;
    tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            info!(
                subscriber = %id,
                authenticated = snapshot.is_authenticated(),
                name = snapshot.name().unwrap_or("-"),
                role = snapshot.role().unwrap_or("-"),
                "identity changed"
            );
        }
    });
    id
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod tests;
