use super::*;
use crate::identity::{IdentitySnapshot, UserSession};

// =============================================================================
// tokens
// =============================================================================

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// registry
// =============================================================================

#[tokio::test]
async fn open_registers_provider_under_token() {
    let sessions = BrowserSessions::new(None);
    let (token, provider) = sessions.open().await;

    let found = sessions.get(&token).await.expect("session should be registered");
    assert!(Arc::ptr_eq(&found, &provider));
    assert_eq!(sessions.len().await, 1);
}

#[tokio::test]
async fn opened_session_starts_anonymous_with_logger_subscribed() {
    let sessions = BrowserSessions::new(None);
    let (_token, provider) = sessions.open().await;
    assert_eq!(provider.current_state().await, IdentitySnapshot::anonymous());
    assert_eq!(provider.subscriber_count(), 1);
}

#[tokio::test]
async fn browser_sessions_do_not_share_stores() {
    let sessions = BrowserSessions::new(None);
    let (_a_token, a) = sessions.open().await;
    let (_b_token, b) = sessions.open().await;

    a.update_state(Some(UserSession::new("admin", "Administrator"))).await.unwrap();
    assert!(a.current_state().await.is_authenticated());
    assert!(!b.current_state().await.is_authenticated());
}

#[tokio::test]
async fn get_unknown_token_returns_none() {
    let sessions = BrowserSessions::new(None);
    assert!(sessions.get("nope").await.is_none());
}

#[tokio::test]
async fn close_removes_session() {
    let sessions = BrowserSessions::new(None);
    let (token, _provider) = sessions.open().await;
    assert!(sessions.close(&token).await);
    assert!(sessions.get(&token).await.is_none());
    assert!(!sessions.close(&token).await);
}

#[tokio::test]
async fn clones_share_the_registry() {
    let sessions = BrowserSessions::new(None);
    let other = sessions.clone();
    let (token, _provider) = sessions.open().await;
    assert!(other.get(&token).await.is_some());
}

#[tokio::test]
async fn close_detaches_identity_logger() {
    let sessions = BrowserSessions::new(None);
    let (token, provider) = sessions.open().await;
    sessions.close(&token).await;
    assert_eq!(provider.subscriber_count(), 0);
}

// =============================================================================
// expiry
// =============================================================================

#[tokio::test]
async fn new_registry_uses_default_ttl() {
    assert_eq!(BrowserSessions::new(None).ttl(), DEFAULT_SESSION_TTL);
}

#[tokio::test]
async fn expired_session_reads_as_absent_and_is_removed() {
    let sessions = BrowserSessions::new(None).with_ttl(Duration::from_millis(20));
    let (token, provider) = sessions.open().await;
    assert!(sessions.get(&token).await.is_some());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sessions.len().await, 0);
    assert!(sessions.get(&token).await.is_none());
    assert!(sessions.inner.read().await.is_empty());
    assert_eq!(provider.subscriber_count(), 0);
}

#[tokio::test]
async fn open_sweeps_expired_sessions() {
    let sessions = BrowserSessions::new(None).with_ttl(Duration::from_millis(20));
    let mut stale = Vec::new();
    for _ in 0..5 {
        stale.push(sessions.open().await.1);
    }
    assert_eq!(sessions.inner.read().await.len(), 5);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let (token, _provider) = sessions.open().await;

    let inner = sessions.inner.read().await;
    assert_eq!(inner.len(), 1);
    assert!(inner.contains_key(&token));
    assert!(stale.iter().all(|provider| provider.subscriber_count() == 0));
}

#[tokio::test]
async fn unexpired_sessions_survive_a_sweep() {
    let sessions = BrowserSessions::new(None).with_ttl(Duration::from_secs(60));
    let (first, _a) = sessions.open().await;
    let (_second, _b) = sessions.open().await;
    assert_eq!(sessions.len().await, 2);
    assert!(sessions.get(&first).await.is_some());
}
