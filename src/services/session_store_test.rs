use super::*;

#[tokio::test]
async fn get_missing_key_returns_none() {
    let store = MemorySessionStore::new();
    assert!(store.get(SESSION_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get_returns_value() {
    let store = MemorySessionStore::new();
    store.set(SESSION_KEY, "payload".into()).await.unwrap();
    assert_eq!(store.get(SESSION_KEY).await.unwrap().as_deref(), Some("payload"));
}

#[tokio::test]
async fn set_overwrites_previous_value() {
    let store = MemorySessionStore::new();
    store.set(SESSION_KEY, "first".into()).await.unwrap();
    store.set(SESSION_KEY, "second".into()).await.unwrap();
    assert_eq!(store.get(SESSION_KEY).await.unwrap().as_deref(), Some("second"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn delete_removes_value() {
    let store = MemorySessionStore::new();
    store.set(SESSION_KEY, "payload".into()).await.unwrap();
    store.delete(SESSION_KEY).await.unwrap();
    assert!(store.get(SESSION_KEY).await.unwrap().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn delete_missing_key_is_ok() {
    let store = MemorySessionStore::new();
    assert!(store.delete(SESSION_KEY).await.is_ok());
}

#[tokio::test]
async fn keys_are_independent() {
    let store = MemorySessionStore::new();
    store.set("a", "1".into()).await.unwrap();
    store.set("b", "2".into()).await.unwrap();
    store.delete("a").await.unwrap();
    assert!(store.get("a").await.unwrap().is_none());
    assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
}

#[test]
fn store_error_messages() {
    let err = StoreError::Unavailable("disk gone".into());
    assert_eq!(err.to_string(), "session store unavailable: disk gone");
    let err = StoreError::Timeout(Duration::from_millis(250));
    assert!(err.to_string().contains("250ms"));
}

#[test]
fn serde_failure_is_an_encode_error_not_unavailable() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = StoreError::from(json_err);
    assert!(matches!(err, StoreError::Encode(_)));
    assert!(err.to_string().starts_with("session record does not serialize"));
}
