use super::*;
use crate::services::directory::UserAccount;
use std::path::PathBuf;

fn config_with(accounts_file: Option<PathBuf>) -> AppConfig {
    AppConfig {
        port: 0,
        store_timeout: None,
        cookie_secure: true,
        session_ttl: std::time::Duration::from_secs(900),
        accounts_file,
        hash_params: test_helpers::TEST_HASH_PARAMS,
    }
}

#[test]
fn from_config_without_file_seeds_demo_accounts() {
    let state = AppState::from_config(&config_with(None)).unwrap();
    assert_eq!(state.directory.len(), 2);
    assert!(state.directory.lookup("admin", "admin").is_some());
    assert!(state.cookie_secure);
    assert_eq!(state.sessions.ttl(), std::time::Duration::from_secs(900));
}

#[test]
fn from_config_loads_accounts_file() {
    let hasher = test_helpers::test_hasher();
    let accounts = vec![UserAccount {
        username: "auditor".into(),
        password_hash: hasher.hash("ledger").unwrap(),
        role: "Auditor".into(),
    }];
    let path = std::env::temp_dir().join(format!("session-auth-state-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, serde_json::to_string(&accounts).unwrap()).unwrap();

    let state = AppState::from_config(&config_with(Some(path.clone()))).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(state.directory.len(), 1);
    assert!(state.directory.lookup("admin", "admin").is_none());
    assert_eq!(state.directory.lookup("Auditor", "ledger").unwrap().role, "Auditor");
}

#[test]
fn from_config_missing_file_is_error() {
    let path = std::env::temp_dir().join(format!("session-auth-none-{}.json", uuid::Uuid::new_v4()));
    assert!(matches!(AppState::from_config(&config_with(Some(path))), Err(DirectoryError::Io(_))));
}

#[test]
fn from_config_rejects_invalid_hash_params() {
    let mut config = config_with(None);
    config.hash_params.iterations = 0;
    assert!(matches!(AppState::from_config(&config), Err(DirectoryError::Password(_))));
}

#[tokio::test]
async fn test_app_state_starts_without_browser_sessions() {
    let state = test_helpers::test_app_state();
    assert_eq!(state.sessions.len().await, 0);
    assert!(!state.cookie_secure);
}
