//! Auth routes: password login, logout and the current identity.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::{error, info, warn};

use crate::identity::{IdentitySnapshot, UserSession};
use crate::services::provider::SessionAuthProvider;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "browser_session";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Identity snapshot as returned to the browser.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub authenticated: bool,
    #[serde(flatten)]
    pub snapshot: IdentitySnapshot,
}

impl From<IdentitySnapshot> for IdentityResponse {
    fn from(snapshot: IdentitySnapshot) -> Self {
        Self { authenticated: snapshot.is_authenticated(), snapshot }
    }
}

fn session_cookie(token: String, secure: bool, ttl: std::time::Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::try_from(ttl).unwrap_or(Duration::MAX))
        .build()
}

fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Resolve the caller's browser session from its cookie, if it is still live.
async fn browser_session(state: &AppState, jar: &CookieJar) -> Option<(String, Arc<SessionAuthProvider>)> {
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return None;
    }
    let provider = state.sessions.get(token).await?;
    Some((token.to_owned(), provider))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: verify credentials and persist the session behind a cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(req): Json<LoginRequest>) -> Response {
    let directory = state.directory.clone();
    let LoginRequest { username, password } = req;
    let account = match tokio::task::spawn_blocking(move || directory.lookup(&username, &password)).await {
        Ok(account) => account,
        Err(e) => {
            error!(error = %e, "credential lookup task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Credential lookup failed").into_response();
        }
    };

    let Some(account) = account else {
        info!("login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid username or password" })),
        )
            .into_response();
    };

    // Every successful login gets a fresh token; a token that existed before
    // authentication must never resolve to the new identity.
    let previous = browser_session(&state, &jar).await;
    let (token, provider) = state.sessions.open().await;

    let session = UserSession::new(account.username, account.role);
    let snapshot = match provider.update_state(Some(session)).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "session write failed");
            state.sessions.close(&token).await;
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store session").into_response();
        }
    };

    if let Some((previous_token, previous_provider)) = previous {
        if let Err(e) = previous_provider.update_state(None).await {
            warn!(error = %e, "previous session clear failed; closing it anyway");
        }
        state.sessions.close(&previous_token).await;
    }

    let browser_sessions = state.sessions.len().await;
    info!(role = snapshot.role().unwrap_or_default(), browser_sessions, "login accepted");
    let jar = jar.add(session_cookie(token, state.cookie_secure, state.sessions.ttl()));
    (jar, Json(IdentityResponse::from(snapshot))).into_response()
}

/// `POST /api/auth/logout`: delete the session and expire the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some((token, provider)) = browser_session(&state, &jar).await {
        if let Err(e) = provider.update_state(None).await {
            error!(error = %e, "session delete failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear session").into_response();
        }
        state.sessions.close(&token).await;
    }

    let jar = CookieJar::new().add(cleared_session_cookie(state.cookie_secure));
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// `GET /api/auth/me`: current identity; anonymous without a live session.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Json<IdentityResponse> {
    let snapshot = match browser_session(&state, &jar).await {
        Some((_, provider)) => provider.current_state().await,
        None => IdentitySnapshot::anonymous(),
    };
    Json(IdentityResponse::from(snapshot))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
