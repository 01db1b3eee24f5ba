use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::nav::Navigator;
use crate::storage::TokenStore;

use super::token;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token.
/// Written at login and cleared at logout; no refresh flow reads it back.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Path the session redirects to when it ends
pub const LOGIN_PATH: &str = "/login";

/// Error for a request aborted because the held token had already
/// expired. The invalidation side effect has run by the time a caller
/// sees this.
#[derive(Debug, thiserror::Error)]
#[error("session expired")]
pub struct SessionExpired;

/// Shared handle to the user's session.
///
/// Holds the decision points of the token lifecycle: what to attach to
/// an outgoing request, how to react to a server rejection, and how to
/// tear the session down. Clones share the same storage and navigator,
/// so any handle may end the session for all of them; `invalidate` is
/// idempotent and whichever caller runs it first wins.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Store a fresh token pair after authentication.
    pub fn establish(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.store
            .set(ACCESS_TOKEN_KEY, access_token)
            .context("Failed to store access token")?;
        self.store
            .set(REFRESH_TOKEN_KEY, refresh_token)
            .context("Failed to store refresh token")?;
        debug!("Session established");
        Ok(())
    }

    /// The stored access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Whether a token is held and not locally expired.
    pub fn is_active(&self) -> bool {
        match self.access_token() {
            Some(token) => !token::is_expired(&token, Utc::now()),
            None => false,
        }
    }

    /// Resolve the token to attach to an outgoing request.
    ///
    /// `Ok(Some(token))` attaches a bearer header and `Ok(None)` sends
    /// the request unauthenticated. A held token that has already
    /// expired ends the session and aborts the request with
    /// `SessionExpired` before anything reaches the network. A token
    /// whose expiry cannot be decoded is attached as-is; rejecting it
    /// is the server's call.
    pub fn token_for_request(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, SessionExpired> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };
        if token::is_expired(&token, now) {
            debug!("Held token expired locally, ending session");
            self.invalidate();
            return Err(SessionExpired);
        }
        Ok(Some(token))
    }

    /// React to a completed response.
    ///
    /// A 401 ends the session regardless of what the local expiry check
    /// believed about the token.
    pub fn observe_status(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            info!("Server rejected credentials, ending session");
            self.invalidate();
        }
    }

    /// Clear stored tokens and send the user back to the login screen.
    ///
    /// Safe to call repeatedly and from concurrent handles. Storage
    /// failures are logged but never stop the redirect.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.remove(ACCESS_TOKEN_KEY) {
            warn!(error = %e, "Failed to clear access token");
        }
        if let Err(e) = self.store.remove(REFRESH_TOKEN_KEY) {
            warn!(error = %e, "Failed to clear refresh token");
        }
        self.navigator.go_to(LOGIN_PATH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::token_expiring_at;
    use crate::nav::RecordingNavigator;
    use crate::storage::MemoryTokenStore;
    use chrono::Duration;

    fn session() -> (Arc<MemoryTokenStore>, Arc<RecordingNavigator>, Session) {
        let store = Arc::new(MemoryTokenStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::new(store.clone(), navigator.clone());
        (store, navigator, session)
    }

    #[test]
    fn test_establish_stores_both_tokens() {
        let (store, _nav, session) = session();
        session.establish("acc-1", "ref-1").unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
        assert_eq!(session.access_token().as_deref(), Some("acc-1"));
    }

    #[test]
    fn test_no_token_sends_request_unauthenticated() {
        let (_store, nav, session) = session();
        let token = session.token_for_request(Utc::now()).unwrap();
        assert!(token.is_none());
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn test_valid_token_is_attached() {
        let (_store, _nav, session) = session();
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::hours(1));
        session.establish(&token, "ref-1").unwrap();

        let attached = session.token_for_request(now).unwrap();
        assert_eq!(attached.as_deref(), Some(token.as_str()));
    }

    #[test]
    fn test_undecodable_token_is_attached_unchanged() {
        let (_store, nav, session) = session();
        session.establish("abc", "ref-1").unwrap();

        let attached = session.token_for_request(Utc::now()).unwrap();
        assert_eq!(attached.as_deref(), Some("abc"));
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn test_expired_token_aborts_and_ends_session() {
        let (store, nav, session) = session();
        let now = Utc::now();
        let token = token_expiring_at(now - Duration::seconds(1));
        session.establish(&token, "ref-1").unwrap();

        let result = session.token_for_request(now);
        assert!(result.is_err());
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
        assert_eq!(nav.visited(), vec![LOGIN_PATH.to_string()]);
    }

    #[test]
    fn test_unauthorized_status_ends_session() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        session.establish(&token, "ref-1").unwrap();

        session.observe_status(StatusCode::UNAUTHORIZED);
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert_eq!(nav.visited(), vec![LOGIN_PATH.to_string()]);
    }

    #[test]
    fn test_other_statuses_leave_session_alone() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        session.establish(&token, "ref-1").unwrap();

        session.observe_status(StatusCode::OK);
        session.observe_status(StatusCode::FORBIDDEN);
        session.observe_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.get(ACCESS_TOKEN_KEY).is_some());
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let (store, nav, session) = session();
        session.establish("acc-1", "ref-1").unwrap();

        session.invalidate();
        session.invalidate();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
        // The redirect target is constant, so repeating it is harmless
        assert_eq!(nav.visited(), vec![LOGIN_PATH.to_string(), LOGIN_PATH.to_string()]);
    }

    #[test]
    fn test_is_active_tracks_token_state() {
        let (_store, _nav, session) = session();
        assert!(!session.is_active());

        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        session.establish(&token, "ref-1").unwrap();
        assert!(session.is_active());

        session.invalidate();
        assert!(!session.is_active());
    }
}
