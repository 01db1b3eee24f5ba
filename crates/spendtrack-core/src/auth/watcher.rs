use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::session::Session;
use super::token;

/// Handle to a scheduled end-of-session timer.
///
/// Dropping or cancelling the handle disarms the timer; an invalidation
/// that has not fired yet will then never fire.
#[derive(Debug)]
pub struct TokenWatch {
    handle: Option<JoinHandle<()>>,
}

impl TokenWatch {
    fn armed(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn idle() -> Self {
        Self { handle: None }
    }

    /// Whether a timer is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TokenWatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Session {
    /// Schedule the session to end when the held token expires.
    ///
    /// The delay is computed once, from the token held right now. A
    /// token that has already expired ends the session immediately,
    /// before this returns, instead of arming a timer. A missing token,
    /// or one with no decodable expiry, arms nothing; such sessions end
    /// only when the server rejects them.
    pub fn watch(&self) -> TokenWatch {
        let Some(token) = self.access_token() else {
            return TokenWatch::idle();
        };
        let Some(expires_at) = token::decode_expiry(&token) else {
            return TokenWatch::idle();
        };

        let now = Utc::now();
        if expires_at <= now {
            debug!("Token already expired, ending session now");
            self.invalidate();
            return TokenWatch::idle();
        }

        let delay = (expires_at - now).to_std().unwrap_or_default();
        debug!(delay_ms = delay.as_millis() as u64, "Armed session expiry timer");

        let session = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Token expiry reached, ending session");
            session.invalidate();
        });
        TokenWatch::armed(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::auth::session::{ACCESS_TOKEN_KEY, LOGIN_PATH};
    use crate::auth::token::token_expiring_at;
    use crate::nav::RecordingNavigator;
    use crate::storage::{MemoryTokenStore, TokenStore};

    fn session() -> (Arc<MemoryTokenStore>, Arc<RecordingNavigator>, Session) {
        let store = Arc::new(MemoryTokenStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::new(store.clone(), navigator.clone());
        (store, navigator, session)
    }

    #[tokio::test]
    async fn test_expired_token_logs_out_before_watch_returns() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() - Duration::seconds(30));
        session.establish(&token, "ref-1").unwrap();

        let watch = session.watch();
        // No timer involved: the session ended synchronously
        assert!(!watch.is_armed());
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert_eq!(nav.visited(), vec![LOGIN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_absent_token_arms_nothing() {
        let (_store, nav, session) = session();
        let watch = session.watch();
        assert!(!watch.is_armed());
        assert!(nav.visited().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_token_arms_nothing_and_keeps_session() {
        let (store, nav, session) = session();
        session.establish("abc", "ref-1").unwrap();

        let watch = session.watch();
        assert!(!watch.is_armed());
        // The token stays; the server is the authority on it
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        assert!(nav.visited().is_empty());
    }

    #[tokio::test]
    async fn test_future_expiry_arms_timer_without_firing_early() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() + Duration::seconds(30));
        session.establish(&token, "ref-1").unwrap();

        let mut watch = session.watch();
        assert!(watch.is_armed());

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert!(store.get(ACCESS_TOKEN_KEY).is_some());
        assert!(nav.visited().is_empty());

        watch.cancel();
        assert!(!watch.is_armed());
    }

    #[tokio::test]
    async fn test_cancelled_timer_never_fires() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() + Duration::milliseconds(300));
        session.establish(&token, "ref-1").unwrap();

        let mut watch = session.watch();
        watch.cancel();

        tokio::time::sleep(std::time::Duration::from_millis(900)).await;
        assert!(store.get(ACCESS_TOKEN_KEY).is_some());
        assert!(nav.visited().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_watch_never_fires() {
        let (store, nav, session) = session();
        let token = token_expiring_at(Utc::now() + Duration::milliseconds(300));
        session.establish(&token, "ref-1").unwrap();

        drop(session.watch());

        tokio::time::sleep(std::time::Duration::from_millis(900)).await;
        assert!(store.get(ACCESS_TOKEN_KEY).is_some());
        assert!(nav.visited().is_empty());
    }
}
