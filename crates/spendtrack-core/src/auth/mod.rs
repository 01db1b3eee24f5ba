//! Session management for the bearer-token auth flow.
//!
//! This module provides:
//! - `Session`: shared handle over token storage with the request,
//!   response, and teardown decision points
//! - `TokenWatch`: one-shot timer that ends the session at token expiry
//! - `token`: expiry decoding for otherwise-opaque tokens
//!
//! Tokens are issued by the backend at login. The client never inspects
//! them beyond the expiry claim, and it never refreshes them: when a
//! token goes stale, the session ends and the user signs in again.

pub mod session;
pub mod token;
pub mod watcher;

pub use session::{Session, SessionExpired, ACCESS_TOKEN_KEY, LOGIN_PATH, REFRESH_TOKEN_KEY};
pub use watcher::TokenWatch;
