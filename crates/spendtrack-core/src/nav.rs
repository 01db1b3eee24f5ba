//! Navigation boundary used when a session ends.
//!
//! The session layer never renders anything itself; when it needs the
//! user somewhere (only ever the login entry point today), it goes
//! through `Navigator` so each front end stays in charge of its own
//! routing.

use std::sync::Mutex;

/// Destination seam for session-driven redirects.
pub trait Navigator: Send + Sync {
    /// Send the user to `path`.
    fn go_to(&self, path: &str);
}

/// Navigator that records each target instead of performing a redirect.
///
/// Used by tests and headless consumers that only need to observe
/// where the session tried to send the user.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths received so far, oldest first.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}
