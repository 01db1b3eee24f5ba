//! Persistent key-value storage for authentication tokens.
//!
//! This module provides:
//! - `TokenStore`: the storage interface consumed by `Session`
//! - `FileTokenStore`: JSON-file-backed store in the app cache directory
//! - `MemoryTokenStore`: in-memory store for tests and ephemeral sessions

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use anyhow::Result;

/// Key-value storage for tokens.
///
/// Implementations must tolerate access from cloned session handles on
/// multiple tasks; `Session` serializes nothing on its side.
pub trait TokenStore: Send + Sync {
    /// Read a stored value. Missing keys return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a stored value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
