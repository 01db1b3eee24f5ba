use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use super::TokenStore;

/// Token file name in cache directory
const TOKEN_FILE: &str = "tokens.json";

/// File-backed token store.
///
/// Tokens are kept as a flat string map in `tokens.json` under the app
/// cache directory and written through on every mutation. A file that
/// cannot be read or parsed degrades to an empty store rather than
/// failing startup.
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Open the store rooted at `cache_dir`, loading any existing file.
    pub fn open(cache_dir: PathBuf) -> Self {
        let path = cache_dir.join(TOKEN_FILE);
        let entries = match Self::read_file(&path) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Could not read token file, starting empty");
                HashMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn read_file(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(path)
            .context("Failed to read token file")?;
        let map = serde_json::from_str(&contents)
            .context("Failed to parse token file")?;
        Ok(map)
    }

    fn write_file(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.write_file(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))?;
        if entries.remove(key).is_some() {
            self.write_file(&entries)?;
        }
        Ok(())
    }
}
