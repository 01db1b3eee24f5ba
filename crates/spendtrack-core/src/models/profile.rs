use serde::{Deserialize, Serialize};

/// Account profile fields the user can edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Minimal identity payload for the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Me {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Me {
    /// Name to greet the user with: username, falling back to email.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}
