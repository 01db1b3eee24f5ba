use serde::{Deserialize, Serialize};

/// Whether a category tracks money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }
}

/// A user-defined transaction category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// Hex color used by the front ends (e.g. "#FF7043")
    pub color: String,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub color: String,
}
