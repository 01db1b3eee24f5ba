use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single income or expense entry.
///
/// Expenses carry negative amounts and income positive ones. The server
/// renders decimal amounts as JSON strings, so deserialization accepts
/// both forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(deserialize_with = "super::deserialize_amount")]
    pub amount: f64,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Amount with two decimal places, sign kept
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

/// Payload for creating or replacing a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub amount: f64,
}
