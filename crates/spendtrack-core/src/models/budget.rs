use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A monthly spending limit for one category.
///
/// `month` is the first day of the month the budget applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    /// Id of the category this budget limits
    pub category: i64,
    #[serde(deserialize_with = "super::deserialize_amount")]
    pub amount: f64,
    pub month: NaiveDate,
}

impl Budget {
    /// Month the way the budget screens show it (`MM-YYYY`)
    pub fn display_month(&self) -> String {
        self.month.format("%m-%Y").to_string()
    }
}

/// Payload for creating or replacing a budget.
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub category: i64,
    pub amount: f64,
    pub month: NaiveDate,
}
