use serde::{Deserialize, Serialize};

use super::Transaction;

/// Aggregates shown on the dashboard landing screen.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    #[serde(rename = "monthlySpending")]
    pub monthly_spending: f64,
    #[serde(rename = "monthlyBudget")]
    pub monthly_budget: f64,
    #[serde(rename = "yearlySpending")]
    pub yearly_spending: f64,
    #[serde(rename = "recentTransactions", default)]
    pub recent_transactions: Vec<Transaction>,
}

/// Budget pressure bands for the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Within,
    Approaching,
    Over,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Within => "Within Budget",
            BudgetStatus::Approaching => "Approaching Limit",
            BudgetStatus::Over => "Over Budget",
        }
    }
}

impl DashboardSummary {
    /// Share of the monthly budget already spent, as a percentage.
    pub fn budget_used_percent(&self) -> f64 {
        if self.monthly_budget <= 0.0 {
            return 0.0;
        }
        (self.monthly_spending / self.monthly_budget) * 100.0
    }

    /// Status band: 100% of budget is over, 80% is approaching.
    ///
    /// With no budget set, any spending at all counts as over.
    pub fn budget_status(&self) -> BudgetStatus {
        if self.monthly_budget <= 0.0 {
            return if self.monthly_spending > 0.0 {
                BudgetStatus::Over
            } else {
                BudgetStatus::Within
            };
        }
        let pct = self.budget_used_percent();
        if pct >= 100.0 {
            BudgetStatus::Over
        } else if pct >= 80.0 {
            BudgetStatus::Approaching
        } else {
            BudgetStatus::Within
        }
    }
}

/// One calendar year's total spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualSpending {
    pub year: i32,
    pub total: f64,
}
