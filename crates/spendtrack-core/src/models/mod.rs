//! Data models for spendtrack entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `Transaction`, `NewTransaction`: income and expense entries
//! - `Category`, `CategoryKind`: user-defined transaction categories
//! - `Budget`, `NewBudget`: monthly per-category spending limits
//! - `DashboardSummary`, `AnnualSpending`: aggregate views
//! - `Profile`, `Me`: account data

pub mod budget;
pub mod category;
pub mod dashboard;
pub mod profile;
pub mod transaction;

pub use budget::{Budget, NewBudget};
pub use category::{Category, CategoryKind, NewCategory};
pub use dashboard::{AnnualSpending, BudgetStatus, DashboardSummary};
pub use profile::{Me, Profile};
pub use transaction::{NewTransaction, Transaction};

// Helper to deserialize amounts the server renders as decimal strings
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or decimal string")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.trim()
                .parse()
                .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}
