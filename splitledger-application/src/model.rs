use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use splitledger_domain::{Money, MonetaryAllocation};

/// Opaque expense identifier as issued by the document store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shared cost recorded by a group member.
///
/// `split` starts empty and is replaced exactly once per update with a
/// reconciled allocation; it is never partially updated.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: String,
    pub amount: Money,
    pub paid_by: String,
    pub participants: Vec<String>,
    pub description: String,
    pub split: Option<MonetaryAllocation>,
    pub created_at: DateTime<Utc>,
}

/// Broker event emitted when an expense is recorded. Extra payload
/// fields are ignored; the worker re-reads the expense from the store.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExpenseCreated {
    pub expense_id: ExpenseId,
    pub group_id: String,
}
