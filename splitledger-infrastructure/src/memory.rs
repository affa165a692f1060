use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use splitledger_application::{Expense, ExpenseId, ExpenseStore, PaymentStore};
use splitledger_domain::{MonetaryAllocation, PaymentRecord};

/// In-memory stand-in for the expense/group document collections.
/// Used by tests and embedders that do not carry a database.
#[derive(Default)]
pub struct MemoryExpenseStore {
    expenses: DashMap<String, Expense>,
    groups: DashMap<String, Vec<String>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_group(&self, group_id: impl Into<String>, members: Vec<String>) {
        self.groups.insert(group_id.into(), members);
    }

    pub fn insert_expense(&self, expense: Expense) {
        self.expenses.insert(expense.id.0.clone(), expense);
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn find(&self, id: &ExpenseId) -> Option<Expense> {
        self.expenses.get(id.as_str()).map(|entry| entry.value().clone())
    }

    fn group_members(&self, group_id: &str) -> Option<Vec<String>> {
        self.groups.get(group_id).map(|entry| entry.value().clone())
    }

    fn replace_split(&self, id: &ExpenseId, split: MonetaryAllocation) -> bool {
        match self.expenses.get_mut(id.as_str()) {
            Some(mut entry) => {
                entry.split = Some(split);
                true
            }
            None => false,
        }
    }
}

/// In-memory payment ledger.
#[derive(Default)]
pub struct MemoryPaymentStore {
    records: Mutex<Vec<PaymentRecord>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: PaymentRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

impl PaymentStore for MemoryPaymentStore {
    fn history_for(&self, subject: &str) -> Vec<PaymentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.involves(subject))
            .cloned()
            .collect()
    }
}
