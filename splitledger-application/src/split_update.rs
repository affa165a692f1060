use fxhash::FxHashSet;
use splitledger_auth::Identity;
use splitledger_domain::{MonetaryAllocation, SplitReconciler, UntrustedAllocation};

use crate::{error::SplitEditError, model::ExpenseId, ports::ExpenseStore};

/// Authorized manual split edit: payer-only, declared participants
/// only, and the stored allocation is still reconciled output — a
/// manual proposal gets no more trust than a generated one.
pub struct SplitEditor<'a> {
    expenses: &'a dyn ExpenseStore,
    reconciler: SplitReconciler,
}

impl<'a> SplitEditor<'a> {
    pub fn new(expenses: &'a dyn ExpenseStore) -> Self {
        Self {
            expenses,
            reconciler: SplitReconciler,
        }
    }

    pub fn apply(
        &self,
        editor: &Identity,
        id: &ExpenseId,
        proposed: UntrustedAllocation,
    ) -> Result<MonetaryAllocation, SplitEditError> {
        let expense = self
            .expenses
            .find(id)
            .ok_or_else(|| SplitEditError::NotFound(id.0.clone()))?;

        if expense.paid_by != editor.username {
            return Err(SplitEditError::Forbidden);
        }

        let declared: FxHashSet<&str> =
            expense.participants.iter().map(String::as_str).collect();
        let outsiders: Vec<String> = proposed
            .keys()
            .filter(|name| !declared.contains(name))
            .map(str::to_owned)
            .collect();
        if !outsiders.is_empty() {
            return Err(SplitEditError::NonParticipants(outsiders));
        }

        let split = self
            .reconciler
            .reconcile(expense.amount, &expense.participants, &proposed);
        if !self.expenses.replace_split(id, split.clone()) {
            return Err(SplitEditError::StoreRejected(id.0.clone()));
        }
        Ok(split)
    }
}
