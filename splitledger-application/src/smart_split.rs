use splitledger_domain::{MonetaryAllocation, SplitReconciler, UntrustedAllocation};

use crate::{
    error::SmartSplitError,
    model::ExpenseCreated,
    ports::{ExpenseStore, ProposalParser, SplitSuggester},
};

/// Worker flow behind the expense-created event: ask the generator for
/// a split, reconcile whatever comes back, persist the result.
///
/// Generator failure and unparseable output both degrade to the empty
/// proposal, so the expense always ends up with a reconciled split.
pub struct SmartSplitProcessor<'a> {
    expenses: &'a dyn ExpenseStore,
    suggester: &'a dyn SplitSuggester,
    parser: &'a dyn ProposalParser,
    reconciler: SplitReconciler,
}

impl<'a> SmartSplitProcessor<'a> {
    pub fn new(
        expenses: &'a dyn ExpenseStore,
        suggester: &'a dyn SplitSuggester,
        parser: &'a dyn ProposalParser,
    ) -> Self {
        Self {
            expenses,
            suggester,
            parser,
            reconciler: SplitReconciler,
        }
    }

    pub fn handle_expense_created(
        &self,
        event: &ExpenseCreated,
    ) -> Result<MonetaryAllocation, SmartSplitError> {
        let expense = self
            .expenses
            .find(&event.expense_id)
            .ok_or_else(|| SmartSplitError::ExpenseNotFound(event.expense_id.0.clone()))?;
        let members = self
            .expenses
            .group_members(&event.group_id)
            .ok_or_else(|| SmartSplitError::GroupNotFound(event.group_id.clone()))?;

        let proposed = match self.suggester.suggest(&expense, &members) {
            Ok(raw) => self.parser.parse(&raw),
            Err(err) => {
                tracing::warn!(
                    expense_id = %expense.id,
                    error = %err,
                    "split suggestion failed, reconciling empty proposal"
                );
                UntrustedAllocation::new()
            }
        };

        let split = self
            .reconciler
            .reconcile(expense.amount, &expense.participants, &proposed);
        if !self.expenses.replace_split(&expense.id, split.clone()) {
            return Err(SmartSplitError::StoreRejected(expense.id.0.clone()));
        }

        tracing::debug!(
            expense_id = %expense.id,
            participant_count = split.len(),
            total = %split.total(),
            "smart split persisted"
        );
        Ok(split)
    }
}
