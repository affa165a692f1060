use splitledger_domain::{MonetaryAllocation, PaymentRecord, UntrustedAllocation};

use crate::{error::SuggestionError, model::{Expense, ExpenseId}};

/// Document-store view of expenses and their owning groups.
pub trait ExpenseStore: Send + Sync {
    fn find(&self, id: &ExpenseId) -> Option<Expense>;

    /// Member usernames of a group, or `None` when the group is unknown.
    fn group_members(&self, group_id: &str) -> Option<Vec<String>>;

    /// Fully replaces the stored split. Returns `false` when the
    /// expense no longer exists; nothing is written in that case.
    fn replace_split(&self, id: &ExpenseId, split: MonetaryAllocation) -> bool;
}

/// Document-store view of the payment ledger.
pub trait PaymentStore: Send + Sync {
    /// Every record involving `subject` as payer or payee.
    fn history_for(&self, subject: &str) -> Vec<PaymentRecord>;
}

/// Black-box split generator (human prompt, LLM, heuristic).
///
/// Returns free text; whatever it produces is untrusted and goes
/// through extraction and reconciliation before persistence.
pub trait SplitSuggester: Send + Sync {
    fn suggest(&self, expense: &Expense, group_members: &[String])
        -> Result<String, SuggestionError>;
}

/// Extracts a proposal from generator free text. Yields the empty
/// proposal when no well-formed object can be found.
pub trait ProposalParser: Send + Sync {
    fn parse(&self, raw: &str) -> UntrustedAllocation;
}
