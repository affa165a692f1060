use splitledger_auth::Identity;
use splitledger_domain::{BalanceNetter, BalanceReport};

use crate::ports::PaymentStore;

/// Balance query flow: pull the subject's payment history, net it.
/// Nothing is persisted; the report is recomputed on every query.
pub struct BalanceService<'a> {
    payments: &'a dyn PaymentStore,
    netter: BalanceNetter,
}

impl<'a> BalanceService<'a> {
    pub fn new(payments: &'a dyn PaymentStore) -> Self {
        Self {
            payments,
            netter: BalanceNetter,
        }
    }

    pub fn report_for(&self, subject: &Identity) -> BalanceReport {
        let records = self.payments.history_for(&subject.username);
        self.netter.compute(&subject.username, &records)
    }
}
