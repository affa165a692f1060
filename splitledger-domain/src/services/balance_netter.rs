//! Pairwise netting of settled payments into a per-subject report.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::model::{BalanceDue, BalanceReport, Money, PaymentRecord};

/// Balance aggregation service.
///
/// Single pass over already-settled facts: no ordering dependency
/// exists between records, and empty input yields a valid zero report.
pub struct BalanceNetter;

impl BalanceNetter {
    /// Nets `subject`'s settled payments into aggregate totals and a
    /// per-counterparty settle list.
    ///
    /// Records that are not `succeeded` or do not involve the subject
    /// are ignored, so the caller's pre-filter is not load-bearing.
    /// Counterparties appear in the settle list in first-seen record
    /// order; a counterparty whose flows cancel to zero is omitted.
    pub fn compute(&self, subject: &str, records: &[PaymentRecord]) -> BalanceReport {
        let mut owes = Decimal::ZERO;
        let mut owed_by = Decimal::ZERO;
        let mut net: IndexMap<&str, Decimal> = IndexMap::new();

        for record in records {
            if !record.is_settled() {
                continue;
            }
            let amount = record.amount.as_decimal();
            if record.payer == subject {
                owes += amount;
                *net.entry(record.payee.as_str()).or_insert(Decimal::ZERO) -= amount;
            }
            if record.payee == subject {
                owed_by += amount;
                *net.entry(record.payer.as_str()).or_insert(Decimal::ZERO) += amount;
            }
        }

        let mut balances_to_settle = Vec::with_capacity(net.len());
        for (counterparty, value) in net {
            if value < Decimal::ZERO {
                balances_to_settle.push(BalanceDue {
                    from_user: subject.to_owned(),
                    to_user: counterparty.to_owned(),
                    amount: Money::from_decimal(-value),
                });
            } else if value > Decimal::ZERO {
                balances_to_settle.push(BalanceDue {
                    from_user: counterparty.to_owned(),
                    to_user: subject.to_owned(),
                    amount: Money::from_decimal(value),
                });
            }
        }

        BalanceReport {
            username: subject.to_owned(),
            owes: Money::from_decimal(owes).round2(),
            owed_by: Money::from_decimal(owed_by).round2(),
            net_balance: Money::from_decimal(owed_by - owes).round2(),
            balances_to_settle,
        }
    }
}
