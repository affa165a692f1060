//! Sum-exact reconciliation of proposed expense splits.
//!
//! Proposals originate from an untrusted generator (an AI suggestion or
//! a manual edit) that may get the total wrong, name non-participants,
//! or omit participants. Reconciliation guarantees the sum-exactness
//! invariant unconditionally while preserving the shape of a proposal
//! that is close enough, falling back to an equal split only when the
//! proposal is grossly wrong.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::model::{Money, MonetaryAllocation, UntrustedAllocation};

/// Proposals whose sum deviates from the total by more than this are
/// discarded entirely in favor of an equal split.
const GROSS_MISMATCH_TOLERANCE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Residual left by per-entry rounding above this magnitude is folded
/// back into one participant's share.
const FINE_CORRECTION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Split reconciliation service.
///
/// Pure and total: any finite input yields an allocation whose values
/// sum to the target total within 0.01.
pub struct SplitReconciler;

impl SplitReconciler {
    /// Reconciles `proposed` against `total` for the declared
    /// `participants`.
    ///
    /// The proposal sum is taken as supplied, unfiltered. A gross
    /// mismatch (off by more than 0.02) discards the proposal for an
    /// equal split. Otherwise every declared participant gets its
    /// rounded proposed amount (0 when absent), undeclared keys are
    /// dropped, and any rounding residual beyond 0.01 is folded into
    /// the last participant's share.
    ///
    /// Negative proposed amounts pass through as credits.
    pub fn reconcile(
        &self,
        total: Money,
        participants: &[String],
        proposed: &UntrustedAllocation,
    ) -> MonetaryAllocation {
        if participants.is_empty() {
            return MonetaryAllocation::empty();
        }

        let target = total.as_decimal();
        let proposed_sum = proposed.values_sum();
        if (proposed_sum - target).abs() > GROSS_MISMATCH_TOLERANCE {
            tracing::warn!(
                proposed_sum = %proposed_sum,
                total = %target,
                participant_count = participants.len(),
                "proposed split rejected, falling back to equal split"
            );
            return Self::equal_split(total, participants);
        }

        let mut entries: IndexMap<String, Money> = participants
            .iter()
            .map(|participant| {
                let amount = proposed.get(participant).unwrap_or(Decimal::ZERO);
                (participant.clone(), Money::from_decimal(amount).round2())
            })
            .collect();

        let current_sum: Decimal = entries.values().map(|amount| amount.as_decimal()).sum();
        let residual = target - current_sum;
        if residual.abs() > FINE_CORRECTION_TOLERANCE {
            Self::fold_residual(&mut entries, residual);
        }

        MonetaryAllocation::from_entries(entries)
    }

    /// Equal split with the rounding residual assigned to the last
    /// participant.
    fn equal_split(total: Money, participants: &[String]) -> MonetaryAllocation {
        let count = Decimal::from(participants.len());
        let share = Money::from_decimal(total.as_decimal() / count).round2();

        let mut entries: IndexMap<String, Money> = participants
            .iter()
            .map(|participant| (participant.clone(), share))
            .collect();

        let residual = total.as_decimal() - share.as_decimal() * count;
        if !residual.is_zero() {
            Self::fold_residual(&mut entries, residual);
        }

        MonetaryAllocation::from_entries(entries)
    }

    fn fold_residual(entries: &mut IndexMap<String, Money>, residual: Decimal) {
        let last = entries.len() - 1;
        if let Some((_, amount)) = entries.get_index_mut(last) {
            *amount = Money::from_decimal(amount.as_decimal() + residual).round2();
        }
    }
}
