use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::{
    prelude::{FromPrimitive, Signed, ToPrimitive},
    Decimal, RoundingStrategy,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-point monetary amount.
///
/// Wraps [`Decimal`] so money math never goes through binary floats.
/// Negative amounts are representable (a net balance is signed).
/// The persisted/returned form is a decimal number quantized to 2
/// fraction digits, so `Serialize`/`Deserialize` go through that shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Builds an amount from an integer mantissa and decimal scale,
    /// e.g. `Money::new(1234, 2)` is 12.34.
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn signum(self) -> Decimal {
        self.0.signum()
    }

    /// Quantizes to 2 fraction digits with banker's rounding.
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).sum())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let quantized = self.round2().0;
        match quantized.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom("amount exceeds numeric range")),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Decimal::from_f64(value)
            .map(Money)
            .ok_or_else(|| serde::de::Error::custom("amount is not a finite number"))
    }
}

/// Raw participant→amount proposal as supplied by an external generator
/// or a manual edit. No invariant holds: the sum may be wrong, keys may
/// name non-participants, values may be negative. Only
/// [`SplitReconciler`](crate::services::SplitReconciler) turns one of
/// these into a [`MonetaryAllocation`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct UntrustedAllocation(IndexMap<String, Decimal>);

impl UntrustedAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant: impl Into<String>, amount: Decimal) {
        self.0.insert(participant.into(), amount);
    }

    pub fn get(&self, participant: &str) -> Option<Decimal> {
        self.0.get(participant).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values_sum(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for UntrustedAllocation {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reconciled participant→amount mapping in declared-participant order.
///
/// Constructed only by the reconciler, so an unreconciled proposal can
/// never be persisted by type construction. After reconciliation the
/// values sum to the target total within 0.01.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonetaryAllocation(IndexMap<String, Money>);

impl MonetaryAllocation {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: IndexMap<String, Money>) -> Self {
        Self(entries)
    }

    pub fn get(&self, participant: &str) -> Option<Money> {
        self.0.get(participant).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn total(&self) -> Money {
        self.0.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lifecycle state of a payment. Only settled (`Succeeded`) records
/// participate in balance computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One directed payment between two users. Immutable once succeeded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payer: String,
    pub payee: String,
    pub amount: Money,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }

    pub fn involves(&self, subject: &str) -> bool {
        self.payer == subject || self.payee == subject
    }
}

/// One unsettled directional balance: `from_user` owes `to_user`.
/// The amount is always positive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceDue {
    pub from_user: String,
    pub to_user: String,
    pub amount: Money,
}

/// Derived per-subject balance summary, recomputed on every query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceReport {
    pub username: String,
    pub owes: Money,
    pub owed_by: Money,
    pub net_balance: Money,
    pub balances_to_settle: Vec<BalanceDue>,
}
