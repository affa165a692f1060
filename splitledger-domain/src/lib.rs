#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceDue, BalanceReport, Money, MonetaryAllocation, PaymentRecord, PaymentStatus,
    UntrustedAllocation,
};
pub use services::{BalanceNetter, SplitReconciler};
