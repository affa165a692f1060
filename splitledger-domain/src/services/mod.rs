pub mod balance_netter;
pub mod split_reconciler;

pub use balance_netter::BalanceNetter;
pub use split_reconciler::SplitReconciler;
