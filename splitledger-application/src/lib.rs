#![warn(clippy::uninlined_format_args)]

pub mod balance_report;
pub mod error;
pub mod model;
pub mod ports;
pub mod smart_split;
pub mod split_update;

pub use balance_report::BalanceService;
pub use error::{SmartSplitError, SplitEditError, SuggestionError};
pub use model::{Expense, ExpenseCreated, ExpenseId};
pub use ports::{ExpenseStore, PaymentStore, ProposalParser, SplitSuggester};
pub use smart_split::SmartSplitProcessor;
pub use split_update::SplitEditor;
