#![warn(clippy::uninlined_format_args)]

pub mod memory;
pub mod prompt;
pub mod proposal;

pub use memory::{MemoryExpenseStore, MemoryPaymentStore};
pub use prompt::suggestion_prompt;
pub use proposal::JsonProposalParser;
