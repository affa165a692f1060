use thiserror::Error;

/// Failures of the expense-created smart-split flow. None of these
/// leave a partially written split behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmartSplitError {
    #[error("expense {0} not found")]
    ExpenseNotFound(String),
    #[error("group {0} not found")]
    GroupNotFound(String),
    #[error("store rejected split replacement for expense {0}")]
    StoreRejected(String),
}

/// Failures of an authorized manual split edit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitEditError {
    #[error("expense {0} not found")]
    NotFound(String),
    #[error("only the payer may edit this split")]
    Forbidden,
    #[error("split includes non-participants: {}", .0.join(", "))]
    NonParticipants(Vec<String>),
    #[error("store rejected split replacement for expense {0}")]
    StoreRejected(String),
}

/// Failures of the external split generator. All of them degrade to an
/// empty proposal, which reconciles to an equal split.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("split generator unavailable: {0}")]
    Unavailable(String),
    #[error("split generator returned an empty response")]
    EmptyResponse,
}
