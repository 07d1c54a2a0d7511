//! Error types for the renaming driver
//!
//! Each layer has its own thiserror enum; `RenameError` wraps them so
//! callers can tell script bugs apart from host mistakes and cancellations.

use thiserror::Error;

use crate::destination::DestinationError;
use crate::script::{EvalError, ExecError, ParseError};

/// Top-level renaming error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// Rejected before the script ran
    #[error("Bad arguments: {0}")]
    BadArguments(String),

    /// Malformed script
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Script failed while evaluating
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// Destination or subfolder could not be resolved
    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),

    /// The script ran `cancel`
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl From<ExecError> for RenameError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Eval(err) => RenameError::Eval(err),
            ExecError::Cancelled(message) => RenameError::Cancelled(message),
        }
    }
}

/// Result alias for renaming operations
pub type Result<T> = std::result::Result<T, RenameError>;
