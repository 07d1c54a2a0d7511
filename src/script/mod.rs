//! The rename script language: tokens, syntax tree, parser, evaluator and
//! the two-pass statement executor.
//!
//! Parsing is a pure function of the script text, so parse results are shared
//! through [`cache::ParseCache`]. Evaluation never touches the filesystem.

use thiserror::Error;

/// Syntax tree
pub mod ast;
pub mod cache;
pub mod eval;
pub mod exec;
pub mod labels;
/// Tokenizer
pub mod lexer;
/// Recursive-descent parser
pub mod parser;
/// Runtime values and coercions
pub mod value;

pub use ast::{Expr, ScriptTree, Statement, Target};
pub use cache::ParseCache;
pub use eval::Evaluator;
pub use exec::{Buffers, ExecError, PassOutcome, evaluate_for_destination, evaluate_for_filename};
pub use labels::{Label, Metadata};
pub use parser::parse_script;
pub use value::{Collection, Value};

/// Syntax error with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
}

impl ParseError {
    /// Create a parse error at `line`:`column`.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors raised while evaluating a well-formed script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A value could not be coerced to the category its position needs
    #[error("cannot use {found} `{construct}` as a {expected}")]
    TypeMismatch {
        /// Offending expression
        construct: String,
        /// Category required
        expected: &'static str,
        /// Category produced
        found: &'static str,
    },

    /// Comparison between operands that have no common representation
    #[error("cannot compare {lhs} with {rhs} in `{construct}`")]
    Incomparable {
        /// Offending comparison
        construct: String,
        /// Category of the left operand
        lhs: &'static str,
        /// Category of the right operand
        rhs: &'static str,
    },

    /// `has` filter that does not apply to the collection's elements
    #[error("filter {filter} does not apply to {collection} in `{construct}`")]
    InvalidFilter {
        /// Filtered expression
        construct: String,
        /// Filter as written
        filter: String,
        /// Element type of the collection
        collection: &'static str,
    },

    /// Function argument outside the accepted range
    #[error("invalid argument to {function}(): {message}")]
    InvalidArgument {
        /// Function name
        function: &'static str,
        /// Details
        message: String,
    },
}
