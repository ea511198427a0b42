//! Evaluator error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A term was neither a numeric literal nor a known symbol. The whole
    /// evaluation is abandoned; no partial sum survives.
    #[error("unknown token: {token}")]
    UnknownToken { token: String },
}
