//! Parse error types.

use dex_ir::Span;
use dex_lexer::LexError;

/// Failure while compiling expression source to a postfix program.
///
/// Every variant that corresponds to a token carries that token's span.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Input could not be scanned (oversized input or an illegal byte).
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A `(` without a matching `)`, or the reverse.
    #[error("unmatched parenthesis at {span}")]
    UnmatchedParen { span: Span },

    /// A call to a function the registry does not know.
    #[error("unknown function `{name}` at {span}")]
    UnknownFunction { name: String, span: Span },

    /// A fixed-arity function called with the wrong argument count.
    #[error("function `{name}` takes {expected} argument(s), got {got}, at {span}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// A numeric literal whose mantissa does not fit the decimal type.
    #[error("numeric literal `{literal}` out of range at {span}")]
    InvalidNumber { literal: String, span: Span },
}
