//! Shared data model for the dex expression engine.
//!
//! Everything that crosses a crate boundary lives here: source spans,
//! tokens produced by the lexer, the fixed operator set, function arity
//! contracts, and the compiled postfix [`Program`] that the parser emits
//! and the evaluator executes.

mod op;
mod program;
mod span;
mod token;

pub use op::{OpKind, FUNCTION_PRECEDENCE, UNARY_PRECEDENCE};
pub use program::{Arity, Instr, Program};
pub use span::Span;
pub use token::{Token, TokenKind};

// The exact-decimal value type is part of the public data model: literal
// constants are stored pre-parsed inside compiled programs.
pub use rust_decimal::Decimal;
