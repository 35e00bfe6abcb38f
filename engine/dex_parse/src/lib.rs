//! Shunting-yard compiler for the dex expression engine.
//!
//! Drives the lexer token by token and emits a postfix [`Program`](dex_ir::Program)
//! in a single pass. The algorithm is fully iterative: operator nesting
//! grows two explicit stacks, never the call stack, so deeply nested input
//! cannot overflow recursion.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::{ArityLookup, Parser};
