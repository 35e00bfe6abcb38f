//! Byte classifier and pull lexer for the dex expression engine.
//!
//! The lexer is a hand-written pull scanner: one token per
//! [`Lexer::next_token`] call, no token buffer, no recursion. All byte
//! classification goes through the 256-entry table in [`class`], so the
//! behavior for every possible input byte is defined in exactly one place.

mod class;
mod error;
mod lexer;

pub use class::{classify, CharClass};
pub use error::LexError;
pub use lexer::{Lexer, MAX_SOURCE_LEN};
