//! Lexical error types.

use crate::lexer::MAX_SOURCE_LEN;

/// Failure while preparing or scanning expression source.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LexError {
    /// Input exceeds the maximum supported length. Rejected before any
    /// scanning happens.
    #[error("input is {len} bytes, must be shorter than {MAX_SOURCE_LEN}")]
    InputTooLong { len: usize },

    /// A byte the classifier rejected. Terminal: scanning cannot continue
    /// past it.
    #[error("illegal byte {byte:#04x} at offset {offset}")]
    IllegalByte { byte: u8, offset: u32 },
}
