//! Tokens produced by the lexer.

use super::{OpKind, Span};
use std::fmt;

/// A single lexed token.
///
/// `text` holds the literal's digit string (decimal point elided — the
/// fractional-digit count lives in [`TokenKind::Float`]), the identifier
/// or function name, the operator symbol, or the offending byte for
/// [`TokenKind::Illegal`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) @ {}", self.kind, self.text, self.span)
    }
}

/// Token kinds for the expression grammar.
///
/// The set is closed so every dispatch site gets exhaustiveness checking.
/// Integer and float literals are distinct kinds: a float carries the
/// number of fractional digits (`scale`) observed in the source, preserved
/// exactly instead of converting through binary floating point.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Byte the classifier rejected. Terminal lexical error.
    Illegal(u8),
    /// End of input, returned repeatedly once reached.
    Eof,
    /// Integer literal: no decimal point.
    Int,
    /// Float literal: decimal point present, `scale` fractional digits.
    Float { scale: u16 },
    /// Binary operator.
    Op(OpKind),
    /// Unary operator (only minus is ever produced).
    UnaryOp(OpKind),
    /// Identifier to be resolved against the caller's bindings.
    Ident,
    /// Identifier immediately followed by `(` — a function call.
    Function,
    LParen,
    RParen,
    Comma,
}

impl TokenKind {
    /// `true` for the kinds after which a `-` is read as unary.
    ///
    /// A minus is unary when nothing that could serve as a left operand
    /// precedes it: start of input, an opening paren, an argument
    /// separator, or another operator.
    #[inline]
    pub fn minus_is_unary_after(self) -> bool {
        matches!(
            self,
            TokenKind::Eof
                | TokenKind::LParen
                | TokenKind::Comma
                | TokenKind::Op(_)
                | TokenKind::UnaryOp(_)
        )
    }
}
