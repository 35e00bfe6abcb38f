//! The fixed operator set.

use std::fmt;

/// Arithmetic operators accepted by the engine.
///
/// The set is closed: there is no way to register additional operators.
/// Precedence follows the classic table — additive 1, multiplicative 2,
/// exponentiation (and unary minus) 4, with function application at 5
/// binding tightest. The parser resolves equal precedence strictly left
/// to right, which makes `^` left-associative.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Precedence of function application, tighter than any operator.
pub const FUNCTION_PRECEDENCE: u8 = 5;

/// Precedence of unary minus, same level as `^`.
pub const UNARY_PRECEDENCE: u8 = 4;

impl OpKind {
    /// Binary precedence used by the shunting-yard loop.
    #[inline]
    pub const fn precedence(self) -> u8 {
        match self {
            OpKind::Add | OpKind::Sub => 1,
            OpKind::Mul | OpKind::Div | OpKind::Rem => 2,
            OpKind::Pow => 4,
        }
    }

    /// Source symbol for this operator.
    #[inline]
    pub const fn symbol(self) -> &'static str {
        match self {
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Rem => "%",
            OpKind::Pow => "^",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
