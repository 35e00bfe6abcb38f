//! Compiled postfix programs.
//!
//! A [`Program`] is the parser's output: a flat instruction sequence in
//! reverse Polish order, executed by the evaluator with a single stack
//! pass. Parenthesis and comma tokens are consumed during compilation and
//! never appear here, and every [`Instr::Call`] carries its finalized
//! argument count.

use crate::{OpKind, Span};
use rust_decimal::Decimal;
use std::fmt;

/// Arity contract of a registered function.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Arity {
    /// Exactly this many arguments, enforced at compile time.
    Fixed(usize),
    /// Any argument count; the function body validates what it receives.
    Variadic,
}

/// One compiled instruction.
///
/// Literal values are parsed into exact decimals at compile time, so the
/// evaluator never touches the source text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Instr {
    /// Push a pre-parsed literal.
    Const(Decimal, Span),
    /// Push the value bound to `name` by the caller.
    Load { name: String, span: Span },
    /// Apply a unary operator to the top of the stack.
    Unary(OpKind, Span),
    /// Apply a binary operator to the top two stack values.
    Binary(OpKind, Span),
    /// Invoke a registered function on the top `argc` stack values.
    Call {
        name: String,
        argc: usize,
        span: Span,
    },
}

impl Instr {
    /// Source location of the token this instruction was compiled from.
    pub fn span(&self) -> Span {
        match self {
            Instr::Const(_, span) | Instr::Unary(_, span) | Instr::Binary(_, span) => *span,
            Instr::Load { span, .. } | Instr::Call { span, .. } => *span,
        }
    }
}

/// A finished postfix program.
///
/// Programs are immutable once built; the cache hands out shared handles
/// to the same compilation result.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    instrs: Vec<Instr>,
}

impl Program {
    pub fn new(instrs: Vec<Instr>) -> Self {
        Program { instrs }
    }

    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

/// Renders the program in conventional postfix notation: operands and
/// operator symbols separated by spaces, unary minus as `-.`, calls as
/// `name:argc`. `"3 + 4 * 2"` renders as `3 4 2 * +`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instr) in self.instrs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match instr {
                Instr::Const(value, _) => write!(f, "{value}")?,
                Instr::Load { name, .. } => f.write_str(name)?,
                Instr::Unary(op, _) => write!(f, "{op}.")?,
                Instr::Binary(op, _) => write!(f, "{op}")?,
                Instr::Call { name, argc, .. } => write!(f, "{name}:{argc}")?,
            }
        }
        Ok(())
    }
}
