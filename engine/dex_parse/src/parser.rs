//! Infix-to-postfix compilation.
//!
//! Classic shunting-yard with two explicit stacks: pending operators and
//! stack markers, plus one argument counter per currently open function
//! call (innermost on top). Equal precedence resolves strictly left to
//! right, so `^` is left-associative here: `2^3^2` groups as `(2^3)^2`.

use crate::error::ParseError;
use dex_ir::{
    Arity, Decimal, Instr, OpKind, Program, Span, Token, TokenKind, FUNCTION_PRECEDENCE,
    UNARY_PRECEDENCE,
};
use dex_lexer::{LexError, Lexer};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Arity source for compile-time function checks.
///
/// The evaluator's registry implements this; tests use a plain map.
pub trait ArityLookup {
    fn arity_of(&self, name: &str) -> Option<Arity>;
}

impl<S: BuildHasher> ArityLookup for HashMap<String, Arity, S> {
    fn arity_of(&self, name: &str) -> Option<Arity> {
        self.get(name).copied()
    }
}

/// Entry on the pending-operator stack.
struct PendingOp {
    kind: PendingKind,
    prec: u8,
    span: Span,
}

enum PendingKind {
    Binary(OpKind),
    Unary(OpKind),
    /// Grouping marker. Precedence 0 so no operator pops past it.
    LParen,
    /// Open function call awaiting its argument count.
    Func(String),
}

impl PendingOp {
    fn binary(op: OpKind, span: Span) -> Self {
        PendingOp {
            kind: PendingKind::Binary(op),
            prec: op.precedence(),
            span,
        }
    }

    fn unary(op: OpKind, span: Span) -> Self {
        PendingOp {
            kind: PendingKind::Unary(op),
            prec: UNARY_PRECEDENCE,
            span,
        }
    }

    fn lparen(span: Span) -> Self {
        PendingOp {
            kind: PendingKind::LParen,
            prec: 0,
            span,
        }
    }

    fn func(name: String, span: Span) -> Self {
        PendingOp {
            kind: PendingKind::Func(name),
            prec: FUNCTION_PRECEDENCE,
            span,
        }
    }
}

/// Single-pass compiler from expression source to a postfix [`Program`].
///
/// Stateless apart from the borrowed arity source; one parser can compile
/// any number of expressions.
pub struct Parser<'a> {
    arities: &'a dyn ArityLookup,
}

impl<'a> Parser<'a> {
    pub fn new(arities: &'a dyn ArityLookup) -> Self {
        Parser { arities }
    }

    /// Compile `source` into a postfix program.
    pub fn parse(&self, source: &str) -> Result<Program, ParseError> {
        let mut lexer = Lexer::new(source)?;
        let mut out: Vec<Instr> = Vec::new();
        let mut ops: Vec<PendingOp> = Vec::new();
        // One counter per open call, innermost on top.
        let mut arg_counts: Vec<usize> = Vec::new();

        loop {
            let tok = lexer.next_token();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Illegal(byte) => {
                    return Err(ParseError::Lex(LexError::IllegalByte {
                        byte,
                        offset: tok.span.start,
                    }));
                }
                TokenKind::Int => {
                    let value = parse_literal(&tok, 0)?;
                    out.push(Instr::Const(value, tok.span));
                }
                TokenKind::Float { scale } => {
                    let value = parse_literal(&tok, u32::from(scale))?;
                    out.push(Instr::Const(value, tok.span));
                }
                TokenKind::Ident => out.push(Instr::Load {
                    name: tok.text,
                    span: tok.span,
                }),
                TokenKind::Op(op) => {
                    self.push_operator(
                        PendingOp::binary(op, tok.span),
                        &mut ops,
                        &mut arg_counts,
                        &mut out,
                    )?;
                }
                TokenKind::UnaryOp(op) => {
                    self.push_operator(
                        PendingOp::unary(op, tok.span),
                        &mut ops,
                        &mut arg_counts,
                        &mut out,
                    )?;
                }
                TokenKind::LParen => ops.push(PendingOp::lparen(tok.span)),
                TokenKind::Function => {
                    ops.push(PendingOp::func(tok.text, tok.span));
                    // The counter starts at 1; commas increment it.
                    arg_counts.push(1);
                }
                TokenKind::Comma => {
                    // Flush the current argument back to the innermost
                    // open paren, leaving the paren in place.
                    while ops
                        .last()
                        .is_some_and(|top| !matches!(top.kind, PendingKind::LParen))
                    {
                        if let Some(top) = ops.pop() {
                            self.pop_pending(top, &mut arg_counts, &mut out)?;
                        }
                    }
                    // A comma outside any call has no counter to bump.
                    if let Some(count) = arg_counts.last_mut() {
                        *count += 1;
                    }
                }
                TokenKind::RParen => {
                    let mut closed = false;
                    while let Some(top) = ops.pop() {
                        if matches!(top.kind, PendingKind::LParen) {
                            closed = true;
                            break;
                        }
                        self.pop_pending(top, &mut arg_counts, &mut out)?;
                    }
                    if !closed {
                        return Err(ParseError::UnmatchedParen { span: tok.span });
                    }
                }
            }
        }

        // Drain whatever is still pending. A surviving paren marker means
        // the input closed unbalanced; pop_pending reports it.
        while let Some(top) = ops.pop() {
            self.pop_pending(top, &mut arg_counts, &mut out)?;
        }

        tracing::trace!(instrs = out.len(), "compiled expression");
        Ok(Program::new(out))
    }

    /// Pop operators with precedence >= the incoming operator, then push.
    ///
    /// The `>=` comparison yields strict left-to-right resolution at equal
    /// precedence. Function entries sit at the tightest level, so a call
    /// is finalized as soon as any following operator arrives.
    fn push_operator(
        &self,
        new: PendingOp,
        ops: &mut Vec<PendingOp>,
        arg_counts: &mut Vec<usize>,
        out: &mut Vec<Instr>,
    ) -> Result<(), ParseError> {
        while ops.last().is_some_and(|top| top.prec >= new.prec) {
            if let Some(top) = ops.pop() {
                self.pop_pending(top, arg_counts, out)?;
            }
        }
        ops.push(new);
        Ok(())
    }

    /// Move one pending entry into the output, finalizing function calls.
    ///
    /// Receiving a paren marker means it survived to a point where no `)`
    /// can ever match it — an unmatched-parenthesis error.
    fn pop_pending(
        &self,
        op: PendingOp,
        arg_counts: &mut Vec<usize>,
        out: &mut Vec<Instr>,
    ) -> Result<(), ParseError> {
        match op.kind {
            PendingKind::Binary(kind) => out.push(Instr::Binary(kind, op.span)),
            PendingKind::Unary(kind) => out.push(Instr::Unary(kind, op.span)),
            PendingKind::LParen => return Err(ParseError::UnmatchedParen { span: op.span }),
            PendingKind::Func(name) => {
                let argc = arg_counts.pop().unwrap_or(0);
                self.check_function(&name, argc, op.span)?;
                out.push(Instr::Call {
                    name,
                    argc,
                    span: op.span,
                });
            }
        }
        Ok(())
    }

    /// Validate a finalized call against the registry's arity contract.
    fn check_function(&self, name: &str, argc: usize, span: Span) -> Result<(), ParseError> {
        match self.arities.arity_of(name) {
            None => Err(ParseError::UnknownFunction {
                name: name.to_owned(),
                span,
            }),
            Some(Arity::Fixed(expected)) if expected != argc => Err(ParseError::ArityMismatch {
                name: name.to_owned(),
                expected,
                got: argc,
                span,
            }),
            Some(Arity::Fixed(_) | Arity::Variadic) => Ok(()),
        }
    }
}

/// Convert a literal token's digit string and scale to an exact decimal.
///
/// The mantissa is bounded by `i64` exactly as in the wire contract of the
/// decimal collaborator; longer digit runs fail cleanly.
fn parse_literal(tok: &Token, scale: u32) -> Result<Decimal, ParseError> {
    let out_of_range = || ParseError::InvalidNumber {
        literal: tok.text.clone(),
        span: tok.span,
    };
    let mantissa: i64 = tok.text.parse().map_err(|_| out_of_range())?;
    Decimal::try_new(mantissa, scale).map_err(|_| out_of_range())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on unexpected state")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashMap;

    fn arities() -> FxHashMap<String, Arity> {
        let mut map = FxHashMap::default();
        map.insert("sin".to_string(), Arity::Fixed(2));
        map.insert("cos".to_string(), Arity::Fixed(1));
        map.insert("log".to_string(), Arity::Fixed(2));
        map.insert("sum".to_string(), Arity::Variadic);
        map.insert("min".to_string(), Arity::Variadic);
        map.insert("max".to_string(), Arity::Variadic);
        map
    }

    fn parse(source: &str) -> Result<Program, ParseError> {
        let map = arities();
        Parser::new(&map).parse(source)
    }

    fn postfix(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn classic_precedence_example() {
        assert_eq!(postfix("3 + 4 * 2 / (1 - 5)^2"), "3 4 2 * 1 5 - 2 ^ / +");
    }

    #[test]
    fn fixed_arity_call() {
        assert_eq!(postfix("sin(2, 3)"), "2 3 sin:2");
    }

    #[test]
    fn unary_minus_in_operator_chain() {
        assert_eq!(postfix("-5 * 10 / -7"), "5 -. 10 * 7 -. /");
    }

    #[test]
    fn nested_calls_with_expressions() {
        assert_eq!(
            postfix("sum(1 +5 , max(3,10), min(5, -6))"),
            "1 5 + 3 10 max:2 5 6 -. min:2 sum:3"
        );
        assert_eq!(postfix("sum(min(1,2), max(2,3))"), "1 2 min:2 2 3 max:2 sum:2");
    }

    #[test]
    fn plain_division() {
        assert_eq!(postfix("1/3"), "1 3 /");
    }

    #[test]
    fn pow_is_left_associative() {
        // The pop-while-top->=-new rule groups equal precedence left to
        // right, so exponentiation chains resolve as (2^3)^2.
        assert_eq!(postfix("2^3^2"), "2 3 ^ 2 ^");
    }

    #[test]
    fn float_literal_becomes_exact_constant() {
        let program = parse("2.5 + 1").unwrap();
        assert_eq!(
            program.instrs()[0],
            Instr::Const(Decimal::new(25, 1), Span::new(0, 3))
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let first = parse("sum(a, 2) * -b ^ 2").unwrap();
        let second = parse("sum(a, 2) * -b ^ 2").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_call_resolves_to_one_argument() {
        // The argument counter opens at 1 and nothing decrements it, so a
        // zero-argument call compiles with argc 1 and fails at evaluation
        // with a stack underflow. Long-standing behavior, kept as is.
        assert_eq!(postfix("max()"), "max:1");
    }

    #[test]
    fn unclosed_paren_is_reported_at_the_open() {
        assert_eq!(
            parse("(1+2"),
            Err(ParseError::UnmatchedParen {
                span: Span::new(0, 1)
            })
        );
    }

    #[test]
    fn stray_close_paren_is_reported_at_the_close() {
        assert_eq!(
            parse("1+2)"),
            Err(ParseError::UnmatchedParen {
                span: Span::new(3, 4)
            })
        );
    }

    #[test]
    fn unknown_function_is_rejected() {
        assert_eq!(
            parse("nope(1)"),
            Err(ParseError::UnknownFunction {
                name: "nope".to_string(),
                span: Span::new(0, 4)
            })
        );
    }

    #[test]
    fn wrong_fixed_arity_is_rejected() {
        assert_eq!(
            parse("cos(1, 2)"),
            Err(ParseError::ArityMismatch {
                name: "cos".to_string(),
                expected: 1,
                got: 2,
                span: Span::new(0, 3)
            })
        );
        assert_eq!(
            parse("sin(5)"),
            Err(ParseError::ArityMismatch {
                name: "sin".to_string(),
                expected: 2,
                got: 1,
                span: Span::new(0, 3)
            })
        );
    }

    #[test]
    fn variadic_accepts_any_count() {
        assert_eq!(postfix("max(1)"), "1 max:1");
        assert_eq!(postfix("max(1, 2, 3, 4, 5)"), "1 2 3 4 5 max:5");
    }

    #[test]
    fn oversized_mantissa_is_rejected() {
        let literal = "9".repeat(20); // one digit past i64
        assert_eq!(
            parse(&literal),
            Err(ParseError::InvalidNumber {
                literal: literal.clone(),
                span: Span::new(0, 20)
            })
        );
    }

    #[test]
    fn illegal_byte_surfaces_as_lex_error() {
        assert_eq!(
            parse("1 + $"),
            Err(ParseError::Lex(LexError::IllegalByte {
                byte: b'$',
                offset: 4
            }))
        );
    }

    #[test]
    fn program_is_never_longer_than_twice_the_tokens() {
        // Parens and commas are consumed, not emitted.
        let source = "sum(min(1,2), max(2,3)) * (4 + 5)";
        let token_count = Lexer::new(source).unwrap().tokenize().unwrap().len();
        let program = parse(source).unwrap();
        assert!(program.len() <= 2 * token_count);
    }
}
