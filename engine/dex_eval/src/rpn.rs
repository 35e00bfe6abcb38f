//! Stack-based execution of compiled postfix programs.
//!
//! One left-to-right pass over the instruction sequence with an explicit
//! value stack pre-sized to the program length. Public so hand-assembled
//! programs can be executed in tests — which is also why the final
//! exactly-one-value check exists even though parser output can never
//! violate it.

use crate::errors::EvalError;
use crate::evaluator::Bindings;
use crate::registry::FunctionRegistry;
use dex_ir::{Decimal, Instr, OpKind, Program, Span};
use rust_decimal::MathematicalOps;

/// Execute `program` against the caller's bindings and a function registry.
pub fn run(
    program: &Program,
    bindings: &Bindings,
    registry: &FunctionRegistry,
) -> Result<Decimal, EvalError> {
    let mut stack: Vec<Decimal> = Vec::with_capacity(program.len());

    for instr in program.instrs() {
        match instr {
            Instr::Const(value, _) => stack.push(*value),

            Instr::Load { name, span } => {
                let value =
                    bindings
                        .get(name)
                        .copied()
                        .ok_or_else(|| EvalError::UnboundIdentifier {
                            name: name.clone(),
                            span: *span,
                        })?;
                stack.push(value);
            }

            Instr::Unary(op, span) => {
                let value = stack.pop().ok_or(EvalError::StackUnderflow { span: *span })?;
                match op {
                    OpKind::Sub => stack.push(-value),
                    OpKind::Add | OpKind::Mul | OpKind::Div | OpKind::Rem | OpKind::Pow => {
                        return Err(EvalError::UnsupportedUnary {
                            op: *op,
                            span: *span,
                        });
                    }
                }
            }

            Instr::Binary(op, span) => {
                // Right operand is on top; popping it first keeps
                // subtraction and division source-faithful.
                let rhs = stack.pop().ok_or(EvalError::StackUnderflow { span: *span })?;
                let lhs = stack.pop().ok_or(EvalError::StackUnderflow { span: *span })?;
                stack.push(apply_binary(*op, lhs, rhs, *span)?);
            }

            Instr::Call { name, argc, span } => {
                let entry = registry
                    .lookup(name)
                    .ok_or_else(|| EvalError::UnknownFunction {
                        name: name.clone(),
                        span: *span,
                    })?;
                if stack.len() < *argc {
                    return Err(EvalError::StackUnderflow { span: *span });
                }
                // The bottom of the popped window is the first source
                // argument, so splitting preserves left-to-right order.
                let args = stack.split_off(stack.len() - argc);
                let value = (entry.call)(&args).map_err(|source| EvalError::Function {
                    name: name.clone(),
                    span: *span,
                    source,
                })?;
                stack.push(value);
            }
        }
    }

    let value = stack.pop().ok_or(EvalError::StackImbalance { leftover: 0 })?;
    if !stack.is_empty() {
        return Err(EvalError::StackImbalance {
            leftover: stack.len() + 1,
        });
    }
    Ok(value)
}

fn apply_binary(op: OpKind, lhs: Decimal, rhs: Decimal, span: Span) -> Result<Decimal, EvalError> {
    let overflow = || EvalError::Overflow { op, span };
    match op {
        OpKind::Add => lhs.checked_add(rhs).ok_or_else(overflow),
        OpKind::Sub => lhs.checked_sub(rhs).ok_or_else(overflow),
        OpKind::Mul => lhs.checked_mul(rhs).ok_or_else(overflow),
        OpKind::Div => {
            if rhs.is_zero() {
                return Err(EvalError::DivisionByZero { span });
            }
            lhs.checked_div(rhs).ok_or_else(overflow)
        }
        OpKind::Rem => {
            if rhs.is_zero() {
                return Err(EvalError::DivisionByZero { span });
            }
            lhs.checked_rem(rhs).ok_or_else(overflow)
        }
        OpKind::Pow => lhs.checked_powd(rhs).ok_or_else(overflow),
    }
}
