//! Builtin function implementations.
//!
//! All builtins receive their arguments in source order and report
//! failures as [`FunctionError`]; the executor attaches the call site.
//! Aggregates accept any argument count and return zero for none.
//! `round` and `trunc` take a value plus an optional non-negative integer
//! digit count (default 0) — their arity is validated here rather than at
//! parse time, since "1 or 2" is not expressible as a fixed contract.

use crate::errors::FunctionError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub(crate) fn max(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    Ok(args.iter().copied().max().unwrap_or(Decimal::ZERO))
}

pub(crate) fn min(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    Ok(args.iter().copied().min().unwrap_or(Decimal::ZERO))
}

pub(crate) fn sum(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    args.iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v)
            .ok_or_else(|| FunctionError::new("sum overflowed"))
    })
}

pub(crate) fn avg(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    if args.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let total = sum(args)?;
    total
        .checked_div(Decimal::from(args.len() as u64))
        .ok_or_else(|| FunctionError::new("avg overflowed"))
}

pub(crate) fn round(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    let (value, digits) = value_and_digits(args, "round")?;
    // Half-away-from-zero, matching commercial rounding expectations
    // rather than the decimal type's banker's-rounding default.
    Ok(value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero))
}

pub(crate) fn trunc(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    let (value, digits) = value_and_digits(args, "trunc")?;
    Ok(value.trunc_with_scale(digits))
}

pub(crate) fn floor(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    exactly_one(args, "floor").map(|v| v.floor())
}

pub(crate) fn ceil(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    exactly_one(args, "ceil").map(|v| v.ceil())
}

pub(crate) fn abs(args: &[Decimal]) -> Result<Decimal, FunctionError> {
    exactly_one(args, "abs").map(|v| v.abs())
}

/// Split `(value)` or `(value, digits)` argument lists.
fn value_and_digits(args: &[Decimal], name: &str) -> Result<(Decimal, u32), FunctionError> {
    match args {
        [value] => Ok((*value, 0)),
        [value, digits] => Ok((*value, digit_count(*digits)?)),
        _ => Err(FunctionError::new(format!(
            "{name} takes 1 or 2 arguments, got {}",
            args.len()
        ))),
    }
}

fn digit_count(arg: Decimal) -> Result<u32, FunctionError> {
    if arg.is_sign_negative() || !arg.fract().is_zero() {
        return Err(FunctionError::new(
            "digit count must be a non-negative integer",
        ));
    }
    arg.to_u32()
        .ok_or_else(|| FunctionError::new("digit count out of range"))
}

fn exactly_one(args: &[Decimal], name: &str) -> Result<Decimal, FunctionError> {
    match args {
        [value] => Ok(*value),
        _ => Err(FunctionError::new(format!(
            "{name} takes exactly 1 argument, got {}",
            args.len()
        ))),
    }
}
