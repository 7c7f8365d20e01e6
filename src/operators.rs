//! The fixed table of binary operators.

use crate::token::OperatorKind;
use crate::value::Value;

/// Why an operator could not produce a value. The interpreter attaches
/// source locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Unsupported,
    DivisionByZero,
    Overflow,
    IndexOutOfRange { index: i64, len: usize },
    InvalidShift { amount: i64 },
}

/// Longest string, in bytes, that repetition may produce.
pub const MAX_STRING_LEN: usize = 1 << 24;

/// Apply `op` to two values.
///
/// # Errors
///
/// Returns a [`Fault`] for operand kinds the operator does not support and
/// for arithmetic that has no result.
pub fn apply(op: OperatorKind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match op {
        OperatorKind::Add => add(lhs, rhs),
        OperatorKind::Subtract => arithmetic(lhs, rhs, i64::checked_sub, |a, b| a - b),
        OperatorKind::Multiply => multiply(lhs, rhs),
        OperatorKind::Divide => divide(lhs, rhs),
        OperatorKind::IntegerDivide => floor_divide(lhs, rhs),
        OperatorKind::Modulo => modulo(lhs, rhs),
        OperatorKind::Index => index(lhs, rhs),
        OperatorKind::ShiftLeft => shift(lhs, rhs, i64::checked_shl),
        OperatorKind::ShiftRight => shift(lhs, rhs, i64::checked_shr),
        OperatorKind::Less => compare(lhs, rhs).map(|o| Value::Boolean(o.is_lt())),
        OperatorKind::Greater => compare(lhs, rhs).map(|o| Value::Boolean(o.is_gt())),
        OperatorKind::Equal => Ok(Value::Boolean(equal(lhs, rhs))),
        OperatorKind::BitAnd => bitwise(lhs, rhs, |a, b| a & b, |a, b| a & b),
        OperatorKind::BitXor => bitwise(lhs, rhs, |a, b| a ^ b, |a, b| a ^ b),
        OperatorKind::BitOr => bitwise(lhs, rhs, |a, b| a | b, |a, b| a | b),
        OperatorKind::And => logical(lhs, rhs, |a, b| a && b),
        OperatorKind::Or => logical(lhs, rhs, |a, b| a || b),
    }
}

/// Numeric operands widened to a common representation.
enum Numbers {
    Integers(i64, i64),
    Floats(f64, f64),
}

#[allow(clippy::cast_precision_loss)]
const fn numbers(lhs: &Value, rhs: &Value) -> Option<Numbers> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => Some(Numbers::Integers(*a, *b)),
        (Value::Integer(a), Value::Float(b)) => Some(Numbers::Floats(*a as f64, *b)),
        (Value::Float(a), Value::Integer(b)) => Some(Numbers::Floats(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some(Numbers::Floats(*a, *b)),
        _ => None,
    }
}

fn arithmetic(
    lhs: &Value,
    rhs: &Value,
    int: impl Fn(i64, i64) -> Option<i64>,
    float: impl Fn(f64, f64) -> f64,
) -> Result<Value, Fault> {
    match numbers(lhs, rhs).ok_or(Fault::Unsupported)? {
        Numbers::Integers(a, b) => int(a, b).map(Value::Integer).ok_or(Fault::Overflow),
        Numbers::Floats(a, b) => Ok(Value::Float(float(a, b))),
    }
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Ok(Value::String(format!("{a}{b}")));
    }
    arithmetic(lhs, rhs, i64::checked_add, |a, b| a + b)
}

fn multiply(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match (lhs, rhs) {
        (Value::String(s), Value::Integer(n)) | (Value::Integer(n), Value::String(s)) => {
            let count = usize::try_from(*n).unwrap_or(0);
            match s.len().checked_mul(count) {
                Some(len) if len <= MAX_STRING_LEN => Ok(Value::String(s.repeat(count))),
                _ => Err(Fault::Overflow),
            }
        }
        _ => arithmetic(lhs, rhs, i64::checked_mul, |a, b| a * b),
    }
}

#[allow(clippy::cast_precision_loss)]
fn divide(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    let (a, b) = match numbers(lhs, rhs).ok_or(Fault::Unsupported)? {
        Numbers::Integers(a, b) => (a as f64, b as f64),
        Numbers::Floats(a, b) => (a, b),
    };
    if b == 0.0 {
        return Err(Fault::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

fn floor_divide(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match numbers(lhs, rhs).ok_or(Fault::Unsupported)? {
        Numbers::Integers(_, 0) => Err(Fault::DivisionByZero),
        Numbers::Integers(a, b) => {
            let quotient = a.checked_div(b).ok_or(Fault::Overflow)?;
            let floored = if (a % b != 0) && ((a < 0) != (b < 0)) {
                quotient - 1
            } else {
                quotient
            };
            Ok(Value::Integer(floored))
        }
        Numbers::Floats(_, b) if b == 0.0 => Err(Fault::DivisionByZero),
        Numbers::Floats(a, b) => Ok(Value::Float((a / b).floor())),
    }
}

/// Remainder taking the sign of the divisor.
fn modulo(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match numbers(lhs, rhs).ok_or(Fault::Unsupported)? {
        Numbers::Integers(_, 0) => Err(Fault::DivisionByZero),
        Numbers::Integers(a, b) => {
            let r = a.checked_rem(b).ok_or(Fault::Overflow)?;
            let r = if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r };
            Ok(Value::Integer(r))
        }
        Numbers::Floats(_, b) if b == 0.0 => Err(Fault::DivisionByZero),
        Numbers::Floats(a, b) => Ok(Value::Float(a - b * (a / b).floor())),
    }
}

/// `string AT integer`: one character, counting from the end when negative.
fn index(lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    let (Value::String(s), Value::Integer(i)) = (lhs, rhs) else {
        return Err(Fault::Unsupported);
    };
    let len = s.chars().count();
    let out_of_range = Fault::IndexOutOfRange { index: *i, len };
    let position = if *i < 0 {
        usize::try_from(i.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    } else {
        usize::try_from(*i).ok()
    };
    position
        .and_then(|p| s.chars().nth(p))
        .map(|c| Value::String(c.to_string()))
        .ok_or(out_of_range)
}

fn shift(lhs: &Value, rhs: &Value, op: fn(i64, u32) -> Option<i64>) -> Result<Value, Fault> {
    let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) else {
        return Err(Fault::Unsupported);
    };
    u32::try_from(*b)
        .ok()
        .and_then(|amount| op(*a, amount))
        .map(Value::Integer)
        .ok_or(Fault::InvalidShift { amount: *b })
}

fn compare(lhs: &Value, rhs: &Value) -> Result<std::cmp::Ordering, Fault> {
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Ok(a.cmp(b));
    }
    match numbers(lhs, rhs).ok_or(Fault::Unsupported)? {
        Numbers::Integers(a, b) => Ok(a.cmp(&b)),
        Numbers::Floats(a, b) => a.partial_cmp(&b).ok_or(Fault::Unsupported),
    }
}

/// Values of different kinds are unequal, except integers and floats,
/// which compare numerically.
fn equal(lhs: &Value, rhs: &Value) -> bool {
    match numbers(lhs, rhs) {
        Some(Numbers::Integers(a, b)) => a == b,
        #[allow(clippy::float_cmp)]
        Some(Numbers::Floats(a, b)) => a == b,
        None => lhs == rhs,
    }
}

fn bitwise(
    lhs: &Value,
    rhs: &Value,
    int: fn(i64, i64) -> i64,
    boolean: fn(bool, bool) -> bool,
) -> Result<Value, Fault> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(int(*a, *b))),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(boolean(*a, *b))),
        _ => Err(Fault::Unsupported),
    }
}

fn logical(lhs: &Value, rhs: &Value, op: fn(bool, bool) -> bool) -> Result<Value, Fault> {
    match (lhs, rhs) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(op(*a, *b))),
        _ => Err(Fault::Unsupported),
    }
}
