// Ente - A single-pass compiler and quadruple VM for the Ente teaching language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Arithmetic and relational operators on run-time values.
//!
//! Result types follow the semantic compatibility table: relational
//! operators yield bools, `/` always yields a float, other arithmetic
//! yields a float when either side is one and an int otherwise. Bools
//! take part as 0 and 1. Integer arithmetic wraps on overflow.

use super::value::Value;
use crate::ir::Operator;

/// Why an operation could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperationFault {
    DivisionByZero,
    Unsupported,
}

/// Apply a binary operator.
pub(crate) fn evaluate(
    operator: Operator,
    left: &Value,
    right: &Value,
) -> Result<Value, OperationFault> {
    if operator.is_relational() {
        return compare(operator, left, right).map(Value::Bool);
    }

    match operator {
        Operator::Divide => {
            let (l, r) = floats(left, right)?;
            if r == 0.0 {
                return Err(OperationFault::DivisionByZero);
            }
            Ok(Value::Float(l / r))
        }
        Operator::Add | Operator::Subtract | Operator::Multiply => {
            if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
                let value = match operator {
                    Operator::Add => l.wrapping_add(r),
                    Operator::Subtract => l.wrapping_sub(r),
                    _ => l.wrapping_mul(r),
                };
                return Ok(Value::Int(value));
            }
            let (l, r) = floats(left, right)?;
            let value = match operator {
                Operator::Add => l + r,
                Operator::Subtract => l - r,
                _ => l * r,
            };
            Ok(Value::Float(value))
        }
        _ => Err(OperationFault::Unsupported),
    }
}

fn floats(left: &Value, right: &Value) -> Result<(f64, f64), OperationFault> {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(OperationFault::Unsupported),
    }
}

fn compare(operator: Operator, left: &Value, right: &Value) -> Result<bool, OperationFault> {
    let ordering = if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        Some(l.cmp(&r))
    } else {
        let (l, r) = floats(left, right)?;
        l.partial_cmp(&r)
    };

    // NaN compares unequal to everything.
    let Some(ordering) = ordering else {
        return Ok(operator == Operator::NotEqual);
    };

    Ok(match operator {
        Operator::LessThan => ordering.is_lt(),
        Operator::GreaterThan => ordering.is_gt(),
        Operator::LessEqual => ordering.is_le(),
        Operator::GreaterEqual => ordering.is_ge(),
        Operator::Equal => ordering.is_eq(),
        _ => ordering.is_ne(),
    })
}
