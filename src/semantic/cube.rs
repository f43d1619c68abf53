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

//! Semantic compatibility table.
//!
//! A total function from `(left, right, operator)` to the result type of
//! the operation, or a [`TypeError`] when the combination is not allowed.
//! Assignment is checked with the target on the left.

use thiserror::Error;

use super::types::DataType;
use crate::ir::Operator;

/// An operator was applied to operand types it does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operator '{}' cannot be applied to {left} and {right}", symbol(.operator))]
pub struct TypeError {
    pub left: DataType,
    pub right: DataType,
    pub operator: Operator,
}

fn symbol(operator: &Operator) -> &'static str {
    operator.symbol().unwrap_or_else(|| operator.name())
}

/// Look up the result type of `left <operator> right`.
pub fn result_type(
    left: DataType,
    right: DataType,
    operator: Operator,
) -> Result<DataType, TypeError> {
    let error = TypeError {
        left,
        right,
        operator,
    };

    if !left.is_numeric() || !right.is_numeric() {
        return Err(error);
    }

    if operator.is_relational() {
        return Ok(DataType::Bool);
    }

    if operator.is_arithmetic() {
        if operator == Operator::Divide {
            return Ok(DataType::Float);
        }
        if left == DataType::Float || right == DataType::Float {
            return Ok(DataType::Float);
        }
        return Ok(DataType::Int);
    }

    if operator == Operator::Assign {
        return match (left, right) {
            (DataType::Int, DataType::Int) => Ok(DataType::Int),
            (DataType::Float, DataType::Float) | (DataType::Float, DataType::Int) => {
                Ok(DataType::Float)
            }
            _ => Err(error),
        };
    }

    Err(error)
}

/// Check whether a value of type `value` may be stored into a `target` slot.
pub fn is_assignable(target: DataType, value: DataType) -> bool {
    result_type(target, value, Operator::Assign).is_ok()
}
