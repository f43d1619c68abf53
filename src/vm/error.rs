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

//! Runtime error types.

use thiserror::Error;

use crate::ir::{Operator, QuadrupleIndex};
use crate::memory::Address;
use crate::semantic::DataType;

/// A fatal error raised while executing a program.
///
/// Every variant records the index of the quadruple that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("quadruple {at}: read of uninitialized address {address}")]
    UninitializedRead { at: QuadrupleIndex, address: Address },

    #[error("quadruple {at}: address {address} is out of range")]
    AddressOutOfRange { at: QuadrupleIndex, address: Address },

    #[error("quadruple {at}: return without a matching call")]
    CallStackUnderflow { at: QuadrupleIndex },

    #[error("quadruple {at}: division by zero")]
    DivisionByZero { at: QuadrupleIndex },

    #[error("quadruple {at}: {operator} cannot be executed with these operands")]
    UnsupportedOperator {
        at: QuadrupleIndex,
        operator: Operator,
    },

    #[error("quadruple {at}: address {address} expects {expected}, found {found}")]
    TypeConfusion {
        at: QuadrupleIndex,
        address: Address,
        expected: DataType,
        found: &'static str,
    },

    #[error("quadruple {at}: no function starts at quadruple {entry}")]
    UnknownFunction {
        at: QuadrupleIndex,
        entry: QuadrupleIndex,
    },

    #[error("quadruple {at}: no activation record available")]
    MissingActivationRecord { at: QuadrupleIndex },

    #[error("quadruple {at}: step budget of {budget} exhausted")]
    ExecutionBudgetExceeded { at: QuadrupleIndex, budget: u64 },

    #[error("quadruple {at}: cannot write output: {message}")]
    Output { at: QuadrupleIndex, message: String },
}

impl RuntimeError {
    /// Index of the quadruple that failed.
    pub fn at(&self) -> QuadrupleIndex {
        match self {
            RuntimeError::UninitializedRead { at, .. }
            | RuntimeError::AddressOutOfRange { at, .. }
            | RuntimeError::CallStackUnderflow { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::UnsupportedOperator { at, .. }
            | RuntimeError::TypeConfusion { at, .. }
            | RuntimeError::UnknownFunction { at, .. }
            | RuntimeError::MissingActivationRecord { at }
            | RuntimeError::ExecutionBudgetExceeded { at, .. }
            | RuntimeError::Output { at, .. } => *at,
        }
    }
}

/// A memory access failure, before the failing quadruple is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MemoryFault {
    Uninitialized(Address),
    OutOfRange(Address),
    TypeConfusion {
        address: Address,
        expected: DataType,
        found: &'static str,
    },
    NoActivationRecord,
}

impl MemoryFault {
    /// Attach the failing quadruple.
    pub(crate) fn at(self, at: QuadrupleIndex) -> RuntimeError {
        match self {
            MemoryFault::Uninitialized(address) => RuntimeError::UninitializedRead { at, address },
            MemoryFault::OutOfRange(address) => RuntimeError::AddressOutOfRange { at, address },
            MemoryFault::TypeConfusion {
                address,
                expected,
                found,
            } => RuntimeError::TypeConfusion {
                at,
                address,
                expected,
                found,
            },
            MemoryFault::NoActivationRecord => RuntimeError::MissingActivationRecord { at },
        }
    }
}
