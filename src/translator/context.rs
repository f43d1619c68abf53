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

//! Translation state threaded through every grammar rule.
//!
//! One [`TranslationContext`] exists per translation. It owns the scope
//! directory, the address assigner, the emitted quadruples and the
//! auxiliary stacks the semantic actions work with.

use crate::error::Span;
use crate::ir::{CompiledProgram, Operator, Quadruple, QuadrupleIndex, QuadrupleStore, Target};
use crate::memory::{
    Address, FunctionFrame, MemoryAssigner, MemoryDescriptor, Segment, SegmentOverflow,
};
use crate::semantic::{DataType, ScopeDirectory, Storage};

/// A translated sub-expression: where its value lives and its static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub address: Address,
    pub data_type: DataType,
}

/// Entry of the pending-operator stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// An operator waiting for its right operand.
    Operator {
        operator: Operator,
        span: Span,
        line: usize,
    },
    /// Bottom marker pushed at `(` so a parenthesized expression only
    /// reduces its own operators.
    Fence,
}

/// Mutable state of one translation.
#[derive(Debug, Default)]
pub struct TranslationContext {
    pub scopes: ScopeDirectory,
    pub memory: MemoryAssigner,
    pub quadruples: QuadrupleStore,
    /// Operand stack.
    pub operands: Vec<Operand>,
    /// Pending-operator stack.
    pub operators: Vec<Pending>,
    /// Quadruples waiting for a jump target, and loop starts.
    pub jumps: Vec<QuadrupleIndex>,
    /// Declared functions with their entry index, in declaration order.
    pub functions: Vec<(String, QuadrupleIndex)>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_operand(&mut self, address: Address, data_type: DataType) {
        self.operands.push(Operand { address, data_type });
    }

    pub fn pop_operand(&mut self) -> Operand {
        self.operands.pop().expect("operand stack underflow")
    }

    pub fn push_fence(&mut self) {
        self.operators.push(Pending::Fence);
    }

    pub fn pop_fence(&mut self) {
        let top = self.operators.pop();
        assert_eq!(top, Some(Pending::Fence), "unbalanced operator fence");
    }

    /// Emit a quadruple and return its index.
    pub fn emit(
        &mut self,
        operator: Operator,
        arg1: Option<Address>,
        arg2: Option<Address>,
        result: Target,
    ) -> QuadrupleIndex {
        self.quadruples
            .push(Quadruple::new(operator, arg1, arg2, result))
    }

    /// Emit a jump whose destination is filled in later.
    pub fn emit_pending_jump(
        &mut self,
        operator: Operator,
        condition: Option<Address>,
    ) -> QuadrupleIndex {
        self.quadruples
            .push(Quadruple::pending_jump(operator, condition))
    }

    /// Point a pending jump at the next quadruple to be emitted.
    pub fn fill_here(&mut self, jump: QuadrupleIndex) {
        let here = self.quadruples.next_index();
        self.quadruples.fill(jump, here);
    }

    pub fn pop_jump(&mut self) -> QuadrupleIndex {
        self.jumps.pop().expect("jump stack underflow")
    }

    /// Assign a temporary for an intermediate result.
    pub fn temporary(&mut self, data_type: DataType) -> Result<Address, SegmentOverflow> {
        let segment = Segment::temp_for(data_type)
            .unwrap_or_else(|| panic!("no temporary segment for {}", data_type));
        self.memory.assign(segment)
    }

    /// Assign storage for a variable declared in the innermost scope.
    ///
    /// Returns `None` when the type has no variable segment.
    pub fn variable_address(
        &mut self,
        data_type: DataType,
    ) -> Option<Result<Address, SegmentOverflow>> {
        match self.scopes.storage().clone() {
            Storage::Global => {
                let segment = Segment::global_for(data_type)?;
                Some(self.memory.assign(segment))
            }
            Storage::Local(key) => {
                let segment = Segment::local_for(data_type)?;
                Some(self.memory.assign_local(&key, segment))
            }
        }
    }

    /// Package the translation output.
    pub fn finish(self) -> CompiledProgram {
        assert!(self.operands.is_empty(), "operands left on the stack");
        assert!(self.jumps.is_empty(), "jumps left on the stack");
        debug_assert!(self.quadruples.unresolved().is_empty());

        let functions = self
            .functions
            .iter()
            .map(|(name, entry)| FunctionFrame {
                name: name.clone(),
                entry: *entry,
                locals: self.memory.local_sizes(name),
            })
            .collect();
        let (globals, _, constants) = self.memory.output();

        CompiledProgram {
            descriptor: MemoryDescriptor { globals, functions },
            constants,
            quadruples: self.quadruples,
        }
    }
}
