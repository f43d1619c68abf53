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

//! Quadruples and the append-only store that holds them.

use super::operator::Operator;
use crate::memory::Address;

/// Position of a quadruple in the program.
///
/// Kept apart from [`Address`] so code positions and data addresses
/// cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadrupleIndex(usize);

impl QuadrupleIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn value(self) -> usize {
        self.0
    }

    /// The index right after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for QuadrupleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result field of a quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Not used, or a jump whose destination is not known yet.
    Unset,
    /// Where a value is written.
    Address(Address),
    /// A code position: jump destination or function entry.
    Jump(QuadrupleIndex),
}

impl Target {
    /// Get the address, if this target is one.
    pub fn address(self) -> Option<Address> {
        match self {
            Target::Address(address) => Some(address),
            _ => None,
        }
    }

    /// Get the code position, if this target is one.
    pub fn jump(self) -> Option<QuadrupleIndex> {
        match self {
            Target::Jump(index) => Some(index),
            _ => None,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Unset => write!(f, "-"),
            Target::Address(address) => write!(f, "{}", address),
            Target::Jump(index) => write!(f, "{}", index),
        }
    }
}

/// One IR instruction: `(operator, arg1, arg2, result)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadruple {
    pub operator: Operator,
    pub arg1: Option<Address>,
    pub arg2: Option<Address>,
    pub result: Target,
}

impl Quadruple {
    pub fn new(
        operator: Operator,
        arg1: Option<Address>,
        arg2: Option<Address>,
        result: Target,
    ) -> Self {
        Self {
            operator,
            arg1,
            arg2,
            result,
        }
    }

    /// A jump with no destination yet.
    pub fn pending_jump(operator: Operator, condition: Option<Address>) -> Self {
        Self::new(operator, condition, None, Target::Unset)
    }
}

impl std::fmt::Display for Quadruple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operand = |address: Option<Address>| {
            address.map_or_else(|| "-".to_string(), |address| address.to_string())
        };
        write!(
            f,
            "({}, {}, {}, {})",
            self.operator,
            operand(self.arg1),
            operand(self.arg2),
            self.result
        )
    }
}

/// Append-only quadruple sequence with backpatching of jump targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadrupleStore {
    quadruples: Vec<Quadruple>,
}

impl QuadrupleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quadruple and return its index.
    pub fn push(&mut self, quadruple: Quadruple) -> QuadrupleIndex {
        let index = self.next_index();
        log::trace!("emit {:>4} {}", index, quadruple);
        self.quadruples.push(quadruple);
        index
    }

    /// Index the next pushed quadruple will get.
    pub fn next_index(&self) -> QuadrupleIndex {
        QuadrupleIndex::new(self.quadruples.len())
    }

    /// Fill in the destination of a pending jump.
    ///
    /// Panics if `index` is not a jump or its destination is already set.
    pub fn fill(&mut self, index: QuadrupleIndex, destination: QuadrupleIndex) {
        let quadruple = &mut self.quadruples[index.value()];
        assert!(
            quadruple.operator.is_jump(),
            "quadruple {} ({}) is not a jump",
            index,
            quadruple.operator
        );
        assert_eq!(
            quadruple.result,
            Target::Unset,
            "quadruple {} was already backpatched",
            index
        );
        log::debug!("backpatch {} -> {}", index, destination);
        quadruple.result = Target::Jump(destination);
    }

    pub fn get(&self, index: QuadrupleIndex) -> Option<&Quadruple> {
        self.quadruples.get(index.value())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quadruple> {
        self.quadruples.iter()
    }

    pub fn len(&self) -> usize {
        self.quadruples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quadruples.is_empty()
    }

    /// Indices of jumps that still have no destination.
    pub fn unresolved(&self) -> Vec<QuadrupleIndex> {
        self.quadruples
            .iter()
            .enumerate()
            .filter(|(_, q)| q.operator.is_jump() && q.result == Target::Unset)
            .map(|(index, _)| QuadrupleIndex::new(index))
            .collect()
    }
}

impl From<Vec<Quadruple>> for QuadrupleStore {
    fn from(quadruples: Vec<Quadruple>) -> Self {
        Self { quadruples }
    }
}

impl std::fmt::Display for QuadrupleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, quadruple) in self.quadruples.iter().enumerate() {
            writeln!(f, "{}: {}", index, quadruple)?;
        }
        Ok(())
    }
}
