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

//! Constant pool entries.

use std::hash::{Hash, Hasher};

use super::segments::{Address, Segment};

/// A literal value held in one of the constant segments.
///
/// Floats compare and hash by bit pattern so that every literal has exactly
/// one pool entry, `-0.0` and `NaN` included.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConstantValue {
    /// The constant segment this literal is interned into.
    pub fn segment(&self) -> Segment {
        match self {
            ConstantValue::Int(_) => Segment::ConstInt,
            ConstantValue::Float(_) => Segment::ConstFloat,
            ConstantValue::Str(_) => Segment::ConstString,
        }
    }
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantValue::Int(a), ConstantValue::Int(b)) => a == b,
            (ConstantValue::Float(a), ConstantValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ConstantValue::Str(a), ConstantValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstantValue {}

impl Hash for ConstantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConstantValue::Int(value) => value.hash(state),
            ConstantValue::Float(value) => value.to_bits().hash(state),
            ConstantValue::Str(value) => value.hash(state),
        }
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::Int(value) => write!(f, "{}", value),
            ConstantValue::Float(value) => write!(f, "{:?}", value),
            ConstantValue::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// One interned literal and the address it was assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub address: Address,
    pub value: ConstantValue,
}

/// All interned literals of a program, ordered by address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    entries: Vec<Constant>,
}

impl ConstantTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, keeping the table ordered by address.
    pub fn insert(&mut self, address: Address, value: ConstantValue) {
        let position = self
            .entries
            .partition_point(|entry| entry.address < address);
        self.entries.insert(position, Constant { address, value });
    }

    /// Find the literal stored at an address.
    pub fn get(&self, address: Address) -> Option<&ConstantValue> {
        self.entries
            .binary_search_by_key(&address, |entry| entry.address)
            .ok()
            .map(|index| &self.entries[index].value)
    }

    /// Iterate over the entries in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
