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

//! Segmented address space.
//!
//! Every value lives at a numeric address whose range encodes both its
//! storage class and its type. The same table is used by the translator
//! to hand out addresses and by the virtual machine to resolve them.

use crate::semantic::DataType;

/// A data address in the segmented address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(u32);

impl Address {
    /// Wrap a raw address.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the segment this address belongs to.
    pub fn segment(self) -> Option<Segment> {
        Segment::decode(self)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Program-wide variables.
    Global,
    /// Intermediate expression results.
    Temporary,
    /// Interned literals, loaded before execution.
    Constant,
    /// Per-activation-record variables.
    Local,
}

/// One (storage class, type) address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    GlobalVoid,
    GlobalInt,
    GlobalFloat,
    TempInt,
    TempFloat,
    TempBool,
    ConstInt,
    ConstFloat,
    ConstString,
    LocalInt,
    LocalFloat,
}

/// Base offsets of every segment, ascending. A segment ends where the next begins.
pub const LAYOUT: [(u32, Segment); 11] = [
    (1_000, Segment::GlobalVoid),
    (10_000, Segment::GlobalInt),
    (20_000, Segment::GlobalFloat),
    (30_000, Segment::TempInt),
    (40_000, Segment::TempFloat),
    (50_000, Segment::TempBool),
    (60_000, Segment::ConstInt),
    (70_000, Segment::ConstFloat),
    (80_000, Segment::ConstString),
    (90_000, Segment::LocalInt),
    (100_000, Segment::LocalFloat),
];

/// First address past the last segment.
pub const ADDRESS_LIMIT: u32 = 110_000;

/// Check that [`LAYOUT`] is ordered like [`Segment`], strictly ascending,
/// and ends below [`ADDRESS_LIMIT`].
///
/// Panics on violation: a broken layout is a build defect, not a user error.
pub fn verify_layout() {
    for (index, (base, segment)) in LAYOUT.iter().enumerate() {
        assert_eq!(
            Segment::ALL[index],
            *segment,
            "segment layout out of order at entry {}",
            index
        );
        let next = LAYOUT
            .get(index + 1)
            .map(|(next, _)| *next)
            .unwrap_or(ADDRESS_LIMIT);
        assert!(
            *base < next,
            "segment {} overlaps its successor",
            segment.name()
        );
    }
}

impl Segment {
    /// All segments in address order.
    pub const ALL: [Segment; 11] = [
        Segment::GlobalVoid,
        Segment::GlobalInt,
        Segment::GlobalFloat,
        Segment::TempInt,
        Segment::TempFloat,
        Segment::TempBool,
        Segment::ConstInt,
        Segment::ConstFloat,
        Segment::ConstString,
        Segment::LocalInt,
        Segment::LocalFloat,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// First address of this segment.
    pub fn base(self) -> u32 {
        LAYOUT[self.index()].0
    }

    /// First address past the end of this segment.
    pub fn limit(self) -> u32 {
        LAYOUT
            .get(self.index() + 1)
            .map(|(base, _)| *base)
            .unwrap_or(ADDRESS_LIMIT)
    }

    /// Number of addresses this segment can hold.
    pub fn capacity(self) -> u32 {
        self.limit() - self.base()
    }

    /// Decode the segment of an address, or `None` if it lies outside every range.
    pub fn decode(address: Address) -> Option<Segment> {
        let raw = address.value();
        if raw >= ADDRESS_LIMIT {
            return None;
        }
        LAYOUT
            .iter()
            .rev()
            .find(|(base, _)| *base <= raw)
            .map(|(_, segment)| *segment)
    }

    /// Zero-based slot of an address inside this segment.
    pub fn offset_of(self, address: Address) -> usize {
        (address.value() - self.base()) as usize
    }

    /// Address of the given slot inside this segment.
    pub fn address_at(self, offset: u32) -> Address {
        Address::new(self.base() + offset)
    }

    /// Storage class of this segment.
    pub fn storage_class(self) -> StorageClass {
        match self {
            Segment::GlobalVoid | Segment::GlobalInt | Segment::GlobalFloat => StorageClass::Global,
            Segment::TempInt | Segment::TempFloat | Segment::TempBool => StorageClass::Temporary,
            Segment::ConstInt | Segment::ConstFloat | Segment::ConstString => {
                StorageClass::Constant
            }
            Segment::LocalInt | Segment::LocalFloat => StorageClass::Local,
        }
    }

    /// Type of the values stored in this segment.
    pub fn data_type(self) -> DataType {
        match self {
            Segment::GlobalVoid => DataType::Void,
            Segment::GlobalInt | Segment::TempInt | Segment::ConstInt | Segment::LocalInt => {
                DataType::Int
            }
            Segment::GlobalFloat
            | Segment::TempFloat
            | Segment::ConstFloat
            | Segment::LocalFloat => DataType::Float,
            Segment::TempBool => DataType::Bool,
            Segment::ConstString => DataType::String,
        }
    }

    /// Global segment for variables of the given type.
    pub fn global_for(data_type: DataType) -> Option<Segment> {
        match data_type {
            DataType::Int => Some(Segment::GlobalInt),
            DataType::Float => Some(Segment::GlobalFloat),
            DataType::Void => Some(Segment::GlobalVoid),
            _ => None,
        }
    }

    /// Local segment for variables of the given type.
    pub fn local_for(data_type: DataType) -> Option<Segment> {
        match data_type {
            DataType::Int => Some(Segment::LocalInt),
            DataType::Float => Some(Segment::LocalFloat),
            _ => None,
        }
    }

    /// Temporary segment for expression results of the given type.
    pub fn temp_for(data_type: DataType) -> Option<Segment> {
        match data_type {
            DataType::Int => Some(Segment::TempInt),
            DataType::Float => Some(Segment::TempFloat),
            DataType::Bool => Some(Segment::TempBool),
            _ => None,
        }
    }

    /// Name used in descriptors and diagnostics, e.g. `global-int`.
    pub fn name(self) -> &'static str {
        match self {
            Segment::GlobalVoid => "global-void",
            Segment::GlobalInt => "global-int",
            Segment::GlobalFloat => "global-float",
            Segment::TempInt => "temp-int",
            Segment::TempFloat => "temp-float",
            Segment::TempBool => "temp-bool",
            Segment::ConstInt => "const-int",
            Segment::ConstFloat => "const-float",
            Segment::ConstString => "const-string",
            Segment::LocalInt => "local-int",
            Segment::LocalFloat => "local-float",
        }
    }

    /// Parse a segment name produced by [`Segment::name`].
    pub fn from_name(name: &str) -> Option<Segment> {
        Segment::ALL.into_iter().find(|segment| segment.name() == name)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
