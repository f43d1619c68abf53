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

//! Memory descriptor: the segment sizes a program needs at run time.
//!
//! The translator fills a [`MemoryDescriptor`] from the cursors of the
//! [`MemoryAssigner`](super::MemoryAssigner); the virtual machine uses it
//! to pre-size global storage and every activation record.

use super::segments::{Segment, StorageClass};
use crate::ir::QuadrupleIndex;

/// Sizes of the program-wide segments (everything except the local ones).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentSizes {
    sizes: [u32; 9],
}

impl SegmentSizes {
    /// The segments covered by this record, in layout order.
    pub fn segments() -> impl Iterator<Item = Segment> {
        Segment::ALL
            .into_iter()
            .filter(|segment| segment.storage_class() != StorageClass::Local)
    }

    /// Size of a program-wide segment.
    ///
    /// Panics when asked for a local segment; those live in [`LocalSizes`].
    pub fn get(&self, segment: Segment) -> u32 {
        self.sizes[Self::slot(segment)]
    }

    /// Set the size of a program-wide segment.
    pub fn set(&mut self, segment: Segment, size: u32) {
        self.sizes[Self::slot(segment)] = size;
    }

    fn slot(segment: Segment) -> usize {
        assert!(
            segment.storage_class() != StorageClass::Local,
            "{} is sized per activation record",
            segment
        );
        segment as usize
    }
}

/// Sizes of the local segments of one function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalSizes {
    pub int: u32,
    pub float: u32,
}

impl LocalSizes {
    /// Size of a local segment.
    pub fn get(&self, segment: Segment) -> u32 {
        match segment {
            Segment::LocalInt => self.int,
            Segment::LocalFloat => self.float,
            other => panic!("{} is not a local segment", other),
        }
    }

    pub(crate) fn get_mut(&mut self, segment: Segment) -> &mut u32 {
        match segment {
            Segment::LocalInt => &mut self.int,
            Segment::LocalFloat => &mut self.float,
            other => panic!("{} is not a local segment", other),
        }
    }
}

/// Activation record layout of one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFrame {
    /// Function name (the key its locals were assigned under).
    pub name: String,
    /// Index of the function's first quadruple; ERA and GOSUB refer to it.
    pub entry: QuadrupleIndex,
    /// Local segment sizes.
    pub locals: LocalSizes,
}

/// Everything the runtime needs to size its memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDescriptor {
    /// Program-wide segment sizes.
    pub globals: SegmentSizes,
    /// One frame layout per declared function, in declaration order.
    pub functions: Vec<FunctionFrame>,
}

impl MemoryDescriptor {
    /// Find the frame layout of the function starting at `entry`.
    pub fn frame(&self, entry: QuadrupleIndex) -> Option<&FunctionFrame> {
        self.functions.iter().find(|frame| frame.entry == entry)
    }

    /// Find the frame layout of a function by name.
    pub fn frame_by_name(&self, name: &str) -> Option<&FunctionFrame> {
        self.functions.iter().find(|frame| frame.name == name)
    }
}
