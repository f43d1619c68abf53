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

//! Segmented memory model.
//!
//! The address scheme is shared by both halves of the toolchain:
//! - The translator assigns addresses through [`MemoryAssigner`]
//! - The descriptor records how large each segment grew
//! - The virtual machine decodes addresses back into segments
//!
//! An address alone tells which storage class and type a value has.

mod assigner;
mod constants;
mod descriptor;
pub mod segments;

pub use assigner::{MemoryAssigner, SegmentOverflow};
pub use constants::{Constant, ConstantTable, ConstantValue};
pub use descriptor::{FunctionFrame, LocalSizes, MemoryDescriptor, SegmentSizes};
pub use segments::{verify_layout, Address, Segment, StorageClass, ADDRESS_LIMIT, LAYOUT};
