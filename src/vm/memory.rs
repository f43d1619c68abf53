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

//! Run-time memory.
//!
//! Program-wide segments are allocated once, sized from the descriptor,
//! with the constant segments preloaded. Local segments live in
//! activation records: ERA stages a record, GOSUB activates it and
//! ENDFUNC discards it.

use super::error::MemoryFault;
use super::value::Value;
use crate::ir::{CompiledProgram, QuadrupleIndex};
use crate::memory::{verify_layout, Address, FunctionFrame, Segment, SegmentSizes, StorageClass};
use crate::semantic::DataType;

type Cells = Vec<Option<Value>>;

/// Local storage of one function invocation.
#[derive(Debug, Clone)]
pub struct ActivationRecord {
    /// Entry quadruple of the function this record belongs to.
    pub entry: QuadrupleIndex,
    int: Cells,
    float: Cells,
}

impl ActivationRecord {
    /// Create a record sized for the given frame layout.
    pub fn new(frame: &FunctionFrame) -> Self {
        Self {
            entry: frame.entry,
            int: vec![None; frame.locals.int as usize],
            float: vec![None; frame.locals.float as usize],
        }
    }

    fn cells(&self, segment: Segment) -> &Cells {
        match segment {
            Segment::LocalFloat => &self.float,
            _ => &self.int,
        }
    }

    fn cells_mut(&mut self, segment: Segment) -> &mut Cells {
        match segment {
            Segment::LocalFloat => &mut self.float,
            _ => &mut self.int,
        }
    }
}

/// Typed segmented storage of a running program.
#[derive(Debug)]
pub struct RuntimeMemory {
    globals: Vec<Cells>,
    frames: Vec<ActivationRecord>,
    staged: Vec<ActivationRecord>,
}

impl RuntimeMemory {
    /// Allocate storage for a program and preload its constants.
    pub fn new(program: &CompiledProgram) -> Self {
        verify_layout();

        let mut globals: Vec<Cells> = SegmentSizes::segments()
            .map(|segment| vec![None; program.descriptor.globals.get(segment) as usize])
            .collect();

        for constant in program.constants.iter() {
            let Some(segment) = constant.address.segment() else {
                continue;
            };
            let cells = &mut globals[segment as usize];
            let offset = segment.offset_of(constant.address);
            if offset >= cells.len() {
                cells.resize(offset + 1, None);
            }
            cells[offset] = Some(Value::from(&constant.value));
        }

        Self {
            globals,
            frames: Vec::new(),
            staged: Vec::new(),
        }
    }

    /// Read the value at an address.
    pub(crate) fn read(&self, address: Address) -> Result<&Value, MemoryFault> {
        let segment = address.segment().ok_or(MemoryFault::OutOfRange(address))?;
        let cells = match segment.storage_class() {
            StorageClass::Local => self
                .frames
                .last()
                .ok_or(MemoryFault::NoActivationRecord)?
                .cells(segment),
            _ => &self.globals[segment as usize],
        };

        let value = cells
            .get(segment.offset_of(address))
            .ok_or(MemoryFault::OutOfRange(address))?
            .as_ref()
            .ok_or(MemoryFault::Uninitialized(address))?;
        check_tag(segment, address, value)?;
        Ok(value)
    }

    /// Write a value, widening ints stored into float segments.
    pub(crate) fn write(&mut self, address: Address, value: Value) -> Result<(), MemoryFault> {
        let segment = address.segment().ok_or(MemoryFault::OutOfRange(address))?;
        let value = coerce(segment, address, value)?;

        let cells = match segment.storage_class() {
            StorageClass::Constant => return Err(MemoryFault::OutOfRange(address)),
            StorageClass::Local => self
                .frames
                .last_mut()
                .ok_or(MemoryFault::NoActivationRecord)?
                .cells_mut(segment),
            _ => &mut self.globals[segment as usize],
        };

        let cell = cells
            .get_mut(segment.offset_of(address))
            .ok_or(MemoryFault::OutOfRange(address))?;
        *cell = Some(value);
        Ok(())
    }

    /// Write an argument into the most recently staged record.
    pub(crate) fn write_staged(
        &mut self,
        address: Address,
        value: Value,
    ) -> Result<(), MemoryFault> {
        let segment = address
            .segment()
            .filter(|segment| segment.storage_class() == StorageClass::Local)
            .ok_or(MemoryFault::OutOfRange(address))?;
        let value = coerce(segment, address, value)?;

        let record = self
            .staged
            .last_mut()
            .ok_or(MemoryFault::NoActivationRecord)?;
        let cell = record
            .cells_mut(segment)
            .get_mut(segment.offset_of(address))
            .ok_or(MemoryFault::OutOfRange(address))?;
        *cell = Some(value);
        Ok(())
    }

    /// Prepare a record for a call whose arguments are about to be passed.
    pub fn stage(&mut self, frame: &FunctionFrame) {
        log::debug!("stage frame for {} (entry {})", frame.name, frame.entry);
        self.staged.push(ActivationRecord::new(frame));
    }

    /// Make the most recently staged record the active one.
    pub(crate) fn activate(&mut self) -> Result<(), MemoryFault> {
        let record = self.staged.pop().ok_or(MemoryFault::NoActivationRecord)?;
        self.frames.push(record);
        log::debug!("push frame, depth {}", self.frames.len());
        Ok(())
    }

    /// Discard the active record.
    pub fn pop_frame(&mut self) -> Option<ActivationRecord> {
        let record = self.frames.pop();
        log::debug!("pop frame, depth {}", self.frames.len());
        record
    }

    /// Number of active records.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of staged records.
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    /// Drop every active and staged record.
    pub fn unwind(&mut self) {
        if !self.frames.is_empty() || !self.staged.is_empty() {
            log::debug!(
                "unwinding {} frames and {} staged records",
                self.frames.len(),
                self.staged.len()
            );
        }
        self.frames.clear();
        self.staged.clear();
    }
}

fn coerce(segment: Segment, address: Address, value: Value) -> Result<Value, MemoryFault> {
    match (segment.data_type(), value) {
        (DataType::Float, Value::Int(value)) => Ok(Value::Float(value as f64)),
        (DataType::Int, value @ Value::Int(_))
        | (DataType::Float, value @ Value::Float(_))
        | (DataType::Bool, value @ Value::Bool(_)) => Ok(value),
        (expected, value) => Err(MemoryFault::TypeConfusion {
            address,
            expected,
            found: value.type_name(),
        }),
    }
}

fn check_tag(segment: Segment, address: Address, value: &Value) -> Result<(), MemoryFault> {
    let matches = matches!(
        (segment.data_type(), value),
        (DataType::Int, Value::Int(_))
            | (DataType::Float, Value::Float(_))
            | (DataType::Bool, Value::Bool(_))
            | (DataType::String, Value::Str(_))
    );
    if matches {
        Ok(())
    } else {
        Err(MemoryFault::TypeConfusion {
            address,
            expected: segment.data_type(),
            found: value.type_name(),
        })
    }
}
