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

//! Compile-time address assignment.
//!
//! Each segment has its own cursor that only moves forward. Program-wide
//! segments share one set of cursors; local segments get a fresh pair per
//! function key. Literals are interned so equal values share one address.

use std::collections::HashMap;
use thiserror::Error;

use super::constants::{ConstantTable, ConstantValue};
use super::descriptor::{LocalSizes, SegmentSizes};
use super::segments::{verify_layout, Address, Segment, StorageClass};

/// A segment ran out of addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("segment {segment} is full: all {capacity} addresses are in use")]
pub struct SegmentOverflow {
    pub segment: Segment,
    pub capacity: u32,
}

/// Hands out addresses during translation.
#[derive(Debug)]
pub struct MemoryAssigner {
    globals: SegmentSizes,
    locals: Vec<(String, LocalSizes)>,
    interned: HashMap<ConstantValue, Address>,
    constants: ConstantTable,
}

impl MemoryAssigner {
    /// Create an assigner with every cursor at its segment base.
    pub fn new() -> Self {
        verify_layout();
        Self {
            globals: SegmentSizes::default(),
            locals: Vec::new(),
            interned: HashMap::new(),
            constants: ConstantTable::new(),
        }
    }

    /// Assign the next address of a global or temporary segment.
    pub fn assign(&mut self, segment: Segment) -> Result<Address, SegmentOverflow> {
        assert!(
            matches!(
                segment.storage_class(),
                StorageClass::Global | StorageClass::Temporary
            ),
            "{} is not assigned through assign()",
            segment
        );
        let used = self.globals.get(segment);
        let address = bump(segment, used)?;
        self.globals.set(segment, used + 1);
        Ok(address)
    }

    /// Return the address of a literal, assigning one on first use.
    pub fn intern(&mut self, value: ConstantValue) -> Result<Address, SegmentOverflow> {
        if let Some(address) = self.interned.get(&value) {
            return Ok(*address);
        }

        let segment = value.segment();
        let used = self.globals.get(segment);
        let address = bump(segment, used)?;
        self.globals.set(segment, used + 1);

        log::trace!("Interned {} at {}", value, address);
        self.interned.insert(value.clone(), address);
        self.constants.insert(address, value);
        Ok(address)
    }

    /// Register a local scope key so it shows up in the output even without locals.
    pub fn open_local_scope(&mut self, scope_key: &str) {
        if !self.locals.iter().any(|(key, _)| key == scope_key) {
            self.locals.push((scope_key.to_string(), LocalSizes::default()));
        }
    }

    /// Assign the next address of a local segment owned by `scope_key`.
    pub fn assign_local(
        &mut self,
        scope_key: &str,
        segment: Segment,
    ) -> Result<Address, SegmentOverflow> {
        assert!(
            segment.storage_class() == StorageClass::Local,
            "{} is not a local segment",
            segment
        );
        self.open_local_scope(scope_key);
        let sizes = self
            .locals
            .iter_mut()
            .find(|(key, _)| key == scope_key)
            .map(|(_, sizes)| sizes)
            .expect("local scope was just opened");

        let used = sizes.get_mut(segment);
        let address = bump(segment, *used)?;
        *used += 1;
        Ok(address)
    }

    /// Sizes of the program-wide segments.
    pub fn global_sizes(&self) -> SegmentSizes {
        self.globals
    }

    /// Sizes of the local segments of one scope key.
    pub fn local_sizes(&self, scope_key: &str) -> LocalSizes {
        self.locals
            .iter()
            .find(|(key, _)| key == scope_key)
            .map(|(_, sizes)| *sizes)
            .unwrap_or_default()
    }

    /// Every local scope key with its sizes, in the order they were opened.
    pub fn local_scopes(&self) -> impl Iterator<Item = (&str, LocalSizes)> {
        self.locals.iter().map(|(key, sizes)| (key.as_str(), *sizes))
    }

    /// The interned literals.
    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Consume the assigner, returning sizes and constants.
    pub fn output(self) -> (SegmentSizes, Vec<(String, LocalSizes)>, ConstantTable) {
        (self.globals, self.locals, self.constants)
    }
}

impl Default for MemoryAssigner {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(segment: Segment, used: u32) -> Result<Address, SegmentOverflow> {
    if used >= segment.capacity() {
        return Err(SegmentOverflow {
            segment,
            capacity: segment.capacity(),
        });
    }
    Ok(segment.address_at(used))
}
