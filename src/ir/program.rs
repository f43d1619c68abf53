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

//! A translated program: everything the virtual machine needs to run.

use super::quadruple::QuadrupleStore;
use crate::memory::{ConstantTable, MemoryDescriptor, SegmentSizes};

/// Output of translation and input of execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledProgram {
    /// Segment sizes for global storage and every function frame.
    pub descriptor: MemoryDescriptor,
    /// Interned literals, preloaded before execution.
    pub constants: ConstantTable,
    /// The instruction sequence.
    pub quadruples: QuadrupleStore,
}

impl CompiledProgram {
    /// Render a human-readable listing of all three sections.
    pub fn listing(&self) -> String {
        let mut out = String::new();

        out.push_str("Segments:\n");
        for segment in SegmentSizes::segments() {
            let size = self.descriptor.globals.get(segment);
            if size > 0 {
                out.push_str(&format!("  {:<13} {}\n", segment.name(), size));
            }
        }
        for frame in &self.descriptor.functions {
            out.push_str(&format!(
                "  function {} @ {}: local-int {}, local-float {}\n",
                frame.name, frame.entry, frame.locals.int, frame.locals.float
            ));
        }

        out.push_str("Constants:\n");
        for constant in self.constants.iter() {
            out.push_str(&format!("  {} = {}\n", constant.address, constant.value));
        }

        out.push_str("Quadruples:\n");
        for line in self.quadruples.to_string().lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
