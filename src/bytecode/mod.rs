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

//! Bytecode module for the Ente toolchain.
//!
//! This module persists compiled programs as line-oriented text so that
//! compiling and executing can happen in separate runs:
//! - `%descriptor` section with segment sizes and one block per function
//! - `%constants` section with one `<address> <literal>` line per literal
//! - `%quadruples` section with one `<opcode> <arg1> <arg2> <result>` line
//!   per instruction, `-1` marking unused fields

mod reader;
mod writer;

pub use reader::read_ir;
pub use writer::write_ir;

use std::path::Path;
use thiserror::Error;

use crate::ir::CompiledProgram;

/// Default file extension of compiled programs.
pub const IR_EXTENSION: &str = "eir";

pub(crate) const DESCRIPTOR: &str = "%descriptor";
pub(crate) const END_DESCRIPTOR: &str = "%enddescriptor";
pub(crate) const FUNCTION: &str = "%function";
pub(crate) const END_FUNCTION: &str = "%endfunction";
pub(crate) const CONSTANTS: &str = "%constants";
pub(crate) const QUADRUPLES: &str = "%quadruples";

/// Errors raised while loading compiled programs.
#[derive(Debug, Error)]
pub enum BytecodeError {
    #[error("missing section '{0}'")]
    MissingSection(&'static str),

    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("line {line}: unknown opcode {code}")]
    UnknownOpcode { line: usize, code: i64 },

    #[error("line {line}: invalid constant: {reason}")]
    InvalidConstant { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write a compiled program to a file.
pub fn write_ir_file(program: &CompiledProgram, path: &Path) -> Result<(), BytecodeError> {
    std::fs::write(path, write_ir(program))?;
    Ok(())
}

/// Load a compiled program from a file.
pub fn read_ir_file(path: &Path) -> Result<CompiledProgram, BytecodeError> {
    let text = std::fs::read_to_string(path)?;
    read_ir(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::translator::translate;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> CompiledProgram {
        translate(&tokenize(source).tokens).unwrap()
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let program = compile(
            "var a: int; var f: float;
            void show(x: float) { write(x, \"done\\n\"); }
            main {
                a = 3;
                f = a / 7 + 0.1;
                if (f > 0.5) { show(f); } else { show(-1.25e3); }
            }
            end",
        );

        let text = write_ir(&program);
        let loaded = read_ir(&text).unwrap();
        assert_eq!(loaded, program);
        assert_eq!(write_ir(&loaded), text);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("demo.{}", IR_EXTENSION));
        let program = compile("main { write(1.5); } end");

        write_ir_file(&program, &path).unwrap();
        assert_eq!(read_ir_file(&path).unwrap(), program);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_ir_file(&dir.path().join("absent.eir"));
        assert!(matches!(result, Err(BytecodeError::Io(_))));
    }
}
