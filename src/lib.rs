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

//! Ente Compiler Library
//!
//! This library provides the components needed to translate Ente source
//! code into quadruples and to execute them on a virtual machine.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`semantic`] - Types, the semantic table, symbols and scopes
//! - [`memory`] - Segmented address space and address assignment
//! - [`ir`] - Operators, quadruples and the compiled program
//! - [`translator`] - Single-pass translation with backpatching
//! - [`bytecode`] - IR text serializer and loader
//! - [`vm`] - Virtual machine with activation records
//!
//! # Example
//!
//! ```
//! use ente::vm::VmOptions;
//!
//! let source = "var n: int; main { n = 6; write(n * 7); } end";
//! let program = ente::compile(source).unwrap();
//! let execution = ente::execute(&program, VmOptions::default());
//! assert_eq!(execution.output, vec!["42"]);
//! ```

pub mod bytecode;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod memory;
pub mod semantic;
pub mod translator;
pub mod vm;

// Re-export commonly used types
pub use error::{format_error, format_warning, CompileError, EnteError, ErrorCode, Result, Span};
pub use ir::CompiledProgram;
pub use lexer::Token;
pub use vm::{Execution, RuntimeError, VmOptions};

/// The version of the Ente toolchain.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the toolchain.
pub const NAME: &str = "Ente";

/// Translate source code into a compiled program.
///
/// Characters the scanner cannot recognize are skipped; use
/// [`compile_with_warnings`] to get them reported.
pub fn compile(source: &str) -> std::result::Result<CompiledProgram, CompileError> {
    compile_with_warnings(source).map(|(program, _)| program)
}

/// Translate source code and return the scanner warnings alongside the program.
pub fn compile_with_warnings(
    source: &str,
) -> std::result::Result<(CompiledProgram, Vec<CompileError>), CompileError> {
    let stream = lexer::tokenize(source);
    let program = translator::translate(&stream.tokens)?;
    Ok((program, stream.warnings))
}

/// Execute a compiled program.
pub fn execute(program: &CompiledProgram, options: VmOptions) -> Execution {
    vm::execute(program, options)
}

/// Compile and execute source code, returning the printed values.
pub fn run(source: &str, options: VmOptions) -> std::result::Result<Vec<String>, EnteError> {
    let program = compile(source)?;
    let execution = execute(&program, options);
    match execution.error {
        Some(err) => Err(err.into()),
        None => Ok(execution.output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "Ente");
    }

    #[test]
    fn test_run_pipeline() {
        let output = run("main { write(1 + 2); } end", VmOptions::default()).unwrap();
        assert_eq!(output, vec!["3"]);
    }

    #[test]
    fn test_run_reports_compile_error() {
        let err = run("main { write(x); } end", VmOptions::default()).unwrap_err();
        assert!(matches!(err, EnteError::Compile(ref e) if e.code == ErrorCode::UndeclaredSymbol));
    }

    #[test]
    fn test_run_reports_runtime_error() {
        let err = run("main { write(1 / 0); } end", VmOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EnteError::Runtime(RuntimeError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_compile_with_warnings() {
        let (program, warnings) = compile_with_warnings("main { write(1); @ } end").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ErrorCode::InvalidCharacter);
        assert!(!program.quadruples.is_empty());
    }
}
