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

//! Ente Compiler CLI
//!
//! Translates Ente programs to quadruples and runs them on the virtual machine.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ente::bytecode::{read_ir_file, write_ir_file, BytecodeError, IR_EXTENSION};
use ente::error::{format_error, format_warning};
use ente::vm::{VirtualMachine, WriteSink};
use ente::{CompiledProgram, VmOptions};

/// Ente - A single-pass compiler and quadruple VM
#[derive(Parser, Debug)]
#[command(name = "ente")]
#[command(author = "Ente Team")]
#[command(version)]
#[command(about = "A single-pass compiler and quadruple VM for the Ente teaching language")]
#[command(long_about = r#"
Ente translates programs written in a small C-like teaching language into
quadruples (operator, operand, operand, result) and executes them on a
virtual machine with a segmented memory model.

Example usage:
  ente compile fib.ente -o fib.eir
  ente execute fib.eir
  ente run fib.ente
  ente dump fib.ente

Guard against endless loops:
  ente run loop.ente --max-steps 100000
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Stop execution after this many quadruples
    #[arg(long, global = true)]
    max_steps: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a source file and write its IR
    Compile {
        /// Source file to compile
        source: PathBuf,

        /// Output file (defaults to the source name with an .eir extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load an IR file and execute it
    Execute {
        /// IR file written by `ente compile`
        program: PathBuf,
    },
    /// Translate a source file and execute it right away
    Run {
        /// Source file to run
        source: PathBuf,
    },
    /// Print the descriptor, constants and quadruples of a source file
    Dump {
        /// Source file to inspect
        source: PathBuf,
    },
}

const EXIT_COMPILE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_IO: u8 = 3;
const EXIT_RUNTIME: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if cli.verbose {
        println!("Ente Compiler v{}", ente::VERSION);
    }

    let options = VmOptions {
        step_budget: cli.max_steps,
    };

    let result = match &cli.command {
        Command::Compile { source, output } => {
            let output = output
                .clone()
                .unwrap_or_else(|| source.with_extension(IR_EXTENSION));
            compile_command(source, &output, cli.verbose)
        }
        Command::Execute { program } => execute_command(program, options, cli.verbose),
        Command::Run { source } => run_command(source, options, cli.verbose),
        Command::Dump { source } => dump_command(source),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Read a source file and translate it, printing diagnostics.
fn compile_source(path: &Path, verbose: bool) -> Result<CompiledProgram, u8> {
    let source = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", path.display(), e);
            return Err(EXIT_IO);
        }
    };

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");

    if verbose {
        println!("Compiling {}...", path.display());
    }

    let (program, warnings) = match ente::compile_with_warnings(&source) {
        Ok(result) => result,
        Err(e) => {
            eprint!("{}", format_error(&e, &source, Some(filename)));
            return Err(EXIT_COMPILE);
        }
    };

    // Print warnings (they don't prevent translation)
    for warning in &warnings {
        eprint!("{}", format_warning(warning, &source, Some(filename)));
    }

    if verbose {
        println!(
            "Generated {} quadruples and {} constants",
            program.quadruples.len(),
            program.constants.len()
        );
    }

    Ok(program)
}

fn compile_command(source: &Path, output: &Path, verbose: bool) -> Result<(), u8> {
    let program = compile_source(source, verbose)?;

    if verbose {
        println!("Writing {}...", output.display());
    }

    if let Err(e) = write_ir_file(&program, output) {
        eprintln!("Error: Cannot write {}: {}", output.display(), e);
        return Err(EXIT_IO);
    }

    println!(
        "Compiled {} -> {}",
        source.file_name().unwrap_or_default().to_string_lossy(),
        output.display()
    );
    Ok(())
}

fn execute_command(path: &Path, options: VmOptions, verbose: bool) -> Result<(), u8> {
    if verbose {
        println!("Loading {}...", path.display());
    }

    let program = match read_ir_file(path) {
        Ok(program) => program,
        Err(BytecodeError::Io(e)) => {
            eprintln!("Error: Cannot read {}: {}", path.display(), e);
            return Err(EXIT_IO);
        }
        Err(e) => {
            eprintln!("Error: Invalid IR in {}: {}", path.display(), e);
            return Err(EXIT_USAGE);
        }
    };

    run_program(&program, options, verbose)
}

fn run_command(source: &Path, options: VmOptions, verbose: bool) -> Result<(), u8> {
    let program = compile_source(source, verbose)?;
    run_program(&program, options, verbose)
}

fn dump_command(source: &Path) -> Result<(), u8> {
    let program = compile_source(source, false)?;
    print!("{}", program.listing());
    Ok(())
}

/// Execute a program, streaming printed values to stdout.
fn run_program(program: &CompiledProgram, options: VmOptions, verbose: bool) -> Result<(), u8> {
    if verbose {
        println!("Running...");
    }

    let stdout = std::io::stdout();
    let mut sink = WriteSink(stdout.lock());
    let mut vm = VirtualMachine::new(program, options);

    match vm.run(&mut sink) {
        Ok(()) => {
            if verbose {
                println!("Done after {} steps.", vm.steps());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(EXIT_RUNTIME)
        }
    }
}
