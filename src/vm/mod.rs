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

//! Virtual machine for compiled Ente programs.
//!
//! A fetch-decode-execute loop over the quadruple sequence. The
//! instruction pointer starts at 0 and execution ends once it moves past
//! the last quadruple. Calls use a stack of activation records plus a
//! separate stack of return indices.

mod error;
mod memory;
mod operations;
mod value;

pub use error::RuntimeError;
pub use memory::{ActivationRecord, RuntimeMemory};
pub use value::Value;

use std::io::Write;

use crate::ir::{CompiledProgram, Operator, Quadruple, QuadrupleIndex, Target};
use crate::memory::Address;
use operations::{evaluate, OperationFault};

/// Execution settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmOptions {
    /// Maximum number of quadruples to execute; `None` runs until the end.
    pub step_budget: Option<u64>,
}

/// Destination of printed values.
pub trait OutputSink {
    /// Emit one printed value.
    fn emit(&mut self, text: &str) -> std::io::Result<()>;
}

impl OutputSink for Vec<String> {
    fn emit(&mut self, text: &str) -> std::io::Result<()> {
        self.push(text.to_string());
        Ok(())
    }
}

/// Prints each value on its own line to a writer.
pub struct WriteSink<W: Write>(pub W);

impl<W: Write> OutputSink for WriteSink<W> {
    fn emit(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.0, "{}", text)
    }
}

/// Observable result of executing a program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    /// Printed values, in order.
    pub output: Vec<String>,
    /// The fatal error that stopped execution, if any.
    pub error: Option<RuntimeError>,
    /// Number of quadruples executed.
    pub steps: u64,
}

impl Execution {
    /// Check if the program ran to completion.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The virtual machine state.
pub struct VirtualMachine<'p> {
    program: &'p CompiledProgram,
    memory: RuntimeMemory,
    returns: Vec<QuadrupleIndex>,
    ip: usize,
    steps: u64,
    options: VmOptions,
}

impl<'p> VirtualMachine<'p> {
    /// Create a machine with memory sized for `program`.
    pub fn new(program: &'p CompiledProgram, options: VmOptions) -> Self {
        Self {
            program,
            memory: RuntimeMemory::new(program),
            returns: Vec::new(),
            ip: 0,
            steps: 0,
            options,
        }
    }

    /// Number of quadruples executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of active activation records.
    pub fn call_depth(&self) -> usize {
        self.memory.depth()
    }

    /// Run until the program ends or fails.
    ///
    /// On failure every activation record is discarded before the error
    /// is returned.
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> Result<(), RuntimeError> {
        let result = self.run_loop(sink);
        if let Err(err) = &result {
            log::debug!("execution failed: {}", err);
            self.memory.unwind();
            self.returns.clear();
        }
        result
    }

    fn run_loop(&mut self, sink: &mut dyn OutputSink) -> Result<(), RuntimeError> {
        let program = self.program;

        while let Some(quadruple) = program.quadruples.get(QuadrupleIndex::new(self.ip)) {
            let at = QuadrupleIndex::new(self.ip);

            if let Some(budget) = self.options.step_budget {
                if self.steps >= budget {
                    return Err(RuntimeError::ExecutionBudgetExceeded { at, budget });
                }
            }
            self.steps += 1;

            log::trace!("exec {:>4} {}", at, quadruple);
            self.ip = self.step(at, quadruple, sink)?.value();
        }

        log::info!("execution finished after {} steps", self.steps);
        Ok(())
    }

    /// Execute one quadruple and return the index of the next one.
    fn step(
        &mut self,
        at: QuadrupleIndex,
        quadruple: &Quadruple,
        sink: &mut dyn OutputSink,
    ) -> Result<QuadrupleIndex, RuntimeError> {
        let next = at.next();
        let operator = quadruple.operator;

        match operator {
            Operator::Goto => jump_target(at, quadruple),
            Operator::GotoF | Operator::GotoT => {
                let condition = self.read(at, first_operand(at, quadruple)?)?.is_truthy();
                let jump_when = operator == Operator::GotoT;
                if condition == jump_when {
                    jump_target(at, quadruple)
                } else {
                    Ok(next)
                }
            }
            Operator::Era => {
                let entry = jump_target(at, quadruple)?;
                let frame = self
                    .program
                    .descriptor
                    .frame(entry)
                    .ok_or(RuntimeError::UnknownFunction { at, entry })?;
                self.memory.stage(frame);
                Ok(next)
            }
            Operator::Param => {
                let value = self.read(at, first_operand(at, quadruple)?)?;
                let address = result_address(at, quadruple)?;
                self.memory
                    .write_staged(address, value)
                    .map_err(|fault| fault.at(at))?;
                Ok(next)
            }
            Operator::Gosub => {
                let entry = jump_target(at, quadruple)?;
                self.memory.activate().map_err(|fault| fault.at(at))?;
                self.returns.push(next);
                Ok(entry)
            }
            Operator::EndFunc => {
                let back = self
                    .returns
                    .pop()
                    .ok_or(RuntimeError::CallStackUnderflow { at })?;
                self.memory.pop_frame();
                Ok(back)
            }
            Operator::Print => {
                let value = self.read(at, first_operand(at, quadruple)?)?;
                sink.emit(&value.to_string())
                    .map_err(|err| RuntimeError::Output {
                        at,
                        message: err.to_string(),
                    })?;
                Ok(next)
            }
            Operator::Assign => {
                let value = self.read(at, first_operand(at, quadruple)?)?;
                self.write(at, result_address(at, quadruple)?, value)?;
                Ok(next)
            }
            _ => {
                let left = self.read(at, first_operand(at, quadruple)?)?;
                let right_address = quadruple
                    .arg2
                    .ok_or(RuntimeError::UnsupportedOperator { at, operator })?;
                let right = self.read(at, right_address)?;

                let value = evaluate(operator, &left, &right).map_err(|fault| match fault {
                    OperationFault::DivisionByZero => RuntimeError::DivisionByZero { at },
                    OperationFault::Unsupported => {
                        RuntimeError::UnsupportedOperator { at, operator }
                    }
                })?;
                self.write(at, result_address(at, quadruple)?, value)?;
                Ok(next)
            }
        }
    }

    fn read(&self, at: QuadrupleIndex, address: Address) -> Result<Value, RuntimeError> {
        self.memory
            .read(address)
            .cloned()
            .map_err(|fault| fault.at(at))
    }

    fn write(&mut self, at: QuadrupleIndex, address: Address, value: Value) -> Result<(), RuntimeError> {
        self.memory
            .write(address, value)
            .map_err(|fault| fault.at(at))
    }
}

fn first_operand(at: QuadrupleIndex, quadruple: &Quadruple) -> Result<Address, RuntimeError> {
    quadruple.arg1.ok_or(RuntimeError::UnsupportedOperator {
        at,
        operator: quadruple.operator,
    })
}

fn result_address(at: QuadrupleIndex, quadruple: &Quadruple) -> Result<Address, RuntimeError> {
    quadruple.result.address().ok_or(RuntimeError::UnsupportedOperator {
        at,
        operator: quadruple.operator,
    })
}

fn jump_target(at: QuadrupleIndex, quadruple: &Quadruple) -> Result<QuadrupleIndex, RuntimeError> {
    match quadruple.result {
        Target::Jump(index) => Ok(index),
        _ => Err(RuntimeError::UnsupportedOperator {
            at,
            operator: quadruple.operator,
        }),
    }
}

/// Execute a program, collecting its output.
pub fn execute(program: &CompiledProgram, options: VmOptions) -> Execution {
    let mut vm = VirtualMachine::new(program, options);
    let mut output = Vec::new();
    let error = vm.run(&mut output).err();
    Execution {
        output,
        error,
        steps: vm.steps(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::translator::translate;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Execution {
        let program = translate(&tokenize(source).tokens).unwrap();
        execute(&program, VmOptions::default())
    }

    fn output(source: &str) -> Vec<String> {
        let execution = run(source);
        assert_eq!(execution.error, None);
        execution.output
    }

    // ========================================
    // Basic Execution Tests
    // ========================================

    #[test]
    fn test_write_literal() {
        assert_eq!(output("main { write(42); } end"), vec!["42"]);
        assert_eq!(output("main { write(\"hello world\"); } end"), vec!["hello world"]);
        assert_eq!(output("main { write(-2.5); } end"), vec!["-2.5"]);
    }

    #[test]
    fn test_write_several_values() {
        assert_eq!(output("main { printf(1, 2.0, \"x\"); } end"), vec!["1", "2.0", "x"]);
    }

    #[test]
    fn test_division_prints_float() {
        assert_eq!(output("main { write(4 / 2); } end"), vec!["2.0"]);
        assert_eq!(output("main { write(7 / 2); } end"), vec!["3.5"]);
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(output("main { write(2 + 3 * 4 - (1 + 1)); } end"), vec!["12"]);
        assert_eq!(output("main { write(10 - 4 - 3); } end"), vec!["3"]);
    }

    #[test]
    fn test_comparison_prints_bool() {
        assert_eq!(output("main { write(1 < 2, 2 <= 1); } end"), vec!["true", "false"]);
    }

    #[test]
    fn test_widening_assignment() {
        let source = "var a: int; var f: float; main { a = 3; f = a; write(f); } end";
        assert_eq!(output(source), vec!["3.0"]);
    }

    // ========================================
    // Control Flow Tests
    // ========================================

    #[test]
    fn test_if_else_takes_one_branch() {
        let source = "main { if (1 > 2) { write(1); } else { write(2); } } end";
        assert_eq!(output(source), vec!["2"]);
        let source = "main { if (2 > 1) { write(1); } else { write(2); } } end";
        assert_eq!(output(source), vec!["1"]);
    }

    #[test]
    fn test_while_runs_exact_count() {
        let source = "var i: int;
            main {
                i = 0;
                while (i < 3) { write(i); i = i + 1; }
            }
            end";
        assert_eq!(output(source), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_do_while_runs_at_least_once() {
        let source = "var i: int;
            main {
                i = 10;
                do { write(i); i = i + 1; } while (i < 3);
            }
            end";
        assert_eq!(output(source), vec!["10"]);
    }

    // ========================================
    // Function Call Tests
    // ========================================

    #[test]
    fn test_call_with_arguments() {
        let source = "var total: float;
            void add(a: int, b: float) {
                total = a + b;
            }
            main {
                add(2, 0.5);
                write(total);
            }
            end";
        assert_eq!(output(source), vec!["2.5"]);
    }

    #[test]
    fn test_recursive_calls_keep_separate_frames() {
        let source = "void countdown(n: int) {
                if (n > 0) {
                    write(n);
                    countdown(n - 1);
                    write(n);
                }
            }
            main { countdown(3); } end";
        assert_eq!(output(source), vec!["3", "2", "1", "1", "2", "3"]);
    }

    #[test]
    fn test_nested_calls() {
        let source = "var r: int;
            void inner(x: int) { r = x * 2; }
            void outer(y: int) { inner(y + 1); r = r + 100; }
            main { outer(4); write(r); } end";
        assert_eq!(output(source), vec!["110"]);
    }

    #[test]
    fn test_call_depth_returns_to_zero() {
        let program = translate(
            &tokenize("void f() { write(1); } main { f(); f(); } end").tokens,
        )
        .unwrap();
        let mut vm = VirtualMachine::new(&program, VmOptions::default());
        let mut out = Vec::new();
        vm.run(&mut out).unwrap();
        assert_eq!(vm.call_depth(), 0);
        assert_eq!(out, vec!["1", "1"]);
    }

    // ========================================
    // Runtime Error Tests
    // ========================================

    #[test]
    fn test_division_by_zero() {
        let execution = run("main { write(1); write(1 / 0); } end");
        assert_eq!(execution.output, vec!["1"]);
        assert!(matches!(execution.error, Some(RuntimeError::DivisionByZero { .. })));
    }

    #[test]
    fn test_uninitialized_read() {
        let execution = run("var a: int; main { write(a); } end");
        assert!(matches!(
            execution.error,
            Some(RuntimeError::UninitializedRead { address, .. }) if address == Address::new(10_000)
        ));
    }

    #[test]
    fn test_step_budget() {
        let program =
            translate(&tokenize("main { while (1 < 2) { } } end").tokens).unwrap();
        let execution = execute(
            &program,
            VmOptions {
                step_budget: Some(50),
            },
        );
        assert_eq!(execution.steps, 50);
        assert!(matches!(
            execution.error,
            Some(RuntimeError::ExecutionBudgetExceeded { budget: 50, .. })
        ));
    }

    #[test]
    fn test_error_inside_call_unwinds() {
        let program = translate(
            &tokenize("void f(x: int) { write(x / 0); } main { f(1); } end").tokens,
        )
        .unwrap();
        let mut vm = VirtualMachine::new(&program, VmOptions::default());
        let result = vm.run(&mut Vec::new());
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
        assert_eq!(vm.call_depth(), 0);
    }

    #[test]
    fn test_endfunc_without_call() {
        let program = CompiledProgram {
            quadruples: vec![Quadruple::new(Operator::EndFunc, None, None, Target::Unset)].into(),
            ..CompiledProgram::default()
        };
        let execution = execute(&program, VmOptions::default());
        assert_eq!(
            execution.error,
            Some(RuntimeError::CallStackUnderflow {
                at: QuadrupleIndex::new(0)
            })
        );
    }

    #[test]
    fn test_era_for_unknown_function() {
        let program = CompiledProgram {
            quadruples: vec![Quadruple::new(
                Operator::Era,
                None,
                None,
                Target::Jump(QuadrupleIndex::new(5)),
            )]
            .into(),
            ..CompiledProgram::default()
        };
        let execution = execute(&program, VmOptions::default());
        assert!(matches!(
            execution.error,
            Some(RuntimeError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_write_sink_prints_lines() {
        let program = translate(&tokenize("main { write(1, \"a\"); } end").tokens).unwrap();
        let mut sink = WriteSink(Vec::new());
        VirtualMachine::new(&program, VmOptions::default())
            .run(&mut sink)
            .unwrap();
        assert_eq!(String::from_utf8(sink.0).unwrap(), "1\na\n");
    }
}
