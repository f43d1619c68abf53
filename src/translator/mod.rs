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

//! Single-pass syntax-directed translator.
//!
//! This module recognizes the grammar by recursive descent and performs
//! all semantic work while doing so: scope tracking, symbol declaration
//! and lookup, type checking and quadruple emission. No syntax tree is
//! built.
//!
//! # Module Structure
//!
//! - `context` - Translation state and auxiliary stacks (TranslationContext)
//! - `control_flow` - if/while/do-while with backpatching (ControlFlowTranslator trait)
//! - `declarations` - Program header, variables, functions (DeclarationTranslator trait)
//! - `expressions` - Operator-precedence expressions (ExpressionTranslator trait)
//! - `helpers` - Token stream navigation and error handling (TranslatorHelpers trait)
//! - `statements` - Blocks, assignment, write, calls (StatementTranslator trait)

// Submodules
pub mod context;
pub mod control_flow;
pub mod declarations;
pub mod expressions;
pub mod helpers;
pub mod statements;

use context::TranslationContext;
use declarations::DeclarationTranslator;
use helpers::TranslatorHelpers;
use statements::StatementTranslator;

use crate::error::{CompileError, ErrorCode};
use crate::ir::{CompiledProgram, Operator};
use crate::lexer::{SpannedToken, Token};
use crate::semantic::ScopeKind;

/// The translator state.
pub struct Translator<'a> {
    /// The token stream to translate.
    pub(crate) tokens: &'a [SpannedToken],
    /// Current position in the token stream.
    pub(crate) position: usize,
    /// Everything the semantic actions read and write.
    pub(crate) context: TranslationContext,
}

impl<'a> Translator<'a> {
    /// Create a new translator for the given token stream.
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Self {
            tokens,
            position: 0,
            context: TranslationContext::new(),
        }
    }

    // ========================================
    // Program Translation
    // ========================================

    /// Translate the complete program.
    ///
    /// Quadruple 0 is a jump to the first instruction of `main`, so the
    /// function bodies can be emitted before it.
    pub fn translate(mut self) -> Result<CompiledProgram, CompileError> {
        let start = self.context.emit_pending_jump(Operator::Goto, None);
        self.context.jumps.push(start);

        self.translate_program_header()?;
        self.translate_vars()?;
        while self.check(&Token::Void) {
            self.translate_function()?;
        }

        self.expect(&Token::Main, "Expected 'main'")?;
        let start = self.context.pop_jump();
        self.context.fill_here(start);

        self.context.scopes.enter("main", ScopeKind::Main);
        self.expect(&Token::LeftBrace, "Expected '{' after 'main'")?;
        self.translate_block_contents()?;
        self.expect(&Token::RightBrace, "Expected '}' after main body")?;
        self.match_token(&Token::Semicolon);
        self.context.scopes.exit();

        self.expect(&Token::End, "Expected 'end' after main")?;
        self.match_token(&Token::Semicolon);

        if let Some(found) = self.peek() {
            let message = format!("Unexpected {} after 'end'", found);
            return Err(self.error(ErrorCode::UnexpectedToken, message));
        }

        let program = self.context.finish();
        log::info!(
            "translated {} quadruples, {} constants, {} functions",
            program.quadruples.len(),
            program.constants.len(),
            program.descriptor.functions.len()
        );
        Ok(program)
    }
}

/// Translate a token stream into a compiled program.
pub fn translate(tokens: &[SpannedToken]) -> Result<CompiledProgram, CompileError> {
    Translator::new(tokens).translate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{QuadrupleIndex, Target};
    use crate::lexer::tokenize;
    use crate::memory::{ConstantValue, LocalSizes, Segment};
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> Result<CompiledProgram, CompileError> {
        let stream = tokenize(source);
        translate(&stream.tokens)
    }

    fn listing(source: &str) -> String {
        compile(source).unwrap().quadruples.to_string()
    }

    fn error_code(source: &str) -> ErrorCode {
        compile(source).unwrap_err().code
    }

    // ========================================
    // Program Structure Tests
    // ========================================

    #[test]
    fn test_minimal_program() {
        let program = compile("program p; main { } end").unwrap();
        assert_eq!(program.quadruples.to_string(), "0: (GOTO, -, -, 1)\n");
    }

    #[test]
    fn test_header_is_optional() {
        assert!(compile("main { write(1); } end;").is_ok());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert_eq!(error_code("main { } end x"), ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_missing_end() {
        assert_eq!(error_code("main { }"), ErrorCode::UnexpectedEndOfFile);
    }

    // ========================================
    // Expression Tests
    // ========================================

    #[test]
    fn test_precedence_and_assignment() {
        let source = "program demo;
            var a, b: int;
            main {
                a = 1;
                b = a + 2 * 3;
                write(b);
            }
            end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 60000, -, 10000)\n\
             2: (MULTIPLY, 60001, 60002, 30000)\n\
             3: (ADD, 10000, 30000, 30001)\n\
             4: (ASSIGN, 30001, -, 10001)\n\
             5: (PRINT, 10001, -, -)\n"
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let source = "var a: int; main { a = 9 - 3 - 2; } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (SUBTRACT, 60000, 60001, 30000)\n\
             2: (SUBTRACT, 30000, 60002, 30001)\n\
             3: (ASSIGN, 30001, -, 10000)\n"
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let source = "var a: int; main { a = (1 + 2) * 3; } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ADD, 60000, 60001, 30000)\n\
             2: (MULTIPLY, 30000, 60002, 30001)\n\
             3: (ASSIGN, 30001, -, 10000)\n"
        );
    }

    #[test]
    fn test_division_yields_float_temporary() {
        let source = "var f: float; main { f = 4 / 2; } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (DIVIDE, 60000, 60001, 40000)\n\
             2: (ASSIGN, 40000, -, 20000)\n"
        );
    }

    #[test]
    fn test_literals_are_interned_once() {
        let program = compile("main { write(7, 7, 7.0, \"7\"); } end").unwrap();
        let constants: Vec<_> = program
            .constants
            .iter()
            .map(|c| (c.address.value(), c.value.clone()))
            .collect();
        assert_eq!(
            constants,
            vec![
                (60_000, ConstantValue::Int(7)),
                (70_000, ConstantValue::Float(7.0)),
                (80_000, ConstantValue::Str("7".into())),
            ]
        );
        assert_eq!(program.quadruples.len(), 5);
    }

    #[test]
    fn test_negative_literal_is_one_constant() {
        let program = compile("var a: int; main { a = -5; } end").unwrap();
        assert_eq!(
            program.constants.get(Segment::ConstInt.address_at(0)),
            Some(&ConstantValue::Int(-5))
        );
        assert_eq!(program.quadruples.len(), 2);
    }

    #[test]
    fn test_negated_variable_subtracts_from_zero() {
        let source = "var a, b: int; main { b = -a; } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (SUBTRACT, 60000, 10000, 30000)\n\
             2: (ASSIGN, 30000, -, 10001)\n"
        );
    }

    #[test]
    fn test_integer_literal_out_of_range() {
        let source = "var a: int; main { a = 99999999999999999999; } end";
        assert_eq!(error_code(source), ErrorCode::MalformedLiteral);
    }

    #[test]
    fn test_most_negative_integer_literal() {
        let program = compile("var a: int; main { a = -9223372036854775808; } end").unwrap();
        assert_eq!(
            program.constants.iter().next().map(|c| c.value.clone()),
            Some(ConstantValue::Int(i64::MIN))
        );
    }

    #[test]
    fn test_chained_comparison_rejected() {
        let source = "var a: int; main { if (1 < 2 < 3) { } } end";
        assert_eq!(error_code(source), ErrorCode::UnexpectedToken);
    }

    // ========================================
    // Type Checking Tests
    // ========================================

    #[test]
    fn test_float_to_int_assignment_rejected() {
        let source = "var a: int; var b: float; main { a = b; } end";
        let err = compile(source).unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
        assert!(err.message.contains("float"));
        assert!(err.message.contains("'a'"));
    }

    #[test]
    fn test_int_to_float_assignment_widens() {
        let source = "var a: int; var b: float; main { b = a; } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n1: (ASSIGN, 10000, -, 20000)\n"
        );
    }

    #[test]
    fn test_string_arithmetic_rejected() {
        let err = compile("var a: int; main { a = \"x\" + 1; } end").unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
        assert_eq!(err.message, "Operator '+' cannot be applied to string and int");
    }

    #[test]
    fn test_comparison_cannot_be_assigned() {
        let source = "var a: int; main { a = 1 < 2; } end";
        assert_eq!(error_code(source), ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let source = "var a: int; main { if (a) { } } end";
        assert_eq!(error_code(source), ErrorCode::NonBooleanCondition);
        let source = "var a: int; main { while (a + 1) { } } end";
        assert_eq!(error_code(source), ErrorCode::NonBooleanCondition);
    }

    // ========================================
    // Declaration Tests
    // ========================================

    #[test]
    fn test_undeclared_symbol_is_named() {
        let err = compile("main { x = 1; } end").unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredSymbol);
        assert!(err.message.contains("'x'"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_duplicate_declaration() {
        assert_eq!(
            error_code("var a: int; var a: float; main { } end"),
            ErrorCode::DuplicateSymbol
        );
        assert_eq!(
            error_code("var a, a: int; main { } end"),
            ErrorCode::DuplicateSymbol
        );
    }

    #[test]
    fn test_string_variable_rejected() {
        assert_eq!(error_code("var s: string; main { } end"), ErrorCode::InvalidType);
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(error_code("var a: main { } end"), ErrorCode::ExpectedType);
    }

    #[test]
    fn test_block_scope_shadows_and_closes() {
        let source = "var a: int;
            main {
                { var a: float; a = 1.5; }
                a = 2;
            }
            end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 70000, -, 20000)\n\
             2: (ASSIGN, 60000, -, 10000)\n"
        );

        let source = "main { { var b: int; } b = 1; } end";
        assert_eq!(error_code(source), ErrorCode::UndeclaredSymbol);
    }

    #[test]
    fn test_var_section_followed_by_assignment() {
        let source = "main { var x: int; x = 1; write(x); } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 60000, -, 10000)\n\
             2: (PRINT, 10000, -, -)\n"
        );

        let source = "void f() { var t: int; t = 3; } main { } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 3)\n\
             1: (ASSIGN, 60000, -, 90000)\n\
             2: (ENDFUNC, -, -, -)\n"
        );
    }

    #[test]
    fn test_var_section_followed_by_call() {
        let source = "void f() { } main { var x: int; f(); } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 2)\n\
             1: (ENDFUNC, -, -, -)\n\
             2: (ERA, -, -, 1)\n\
             3: (GOSUB, -, -, 1)\n"
        );
    }

    #[test]
    fn test_var_groups_continue_after_comma_list() {
        let source = "main { var a, b: int; c: float; a = 1; } end";
        let program = compile(source).unwrap();
        assert_eq!(program.descriptor.globals.get(Segment::GlobalInt), 2);
        assert_eq!(program.descriptor.globals.get(Segment::GlobalFloat), 1);
    }

    #[test]
    fn test_declarations_after_statements_rejected() {
        let source = "var a: int; main { a = 1; var b: int; } end";
        assert_eq!(error_code(source), ErrorCode::UnexpectedToken);
    }

    // ========================================
    // Control Flow Tests
    // ========================================

    #[test]
    fn test_if_else_backpatching() {
        let source = "var x: int;
            main {
                x = 5;
                if (x > 3) { write(1); } else { write(0); }
            }
            end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 60000, -, 10000)\n\
             2: (GREATER_THAN, 10000, 60001, 50000)\n\
             3: (GOTOF, 50000, -, 6)\n\
             4: (PRINT, 60002, -, -)\n\
             5: (GOTO, -, -, 7)\n\
             6: (PRINT, 60003, -, -)\n"
        );
    }

    #[test]
    fn test_if_without_else() {
        let source = "main { if (1 == 1) { write(2); } } end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (EQUAL, 60000, 60000, 50000)\n\
             2: (GOTOF, 50000, -, 4)\n\
             3: (PRINT, 60001, -, -)\n"
        );
    }

    #[test]
    fn test_while_loop() {
        let source = "var i: int;
            main {
                i = 0;
                while (i < 3) { i = i + 1; }
            }
            end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 60000, -, 10000)\n\
             2: (LESS_THAN, 10000, 60001, 50000)\n\
             3: (GOTOF, 50000, -, 7)\n\
             4: (ADD, 10000, 60002, 30000)\n\
             5: (ASSIGN, 30000, -, 10000)\n\
             6: (GOTO, -, -, 2)\n"
        );
    }

    #[test]
    fn test_do_while_loop() {
        let source = "var i: int;
            main {
                i = 0;
                do { i = i + 1; } while (i < 3);
            }
            end";
        assert_eq!(
            listing(source),
            "0: (GOTO, -, -, 1)\n\
             1: (ASSIGN, 60000, -, 10000)\n\
             2: (ADD, 10000, 60001, 30000)\n\
             3: (ASSIGN, 30000, -, 10000)\n\
             4: (LESS_THAN, 10000, 60002, 50000)\n\
             5: (GOTOT, 50000, -, 2)\n"
        );
    }

    #[test]
    fn test_nested_control_flow_leaves_no_pending_jumps() {
        let source = "var i, j: int;
            main {
                i = 0;
                while (i < 3) {
                    j = 0;
                    while (j < i) {
                        if (j == 1) { write(j); } else if (j == 2) { write(0); } else { write(i); }
                        j = j + 1;
                    }
                    i = i + 1;
                }
            }
            end";
        let program = compile(source).unwrap();
        assert!(program.quadruples.unresolved().is_empty());
    }

    // ========================================
    // Function Tests
    // ========================================

    #[test]
    fn test_function_call_sequence() {
        let source = "var g: int;
            void bump(n: int) {
                g = g + n;
            };
            main {
                g = 1;
                bump(41);
                write(g);
            }
            end";
        let program = compile(source).unwrap();
        assert_eq!(
            program.quadruples.to_string(),
            "0: (GOTO, -, -, 4)\n\
             1: (ADD, 10000, 90000, 30000)\n\
             2: (ASSIGN, 30000, -, 10000)\n\
             3: (ENDFUNC, -, -, -)\n\
             4: (ASSIGN, 60000, -, 10000)\n\
             5: (ERA, -, -, 1)\n\
             6: (PARAM, 60001, -, 90000)\n\
             7: (GOSUB, -, -, 1)\n\
             8: (PRINT, 10000, -, -)\n"
        );

        let frame = program.descriptor.frame(QuadrupleIndex::new(1)).unwrap();
        assert_eq!(frame.name, "bump");
        assert_eq!(frame.locals, LocalSizes { int: 1, float: 0 });
        assert_eq!(program.descriptor.globals.get(Segment::GlobalVoid), 2);
    }

    #[test]
    fn test_function_locals_are_separate_per_function() {
        let source = "void f(a: int) { var b: float; b = a; }
            void g(x: float, y: float) { var z: int; }
            main { } end";
        let program = compile(source).unwrap();
        let f = program.descriptor.frame_by_name("f").unwrap();
        let g = program.descriptor.frame_by_name("g").unwrap();
        assert_eq!(f.locals, LocalSizes { int: 1, float: 1 });
        assert_eq!(g.locals, LocalSizes { int: 1, float: 2 });
    }

    #[test]
    fn test_recursive_call_resolves() {
        let source = "var n: int;
            void down(k: int) {
                if (k > 0) { down(k - 1); }
            }
            main { down(3); } end";
        let program = compile(source).unwrap();
        let calls: Vec<_> = program
            .quadruples
            .iter()
            .filter(|q| q.operator == Operator::Gosub)
            .map(|q| q.result)
            .collect();
        assert_eq!(calls, vec![Target::Jump(QuadrupleIndex::new(1)); 2]);
    }

    #[test]
    fn test_call_argument_checks() {
        assert_eq!(
            error_code("void f(a: int) { } main { f(); } end"),
            ErrorCode::ArgumentCountMismatch
        );
        assert_eq!(
            error_code("void f(a: int) { } main { f(1, 2); } end"),
            ErrorCode::ArgumentCountMismatch
        );
        assert_eq!(
            error_code("void f(a: int) { } main { f(1.5); } end"),
            ErrorCode::TypeMismatch
        );
        assert!(compile("void f(a: float) { } main { f(1); } end").is_ok());
    }

    #[test]
    fn test_call_errors() {
        assert_eq!(error_code("main { nothing(); } end"), ErrorCode::UndeclaredSymbol);
        assert_eq!(
            error_code("var v: int; main { v(); } end"),
            ErrorCode::NotCallable
        );
        assert_eq!(
            error_code("void f() { } main { f = 1; } end"),
            ErrorCode::InvalidAssignmentTarget
        );
        assert_eq!(
            error_code("var a: int; void f() { } main { a = f; } end"),
            ErrorCode::TypeMismatch
        );
    }

    #[test]
    fn test_duplicate_function() {
        assert_eq!(
            error_code("void f() { } void f() { } main { } end"),
            ErrorCode::DuplicateSymbol
        );
    }
}
