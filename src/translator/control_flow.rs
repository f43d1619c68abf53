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

//! Control flow translation with backpatching.
//!
//! Forward jumps are emitted with an unset target and their index is kept
//! on the jump stack until the destination is known:
//! - `if` / `else` (GOTOF over the then-branch, GOTO over the else-branch)
//! - `while` (GOTOF out of the loop, GOTO back to the condition)
//! - `do ... while` (GOTOT back to the body)

use super::expressions::ExpressionTranslator;
use super::helpers::TranslatorHelpers;
use super::statements::StatementTranslator;
use super::Translator;
use crate::error::{CompileError, ErrorCode};
use crate::ir::{Operator, Target};
use crate::lexer::Token;
use crate::memory::Address;
use crate::semantic::DataType;

/// Extension trait for control flow translation.
pub trait ControlFlowTranslator {
    /// Translate `( expr )` and check that it is boolean.
    fn translate_condition(&mut self) -> Result<Address, CompileError>;

    /// Translate an if statement.
    fn translate_if(&mut self) -> Result<(), CompileError>;

    /// Translate a while loop.
    fn translate_while(&mut self) -> Result<(), CompileError>;

    /// Translate a do-while loop.
    fn translate_do_while(&mut self) -> Result<(), CompileError>;
}

impl<'a> ControlFlowTranslator for Translator<'a> {
    fn translate_condition(&mut self) -> Result<Address, CompileError> {
        self.expect(&Token::LeftParen, "Expected '(' before condition")?;
        let (span, line) = self.current_location();
        self.translate_expression()?;
        self.expect(&Token::RightParen, "Expected ')' after condition")?;

        let condition = self.context.pop_operand();
        if condition.data_type != DataType::Bool {
            let message = format!(
                "Condition must be a comparison, found {}",
                condition.data_type
            );
            return Err(self
                .error_at(ErrorCode::NonBooleanCondition, message, span, line)
                .with_hint("Compare the value explicitly, e.g. 'x != 0'"));
        }
        Ok(condition.address)
    }

    fn translate_if(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::If, "Expected 'if'")?;
        let condition = self.translate_condition()?;

        let false_jump = self
            .context
            .emit_pending_jump(Operator::GotoF, Some(condition));
        self.context.jumps.push(false_jump);

        self.translate_braced_block()?;

        if self.match_token(&Token::Else) {
            let exit_jump = self.context.emit_pending_jump(Operator::Goto, None);
            let false_jump = self.context.pop_jump();
            self.context.fill_here(false_jump);
            self.context.jumps.push(exit_jump);

            if self.check(&Token::If) {
                self.translate_if()?;
            } else {
                self.translate_braced_block()?;
            }
        }

        let pending = self.context.pop_jump();
        self.context.fill_here(pending);
        Ok(())
    }

    fn translate_while(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::While, "Expected 'while'")?;

        let loop_start = self.context.quadruples.next_index();
        self.context.jumps.push(loop_start);

        let condition = self.translate_condition()?;
        let exit_jump = self
            .context
            .emit_pending_jump(Operator::GotoF, Some(condition));
        self.context.jumps.push(exit_jump);

        self.translate_braced_block()?;

        let exit_jump = self.context.pop_jump();
        let loop_start = self.context.pop_jump();
        self.context
            .emit(Operator::Goto, None, None, Target::Jump(loop_start));
        self.context.fill_here(exit_jump);
        Ok(())
    }

    fn translate_do_while(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Do, "Expected 'do'")?;

        let loop_start = self.context.quadruples.next_index();
        self.context.jumps.push(loop_start);

        self.translate_braced_block()?;
        self.expect(&Token::While, "Expected 'while' after do block")?;
        let condition = self.translate_condition()?;

        let loop_start = self.context.pop_jump();
        self.context.emit(
            Operator::GotoT,
            Some(condition),
            None,
            Target::Jump(loop_start),
        );
        Ok(())
    }
}
