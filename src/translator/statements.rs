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

//! Statement translation.
//!
//! This module provides:
//! - Blocks and nested anonymous scopes
//! - Assignment
//! - `write` / `printf`
//! - Call statements (ERA, PARAM, GOSUB)

use super::control_flow::ControlFlowTranslator;
use super::declarations::DeclarationTranslator;
use super::expressions::ExpressionTranslator;
use super::helpers::TranslatorHelpers;
use super::Translator;
use crate::error::{CompileError, ErrorCode};
use crate::ir::{Operator, Target};
use crate::lexer::Token;
use crate::semantic::{is_assignable, ScopeKind};

/// Extension trait for statement translation.
pub trait StatementTranslator {
    /// Translate `vars statement*` up to the closing `}`.
    fn translate_block_contents(&mut self) -> Result<(), CompileError>;

    /// Translate `{ block }` in a fresh anonymous scope.
    fn translate_braced_block(&mut self) -> Result<(), CompileError>;

    /// Translate a single statement.
    fn translate_statement(&mut self) -> Result<(), CompileError>;

    /// Translate `id = expr`.
    fn translate_assignment(&mut self) -> Result<(), CompileError>;

    /// Translate `write(expr {, expr})`.
    fn translate_write(&mut self) -> Result<(), CompileError>;

    /// Translate `id(args)`.
    fn translate_call(&mut self) -> Result<(), CompileError>;
}

impl<'a> StatementTranslator for Translator<'a> {
    fn translate_block_contents(&mut self) -> Result<(), CompileError> {
        self.translate_vars()?;
        while !self.is_at_end() && !self.check(&Token::RightBrace) {
            self.translate_statement()?;
        }
        Ok(())
    }

    fn translate_braced_block(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::LeftBrace, "Expected '{'")?;
        self.context.scopes.enter("block", ScopeKind::Block);
        self.translate_block_contents()?;
        self.expect(&Token::RightBrace, "Expected '}' to close the block")?;
        self.context.scopes.exit();
        Ok(())
    }

    fn translate_statement(&mut self) -> Result<(), CompileError> {
        match self.peek() {
            Some(Token::Identifier(_)) => {
                if self.peek_ahead(1) == Some(&Token::LeftParen) {
                    self.translate_call()?;
                } else {
                    self.translate_assignment()?;
                    self.context.pop_operand();
                }
                self.expect(&Token::Semicolon, "Expected ';' after statement")?;
            }
            Some(Token::Write) => {
                self.translate_write()?;
                self.expect(&Token::Semicolon, "Expected ';' after write")?;
            }
            Some(Token::If) => {
                self.translate_if()?;
                self.match_token(&Token::Semicolon);
            }
            Some(Token::While) => {
                self.translate_while()?;
                self.match_token(&Token::Semicolon);
            }
            Some(Token::Do) => {
                self.translate_do_while()?;
                self.expect(&Token::Semicolon, "Expected ';' after do-while")?;
            }
            Some(Token::LeftBrace) => {
                self.translate_braced_block()?;
                self.match_token(&Token::Semicolon);
            }
            Some(Token::Var) => {
                return Err(self
                    .error(ErrorCode::UnexpectedToken, "Declarations must come before statements")
                    .with_hint("Move the 'var' section to the start of the block"));
            }
            Some(found) => {
                let message = format!("Expected statement, found {}", found);
                return Err(self.error(ErrorCode::UnexpectedToken, message));
            }
            None => {
                return Err(self.error(
                    ErrorCode::UnexpectedEndOfFile,
                    "Expected statement, found end of file",
                ));
            }
        }
        Ok(())
    }

    fn translate_assignment(&mut self) -> Result<(), CompileError> {
        let (name, span, line) = self.expect_identifier("Expected variable name")?;

        let target = match self.context.scopes.lookup(&name) {
            Some(symbol) if symbol.is_variable() => (symbol.address, symbol.data_type),
            Some(_) => {
                let message = format!("'{}' is not a variable", name);
                return Err(self.error_at(ErrorCode::InvalidAssignmentTarget, message, span, line));
            }
            None => {
                let message = format!("Undeclared symbol '{}'", name);
                return Err(self.error_at(ErrorCode::UndeclaredSymbol, message, span, line));
            }
        };

        self.expect(&Token::Equal, "Expected '=' after variable name")?;
        self.translate_expression()?;
        let value = self.context.pop_operand();

        if !is_assignable(target.1, value.data_type) {
            let message = format!(
                "Cannot assign {} to '{}' of type {}",
                value.data_type, name, target.1
            );
            return Err(self.error_at(ErrorCode::TypeMismatch, message, span, line));
        }

        self.context.emit(
            Operator::Assign,
            Some(value.address),
            None,
            Target::Address(target.0),
        );
        self.context.push_operand(target.0, target.1);
        Ok(())
    }

    fn translate_write(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Write, "Expected 'write'")?;
        self.expect(&Token::LeftParen, "Expected '(' after 'write'")?;

        loop {
            self.translate_expression()?;
            let value = self.context.pop_operand();
            self.context
                .emit(Operator::Print, Some(value.address), None, Target::Unset);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::RightParen, "Expected ')' after write arguments")?;
        Ok(())
    }

    fn translate_call(&mut self) -> Result<(), CompileError> {
        let (name, span, line) = self.expect_identifier("Expected function name")?;

        let info = match self.context.scopes.lookup(&name) {
            Some(symbol) => match symbol.function_info() {
                Some(info) => info.clone(),
                None => {
                    let message = format!("'{}' is not a function", name);
                    return Err(self.error_at(ErrorCode::NotCallable, message, span, line));
                }
            },
            None => {
                let message = format!("Undeclared symbol '{}'", name);
                return Err(self.error_at(ErrorCode::UndeclaredSymbol, message, span, line));
            }
        };

        self.context
            .emit(Operator::Era, None, None, Target::Jump(info.entry));
        self.expect(&Token::LeftParen, "Expected '(' after function name")?;

        let mut count = 0;
        if !self.check(&Token::RightParen) {
            loop {
                let (arg_span, arg_line) = self.current_location();
                self.translate_expression()?;
                let argument = self.context.pop_operand();

                if let Some((param_type, param_address)) = info.params.get(count) {
                    if !is_assignable(*param_type, argument.data_type) {
                        let message = format!(
                            "Argument {} of '{}' expects {}, found {}",
                            count + 1,
                            name,
                            param_type,
                            argument.data_type
                        );
                        return Err(self.error_at(
                            ErrorCode::TypeMismatch,
                            message,
                            arg_span,
                            arg_line,
                        ));
                    }
                    self.context.emit(
                        Operator::Param,
                        Some(argument.address),
                        None,
                        Target::Address(*param_address),
                    );
                }
                count += 1;

                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RightParen, "Expected ')' after arguments")?;

        if count != info.params.len() {
            let message = format!(
                "'{}' expects {} argument(s), found {}",
                name,
                info.params.len(),
                count
            );
            return Err(self.error_at(ErrorCode::ArgumentCountMismatch, message, span, line));
        }

        self.context
            .emit(Operator::Gosub, None, None, Target::Jump(info.entry));
        Ok(())
    }
}
