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

//! Declaration translation.
//!
//! This module provides:
//! - The optional `program id;` header
//! - `var` sections with one or more `idList : type ;` groups
//! - Function declarations with their parameter lists and bodies

use super::helpers::TranslatorHelpers;
use super::statements::StatementTranslator;
use super::Translator;
use crate::error::{CompileError, ErrorCode, Span};
use crate::ir::{Operator, Target};
use crate::lexer::Token;
use crate::memory::{Address, Segment};
use crate::semantic::{DataType, ScopeId, ScopeKind, Symbol};

/// Extension trait for declaration translation.
pub trait DeclarationTranslator {
    /// Translate the optional program header and declare the program symbol.
    fn translate_program_header(&mut self) -> Result<(), CompileError>;

    /// Translate any number of `var` sections.
    fn translate_vars(&mut self) -> Result<(), CompileError>;

    /// Translate one `idList : type ;` group.
    fn translate_var_group(&mut self) -> Result<(), CompileError>;

    /// Translate a declarable type.
    fn translate_type(&mut self) -> Result<DataType, CompileError>;

    /// Translate a `void` function declaration.
    fn translate_function(&mut self) -> Result<(), CompileError>;

    /// Declare a variable in the innermost scope and return its address.
    fn declare_variable(
        &mut self,
        name: String,
        data_type: DataType,
        span: Span,
        line: usize,
    ) -> Result<Address, CompileError>;
}

impl<'a> DeclarationTranslator for Translator<'a> {
    fn translate_program_header(&mut self) -> Result<(), CompileError> {
        let (name, span) = if self.match_token(&Token::Program) {
            let (name, span, _) = self.expect_identifier("Expected program name")?;
            self.expect(&Token::Semicolon, "Expected ';' after program name")?;
            (name, span)
        } else {
            ("program".to_string(), Span::new(0, 0))
        };

        let address = self
            .context
            .memory
            .assign(Segment::GlobalVoid)
            .map_err(|e| self.overflow_error(e))?;
        let mut symbol = Symbol::program(name.clone(), address, span);
        symbol.children = Some(ScopeId::GLOBAL);

        // The global scope is still empty here, so this cannot collide.
        let _ = self.context.scopes.define(symbol);
        log::debug!("program {} at {}", name, address);
        Ok(())
    }

    fn translate_vars(&mut self) -> Result<(), CompileError> {
        while self.match_token(&Token::Var) {
            if !self.check(&Token::Identifier(String::new())) {
                return Err(self.error(
                    ErrorCode::ExpectedIdentifier,
                    "Expected variable name after 'var'",
                ));
            }
            self.translate_var_group()?;
            // Another group only if an identifier list follows; `x = ...` starts a statement.
            while self.check(&Token::Identifier(String::new()))
                && matches!(self.peek_ahead(1), Some(Token::Colon | Token::Comma))
            {
                self.translate_var_group()?;
            }
        }
        Ok(())
    }

    fn translate_var_group(&mut self) -> Result<(), CompileError> {
        let mut names = vec![self.expect_identifier("Expected variable name")?];
        while self.match_token(&Token::Comma) {
            names.push(self.expect_identifier("Expected variable name after ','")?);
        }

        self.expect(&Token::Colon, "Expected ':' after variable names")?;
        let data_type = self.translate_type()?;
        self.expect(&Token::Semicolon, "Expected ';' after variable declaration")?;

        for (name, span, line) in names {
            self.declare_variable(name, data_type, span, line)?;
        }
        Ok(())
    }

    fn translate_type(&mut self) -> Result<DataType, CompileError> {
        match self.peek() {
            Some(Token::Int) => {
                self.advance();
                Ok(DataType::Int)
            }
            Some(Token::Float) => {
                self.advance();
                Ok(DataType::Float)
            }
            Some(Token::StringType) => Err(self
                .error(ErrorCode::InvalidType, "Variables cannot have type 'string'")
                .with_hint("String literals can only be printed")),
            Some(found) => {
                let message = format!("Expected type 'int' or 'float', found {}", found);
                Err(self.error(ErrorCode::ExpectedType, message))
            }
            None => Err(self.error(
                ErrorCode::UnexpectedEndOfFile,
                "Expected type, found end of file",
            )),
        }
    }

    fn translate_function(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Void, "Expected 'void'")?;
        let (name, span, line) = self.expect_identifier("Expected function name")?;

        let address = self
            .context
            .memory
            .assign(Segment::GlobalVoid)
            .map_err(|e| self.overflow_error(e))?;
        let entry = self.context.quadruples.next_index();

        // Declared before the body so the function can call itself.
        let symbol = Symbol::function(name.clone(), address, entry, span.clone());
        if let Err(existing) = self.context.scopes.define(symbol) {
            return Err(duplicate(self, &existing, span, line));
        }
        log::debug!("function {} enters at {}", name, entry);

        let scope = self.context.scopes.enter(name.clone(), ScopeKind::Function);
        if let Some(symbol) = self.context.scopes.lookup_mut(&name) {
            symbol.children = Some(scope);
        }
        self.context.memory.open_local_scope(&name);

        self.expect(&Token::LeftParen, "Expected '(' after function name")?;
        if !self.check(&Token::RightParen) {
            loop {
                let (param, param_span, param_line) =
                    self.expect_identifier("Expected parameter name")?;
                self.expect(&Token::Colon, "Expected ':' after parameter name")?;
                let data_type = self.translate_type()?;
                let param_address =
                    self.declare_variable(param, data_type, param_span, param_line)?;

                let info = self
                    .context
                    .scopes
                    .scope_mut(ScopeId::GLOBAL)
                    .symbols
                    .lookup_mut(&name)
                    .and_then(|symbol| symbol.function_info_mut())
                    .expect("function symbol is declared in the global scope");
                info.params.push((data_type, param_address));

                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RightParen, "Expected ')' after parameters")?;

        self.expect(&Token::LeftBrace, "Expected '{' before function body")?;
        self.translate_block_contents()?;
        self.expect(&Token::RightBrace, "Expected '}' after function body")?;
        self.match_token(&Token::Semicolon);

        self.context
            .emit(Operator::EndFunc, None, None, Target::Unset);
        self.context.scopes.exit();
        self.context.functions.push((name, entry));
        Ok(())
    }

    fn declare_variable(
        &mut self,
        name: String,
        data_type: DataType,
        span: Span,
        line: usize,
    ) -> Result<Address, CompileError> {
        let address = match self.context.variable_address(data_type) {
            Some(Ok(address)) => address,
            Some(Err(overflow)) => return Err(self.overflow_error(overflow)),
            None => {
                let message = format!("Variables cannot have type '{}'", data_type);
                return Err(self.error_at(ErrorCode::InvalidType, message, span, line));
            }
        };

        let symbol = Symbol::variable(name.clone(), data_type, address, span.clone());
        if let Err(existing) = self.context.scopes.define(symbol) {
            return Err(duplicate(self, &existing, span, line));
        }

        log::trace!("declare {}: {} at {}", name, data_type, address);
        Ok(address)
    }
}

fn duplicate(
    translator: &Translator<'_>,
    existing: &Symbol,
    span: Span,
    line: usize,
) -> CompileError {
    translator
        .error_at(
            ErrorCode::DuplicateSymbol,
            format!("'{}' is already declared in this scope", existing.name),
            span,
            line,
        )
        .with_hint("Rename one of the declarations")
}
