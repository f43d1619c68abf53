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

//! Token stream navigation and error helpers for the translator.
//!
//! This module provides utility methods for the translator including:
//! - Token stream navigation (peek, advance, check)
//! - Token matching and expectation
//! - Error creation with span and line

use super::Translator;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::{SpannedToken, Token};
use crate::memory::SegmentOverflow;

/// Trait for translator helper operations.
pub trait TranslatorHelpers {
    /// Check if we've reached the end of the token stream.
    fn is_at_end(&self) -> bool;

    /// Peek at the current token without advancing.
    fn peek(&self) -> Option<&Token>;

    /// Peek at a token ahead by n positions.
    fn peek_ahead(&self, n: usize) -> Option<&Token>;

    /// Span and line of the current token, or of the last one at end of input.
    fn current_location(&self) -> (Span, usize);

    /// Advance to the next token and return the current one.
    fn advance(&mut self) -> Option<SpannedToken>;

    /// Check if the current token is of the expected kind.
    fn check(&self, expected: &Token) -> bool;

    /// Consume the current token if it is of the expected kind.
    fn match_token(&mut self, expected: &Token) -> bool;

    /// Expect the current token to match, or return an error.
    fn expect(&mut self, expected: &Token, message: &str) -> Result<SpannedToken, CompileError>;

    /// Expect an identifier and return its name with its location.
    fn expect_identifier(&mut self, message: &str) -> Result<(String, Span, usize), CompileError>;

    /// Create an error at the current position.
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> CompileError;

    /// Create an error at a known location.
    fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        line: usize,
    ) -> CompileError;

    /// Turn an address overflow into a translation error at the current position.
    fn overflow_error(&self, overflow: SegmentOverflow) -> CompileError;
}

impl<'a> TranslatorHelpers for Translator<'a> {
    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|t| &t.token)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n).map(|t| &t.token)
    }

    fn current_location(&self) -> (Span, usize) {
        match self
            .tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
        {
            Some(token) => (token.span.clone(), token.line),
            None => (Span::new(0, 0), 1),
        }
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, message: &str) -> Result<SpannedToken, CompileError> {
        if self.check(expected) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }

        match self.peek() {
            Some(found) => Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("{}, found {}", message, found),
            )),
            None => Err(self.error(
                ErrorCode::UnexpectedEndOfFile,
                format!("{}, found end of file", message),
            )),
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<(String, Span, usize), CompileError> {
        if let Some(Token::Identifier(name)) = self.peek() {
            let name = name.clone();
            let (span, line) = self.current_location();
            self.advance();
            return Ok((name, span, line));
        }

        let found = self
            .peek()
            .map_or("end of file".to_string(), |t| t.to_string());
        Err(self.error(
            ErrorCode::ExpectedIdentifier,
            format!("{}, found {}", message, found),
        ))
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>) -> CompileError {
        let (span, line) = self.current_location();
        self.error_at(code, message, span, line)
    }

    fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        line: usize,
    ) -> CompileError {
        CompileError::new(code, message, span).with_line(line)
    }

    fn overflow_error(&self, overflow: SegmentOverflow) -> CompileError {
        self.error(ErrorCode::SegmentOverflow, overflow.to_string())
            .with_hint("Split the program or use fewer variables and temporaries")
    }
}
