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

//! Expression translation.
//!
//! Operands are pushed onto the operand stack as they are recognized and
//! operators onto the pending-operator stack. Each precedence level
//! reduces the operator on top of the stack once its right operand is
//! complete, emitting one quadruple into a fresh temporary.
//!
//! Precedence, lowest to highest: relational, additive, multiplicative.
//! Relational operators do not associate; the others associate left.

use super::context::Pending;
use super::helpers::TranslatorHelpers;
use super::Translator;
use crate::error::{CompileError, ErrorCode, Span};
use crate::ir::{Operator, Target};
use crate::lexer::Token;
use crate::memory::ConstantValue;
use crate::semantic::{result_type, DataType};

/// Extension trait for expression translation.
pub trait ExpressionTranslator {
    /// Translate `exp (relop exp)?`.
    fn translate_expression(&mut self) -> Result<(), CompileError>;

    /// Translate `term {(+|-) term}`.
    fn translate_additive(&mut self) -> Result<(), CompileError>;

    /// Translate `factor {(*|/) factor}`.
    fn translate_term(&mut self) -> Result<(), CompileError>;

    /// Translate a parenthesized expression, a literal, a variable or a signed factor.
    fn translate_factor(&mut self) -> Result<(), CompileError>;

    /// Intern a numeric literal, applying a leading minus if given.
    fn translate_number(&mut self, negative: bool) -> Result<(), CompileError>;

    /// Push the operator at the current token onto the pending-operator stack.
    fn push_operator(&mut self, operator: Operator);

    /// Pop the pending operator and its two operands and emit the quadruple.
    fn reduce(&mut self) -> Result<(), CompileError>;
}

impl<'a> ExpressionTranslator for Translator<'a> {
    fn translate_expression(&mut self) -> Result<(), CompileError> {
        self.translate_additive()?;

        if let Some(operator) = self.peek().and_then(relational_operator) {
            self.push_operator(operator);
            self.advance();
            self.translate_additive()?;
            self.reduce()?;

            if self.peek().is_some_and(Token::is_relational) {
                return Err(self
                    .error(
                        ErrorCode::UnexpectedToken,
                        "Comparison operators cannot be chained",
                    )
                    .with_hint("Use parentheses or separate conditions"));
            }
        }
        Ok(())
    }

    fn translate_additive(&mut self) -> Result<(), CompileError> {
        self.translate_term()?;

        while let Some(operator) = self.peek().and_then(additive_operator) {
            self.push_operator(operator);
            self.advance();
            self.translate_term()?;
            self.reduce()?;
        }
        Ok(())
    }

    fn translate_term(&mut self) -> Result<(), CompileError> {
        self.translate_factor()?;

        while let Some(operator) = self.peek().and_then(multiplicative_operator) {
            self.push_operator(operator);
            self.advance();
            self.translate_factor()?;
            self.reduce()?;
        }
        Ok(())
    }

    fn translate_factor(&mut self) -> Result<(), CompileError> {
        let (span, line) = self.current_location();

        match self.peek().cloned() {
            Some(Token::LeftParen) => {
                self.advance();
                self.context.push_fence();
                self.translate_expression()?;
                self.expect(&Token::RightParen, "Expected ')' after expression")?;
                self.context.pop_fence();
                Ok(())
            }
            Some(sign @ (Token::Plus | Token::Minus)) => {
                self.advance();
                let negative = sign == Token::Minus;

                if matches!(
                    self.peek(),
                    Some(Token::IntLiteral(_) | Token::FloatLiteral(_))
                ) {
                    return self.translate_number(negative);
                }

                if negative {
                    // -x is translated as 0 - x.
                    let zero = self
                        .context
                        .memory
                        .intern(ConstantValue::Int(0))
                        .map_err(|e| self.overflow_error(e))?;
                    self.context.push_operand(zero, DataType::Int);
                    self.context.operators.push(Pending::Operator {
                        operator: Operator::Subtract,
                        span,
                        line,
                    });
                    self.translate_factor()?;
                    self.reduce()
                } else {
                    self.translate_factor()?;
                    let operand = self.context.operands.last().map(|o| o.data_type);
                    match operand {
                        Some(data_type) if !data_type.is_numeric() => Err(self.error_at(
                            ErrorCode::TypeMismatch,
                            format!("Unary '+' cannot be applied to {}", data_type),
                            span,
                            line,
                        )),
                        _ => Ok(()),
                    }
                }
            }
            Some(Token::IntLiteral(_) | Token::FloatLiteral(_)) => self.translate_number(false),
            Some(Token::StringLiteral(text)) => {
                self.advance();
                let address = self
                    .context
                    .memory
                    .intern(ConstantValue::Str(text))
                    .map_err(|e| self.overflow_error(e))?;
                self.context.push_operand(address, DataType::String);
                Ok(())
            }
            Some(Token::Identifier(name)) => {
                self.advance();
                match self.context.scopes.lookup(&name) {
                    Some(symbol) if symbol.is_variable() => {
                        let (address, data_type) = (symbol.address, symbol.data_type);
                        self.context.push_operand(address, data_type);
                        Ok(())
                    }
                    Some(_) => Err(self.error_at(
                        ErrorCode::TypeMismatch,
                        format!("'{}' has no value and cannot be used in an expression", name),
                        span,
                        line,
                    )),
                    None => Err(self.error_at(
                        ErrorCode::UndeclaredSymbol,
                        format!("Undeclared symbol '{}'", name),
                        span,
                        line,
                    )),
                }
            }
            Some(found) => Err(self.error(
                ErrorCode::ExpectedExpression,
                format!("Expected expression, found {}", found),
            )),
            None => Err(self.error(
                ErrorCode::UnexpectedEndOfFile,
                "Expected expression, found end of file",
            )),
        }
    }

    fn translate_number(&mut self, negative: bool) -> Result<(), CompileError> {
        let (span, line) = self.current_location();
        let sign = if negative { "-" } else { "" };

        let (value, data_type) = match self.advance().map(|t| t.token) {
            Some(Token::IntLiteral(text)) => match format!("{}{}", sign, text).parse::<i64>() {
                Ok(value) => (ConstantValue::Int(value), DataType::Int),
                Err(_) => {
                    let message = format!("Integer literal {}{} is out of range", sign, text);
                    return Err(self.error_at(ErrorCode::MalformedLiteral, message, span, line));
                }
            },
            Some(Token::FloatLiteral(text)) => match format!("{}{}", sign, text).parse::<f64>() {
                Ok(value) if value.is_finite() => (ConstantValue::Float(value), DataType::Float),
                _ => {
                    let message = format!("Float literal {}{} is out of range", sign, text);
                    return Err(self.error_at(ErrorCode::MalformedLiteral, message, span, line));
                }
            },
            _ => {
                return Err(self.error_at(
                    ErrorCode::ExpectedExpression,
                    "Expected a number",
                    span,
                    line,
                ))
            }
        };

        let address = self
            .context
            .memory
            .intern(value)
            .map_err(|e| self.overflow_error(e))?;
        self.context.push_operand(address, data_type);
        Ok(())
    }

    fn push_operator(&mut self, operator: Operator) {
        let (span, line) = self.current_location();
        self.context.operators.push(Pending::Operator {
            operator,
            span,
            line,
        });
    }

    fn reduce(&mut self) -> Result<(), CompileError> {
        let (operator, span, line) = match self.context.operators.pop() {
            Some(Pending::Operator {
                operator,
                span,
                line,
            }) => (operator, span, line),
            other => panic!("no pending operator to reduce, found {:?}", other),
        };
        let right = self.context.pop_operand();
        let left = self.context.pop_operand();

        let data_type = match result_type(left.data_type, right.data_type, operator) {
            Ok(data_type) => data_type,
            Err(err) => return Err(type_mismatch(self, err.to_string(), span, line)),
        };

        let temporary = self
            .context
            .temporary(data_type)
            .map_err(|e| self.overflow_error(e))?;
        self.context.emit(
            operator,
            Some(left.address),
            Some(right.address),
            Target::Address(temporary),
        );
        self.context.push_operand(temporary, data_type);
        Ok(())
    }
}

fn type_mismatch(
    translator: &Translator<'_>,
    mut message: String,
    span: Span,
    line: usize,
) -> CompileError {
    if let Some(first) = message.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    translator.error_at(ErrorCode::TypeMismatch, message, span, line)
}

fn relational_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Less => Some(Operator::LessThan),
        Token::Greater => Some(Operator::GreaterThan),
        Token::LessEqual => Some(Operator::LessEqual),
        Token::GreaterEqual => Some(Operator::GreaterEqual),
        Token::EqualEqual => Some(Operator::Equal),
        Token::BangEqual => Some(Operator::NotEqual),
        _ => None,
    }
}

fn additive_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Plus => Some(Operator::Add),
        Token::Minus => Some(Operator::Subtract),
        _ => None,
    }
}

fn multiplicative_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Star => Some(Operator::Multiply),
        Token::Slash => Some(Operator::Divide),
        _ => None,
    }
}
