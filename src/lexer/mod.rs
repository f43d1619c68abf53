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

//! Lexer module for the Ente toolchain.
//!
//! This module turns source text into a flat stream of tokens, each
//! tagged with its byte span and 1-indexed line. It handles:
//! - Keywords and identifiers
//! - Integer, float and string literals
//! - Operators and delimiters
//! - Line comments (starting with `//`)
//!
//! Characters that do not start any token are reported as warnings and
//! skipped; scanning never aborts.

mod tokens;

pub use tokens::Token;

use logos::Logos;

use crate::error::{CompileError, ErrorCode, Span};

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token itself.
    pub token: Token,
    /// Byte range in the source.
    pub span: Span,
    /// Line number (1-indexed).
    pub line: usize,
}

/// The output of a scan: the tokens plus the characters that were skipped.
#[derive(Debug, Default)]
pub struct TokenStream {
    /// Recognized tokens in source order.
    pub tokens: Vec<SpannedToken>,
    /// One `InvalidCharacter` diagnostic per skipped run of bad input.
    pub warnings: Vec<CompileError>,
}

impl TokenStream {
    /// Check whether any input had to be skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Tokenize source code.
pub fn tokenize(source: &str) -> TokenStream {
    let mut lexer = Token::lexer(source);
    let mut stream = TokenStream::default();

    let mut line = 1;
    let mut cursor = 0;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        line += source[cursor..range.start].matches('\n').count();
        cursor = range.start;

        let span = Span::from(range.clone());
        match result {
            Ok(token) => stream.tokens.push(SpannedToken { token, span, line }),
            Err(()) => {
                let text = &source[range];
                log::warn!("Line {}: bad character {:?}, skipped", line, text);
                stream.warnings.push(
                    CompileError::new(
                        ErrorCode::InvalidCharacter,
                        format!("Bad character '{}'", text),
                        span,
                    )
                    .with_line(line),
                );
            }
        }
    }

    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).tokens.into_iter().map(|t| t.token).collect()
    }

    // ========================================
    // Basic Token Tests
    // ========================================

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(
            kinds("+ - * /"),
            vec![Token::Plus, Token::Minus, Token::Star, Token::Slash]
        );
    }

    #[test]
    fn test_relational_operators() {
        assert_eq!(
            kinds("< > <= >= == != ="),
            vec![
                Token::Less,
                Token::Greater,
                Token::LessEqual,
                Token::GreaterEqual,
                Token::EqualEqual,
                Token::BangEqual,
                Token::Equal,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds("( ) { } [ ] : ; ,"),
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Colon,
                Token::Semicolon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("program main end var void int float string if else while do"),
            vec![
                Token::Program,
                Token::Main,
                Token::End,
                Token::Var,
                Token::Void,
                Token::Int,
                Token::Float,
                Token::StringType,
                Token::If,
                Token::Else,
                Token::While,
                Token::Do,
            ]
        );
    }

    #[test]
    fn test_write_and_printf_are_the_same_keyword() {
        assert_eq!(kinds("write printf"), vec![Token::Write, Token::Write]);
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            kinds("integer ended"),
            vec![
                Token::Identifier("integer".into()),
                Token::Identifier("ended".into()),
            ]
        );
    }

    // ========================================
    // Literal Tests
    // ========================================

    #[test]
    fn test_number_literals() {
        assert_eq!(
            kinds("42 3.14 1.5e-3"),
            vec![
                Token::IntLiteral("42".into()),
                Token::FloatLiteral("3.14".into()),
                Token::FloatLiteral("1.5e-3".into()),
            ]
        );
    }

    #[test]
    fn test_string_literal_strips_quotes() {
        assert_eq!(
            kinds("\"hello world\""),
            vec![Token::StringLiteral("hello world".into())]
        );
    }

    #[test]
    fn test_minus_is_separate_from_number() {
        assert_eq!(
            kinds("b = -a"),
            vec![
                Token::Identifier("b".into()),
                Token::Equal,
                Token::Minus,
                Token::Identifier("a".into()),
            ]
        );
    }

    // ========================================
    // Position Tests
    // ========================================

    #[test]
    fn test_line_numbers() {
        let stream = tokenize("program p;\nvar a : int;\n\nmain");
        let lines: Vec<usize> = stream.tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 2, 2, 4]);
    }

    #[test]
    fn test_line_numbers_after_multiline_string() {
        let stream = tokenize("\"a\nb\" x");
        assert_eq!(stream.tokens[1].line, 2);
    }

    #[test]
    fn test_spans() {
        let stream = tokenize("a = 10");
        assert_eq!(stream.tokens[2].span, Span::new(4, 6));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // the rest is ignored\nb"),
            vec![Token::Identifier("a".into()), Token::Identifier("b".into())]
        );
    }

    // ========================================
    // Error Recovery Tests
    // ========================================

    #[test]
    fn test_bad_character_is_reported_and_skipped() {
        let stream = tokenize("a\n @ b");
        assert!(stream.has_warnings());
        assert_eq!(stream.warnings.len(), 1);
        assert_eq!(stream.warnings[0].code, ErrorCode::InvalidCharacter);
        assert_eq!(stream.warnings[0].line, Some(2));
        assert_eq!(
            stream.tokens.iter().map(|t| t.token.clone()).collect::<Vec<_>>(),
            vec![Token::Identifier("a".into()), Token::Identifier("b".into())]
        );
    }

    #[test]
    fn test_empty_source() {
        let stream = tokenize("");
        assert!(stream.tokens.is_empty());
        assert!(!stream.has_warnings());
    }
}
