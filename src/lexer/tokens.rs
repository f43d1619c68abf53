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

//! Token definitions for the Ente language.

use logos::Logos;

/// A token in the Ente language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*)")]
pub enum Token {
    // Literals
    /// Integer literal, kept as text until the translator interns it.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLiteral(String),
    /// Float literal such as `3.14` or `1.5e-3`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    FloatLiteral(String),
    /// String literal with its quotes stripped.
    #[regex(r#""[^"]*""#, |lex| {
        let text = lex.slice();
        text[1..text.len() - 1].to_string()
    })]
    StringLiteral(String),
    /// Identifier (variable, function or program name).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Structure keywords
    /// `program` - program header.
    #[token("program")]
    Program,
    /// `main` - program body.
    #[token("main")]
    Main,
    /// `end` - end of program.
    #[token("end")]
    End,
    /// `var` - variable declarations.
    #[token("var")]
    Var,
    /// `void` - function declaration.
    #[token("void")]
    Void,

    // Type keywords
    /// `int` - integer type.
    #[token("int")]
    Int,
    /// `float` - floating-point type.
    #[token("float")]
    Float,
    /// `string` - string type.
    #[token("string")]
    StringType,

    // Statement keywords
    /// `write` or `printf` - print values.
    #[token("write")]
    #[token("printf")]
    Write,
    /// `if` - conditional statement.
    #[token("if")]
    If,
    /// `else` - else branch.
    #[token("else")]
    Else,
    /// `while` - while loop.
    #[token("while")]
    While,
    /// `do` - do/while loop.
    #[token("do")]
    Do,

    // Arithmetic operators
    /// `+` - addition.
    #[token("+")]
    Plus,
    /// `-` - subtraction.
    #[token("-")]
    Minus,
    /// `*` - multiplication.
    #[token("*")]
    Star,
    /// `/` - division.
    #[token("/")]
    Slash,

    // Relational operators
    /// `<` - less than.
    #[token("<")]
    Less,
    /// `>` - greater than.
    #[token(">")]
    Greater,
    /// `<=` - less or equal.
    #[token("<=")]
    LessEqual,
    /// `>=` - greater or equal.
    #[token(">=")]
    GreaterEqual,
    /// `==` - equal.
    #[token("==")]
    EqualEqual,
    /// `!=` - not equal.
    #[token("!=")]
    BangEqual,

    /// `=` - assignment.
    #[token("=")]
    Equal,

    // Delimiters
    /// `(` - left parenthesis.
    #[token("(")]
    LeftParen,
    /// `)` - right parenthesis.
    #[token(")")]
    RightParen,
    /// `{` - left brace.
    #[token("{")]
    LeftBrace,
    /// `}` - right brace.
    #[token("}")]
    RightBrace,
    /// `[` - left bracket.
    #[token("[")]
    LeftBracket,
    /// `]` - right bracket.
    #[token("]")]
    RightBracket,
    /// `:` - colon.
    #[token(":")]
    Colon,
    /// `;` - semicolon.
    #[token(";")]
    Semicolon,
    /// `,` - comma.
    #[token(",")]
    Comma,
}

impl Token {
    /// Check if this token is a type keyword.
    pub fn is_type(&self) -> bool {
        matches!(self, Token::Int | Token::Float | Token::StringType)
    }

    /// Check if this token is a relational operator.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Token::Less
                | Token::Greater
                | Token::LessEqual
                | Token::GreaterEqual
                | Token::EqualEqual
                | Token::BangEqual
        )
    }

    /// Check if this token is an additive operator.
    pub fn is_additive(&self) -> bool {
        matches!(self, Token::Plus | Token::Minus)
    }

    /// Check if this token is a multiplicative operator.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Token::Star | Token::Slash)
    }

    /// Get a human-readable name for this token type.
    pub fn name(&self) -> &'static str {
        match self {
            Token::IntLiteral(_) => "integer",
            Token::FloatLiteral(_) => "float",
            Token::StringLiteral(_) => "string",
            Token::Identifier(_) => "identifier",
            Token::Program => "'program'",
            Token::Main => "'main'",
            Token::End => "'end'",
            Token::Var => "'var'",
            Token::Void => "'void'",
            Token::Int => "'int'",
            Token::Float => "'float'",
            Token::StringType => "'string'",
            Token::Write => "'write'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::Do => "'do'",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Less => "'<'",
            Token::Greater => "'>'",
            Token::LessEqual => "'<='",
            Token::GreaterEqual => "'>='",
            Token::EqualEqual => "'=='",
            Token::BangEqual => "'!='",
            Token::Equal => "'='",
            Token::LeftParen => "'('",
            Token::RightParen => "')'",
            Token::LeftBrace => "'{'",
            Token::RightBrace => "'}'",
            Token::LeftBracket => "'['",
            Token::RightBracket => "']'",
            Token::Colon => "':'",
            Token::Semicolon => "';'",
            Token::Comma => "','",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::IntLiteral(text) | Token::FloatLiteral(text) => write!(f, "{}", text),
            Token::StringLiteral(text) => write!(f, "\"{}\"", text),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_type() {
        assert!(Token::Int.is_type());
        assert!(Token::StringType.is_type());
        assert!(!Token::Var.is_type());
    }

    #[test]
    fn test_operator_classes() {
        assert!(Token::LessEqual.is_relational());
        assert!(Token::Minus.is_additive());
        assert!(Token::Slash.is_multiplicative());
        assert!(!Token::Equal.is_relational());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Semicolon.to_string(), "';'");
        assert_eq!(Token::IntLiteral("42".into()).to_string(), "42");
        assert_eq!(
            Token::Identifier("total".into()).to_string(),
            "identifier 'total'"
        );
    }
}
