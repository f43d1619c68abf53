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

//! Quadruple operators and their stable integer codes.

/// Operation performed by one quadruple.
///
/// The discriminants are the codes written to compiled IR files and must
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operator {
    Goto = 1,
    Assign = 2,
    Print = 3,
    GotoF = 4,
    GotoT = 5,
    Gosub = 6,
    Era = 8,
    EndFunc = 9,
    Param = 10,
    Subtract = 12,
    Add = 13,
    Multiply = 14,
    Divide = 15,
    LessThan = 16,
    GreaterThan = 17,
    LessEqual = 18,
    GreaterEqual = 19,
    Equal = 20,
    NotEqual = 21,
}

/// What the result field of a quadruple refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// The result field is unused.
    None,
    /// A data address.
    Address,
    /// A quadruple index (jump target or function entry).
    Index,
}

impl Operator {
    /// Every operator, ordered by code.
    pub const ALL: [Operator; 19] = [
        Operator::Goto,
        Operator::Assign,
        Operator::Print,
        Operator::GotoF,
        Operator::GotoT,
        Operator::Gosub,
        Operator::Era,
        Operator::EndFunc,
        Operator::Param,
        Operator::Subtract,
        Operator::Add,
        Operator::Multiply,
        Operator::Divide,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::Equal,
        Operator::NotEqual,
    ];

    /// The integer code of this operator.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an operator by its integer code.
    pub fn from_code(code: i64) -> Option<Operator> {
        Self::ALL
            .into_iter()
            .find(|operator| i64::from(operator.code()) == code)
    }

    /// Check if this is a jump whose target can be backpatched.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Operator::Goto | Operator::GotoF | Operator::GotoT | Operator::Gosub
        )
    }

    /// Check if this is a binary arithmetic operator.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide
        )
    }

    /// Check if this is a relational or equality operator.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::GreaterThan
                | Operator::LessEqual
                | Operator::GreaterEqual
                | Operator::Equal
                | Operator::NotEqual
        )
    }

    /// What the result field of this operator holds.
    pub fn result_kind(self) -> ResultKind {
        match self {
            Operator::Goto
            | Operator::GotoF
            | Operator::GotoT
            | Operator::Gosub
            | Operator::Era => ResultKind::Index,
            Operator::Print | Operator::EndFunc => ResultKind::None,
            _ => ResultKind::Address,
        }
    }

    /// Source-level symbol of an expression operator.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Operator::Assign => Some("="),
            Operator::Add => Some("+"),
            Operator::Subtract => Some("-"),
            Operator::Multiply => Some("*"),
            Operator::Divide => Some("/"),
            Operator::LessThan => Some("<"),
            Operator::GreaterThan => Some(">"),
            Operator::LessEqual => Some("<="),
            Operator::GreaterEqual => Some(">="),
            Operator::Equal => Some("=="),
            Operator::NotEqual => Some("!="),
            _ => None,
        }
    }

    /// Mnemonic used in listings.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Goto => "GOTO",
            Operator::Assign => "ASSIGN",
            Operator::Print => "PRINT",
            Operator::GotoF => "GOTOF",
            Operator::GotoT => "GOTOT",
            Operator::Gosub => "GOSUB",
            Operator::Era => "ERA",
            Operator::EndFunc => "ENDFUNC",
            Operator::Param => "PARAM",
            Operator::Subtract => "SUBTRACT",
            Operator::Add => "ADD",
            Operator::Multiply => "MULTIPLY",
            Operator::Divide => "DIVIDE",
            Operator::LessThan => "LESS_THAN",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessEqual => "LESS_EQUAL",
            Operator::GreaterEqual => "GREATER_EQUAL",
            Operator::Equal => "EQUAL",
            Operator::NotEqual => "NOT_EQUAL",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
