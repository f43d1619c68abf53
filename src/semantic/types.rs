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

//! Data types of the Ente language.

/// A static type known to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Signed 64-bit integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Text (literals only).
    String,
    /// Result of a relational operator; never declared.
    Bool,
    /// Function result type.
    Void,
    /// Marker type of the program symbol.
    GlobalTable,
    /// Marker type of a function symbol.
    LocalTable,
}

impl DataType {
    /// Check if this type can take part in arithmetic and comparisons.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float | DataType::Bool)
    }

    /// Get a human-readable name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Bool => "bool",
            DataType::Void => "void",
            DataType::GlobalTable => "table.global",
            DataType::LocalTable => "table.local",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_types() {
        assert!(DataType::Int.is_numeric());
        assert!(DataType::Float.is_numeric());
        assert!(DataType::Bool.is_numeric());
        assert!(!DataType::String.is_numeric());
        assert!(!DataType::LocalTable.is_numeric());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(DataType::GlobalTable.to_string(), "table.global");
        assert_eq!(DataType::LocalTable.to_string(), "table.local");
        assert_eq!(DataType::Float.to_string(), "float");
    }
}
