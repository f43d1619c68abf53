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

//! Symbol definitions.

use super::scope::ScopeId;
use super::types::DataType;
use crate::error::Span;
use crate::ir::QuadrupleIndex;
use crate::memory::Address;

/// Symbol table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The symbol name.
    pub name: String,
    /// Static type; scope containers carry a marker type.
    pub data_type: DataType,
    /// Address assigned at declaration. Never changes afterwards.
    pub address: Address,
    /// Nested scope, for symbols that own one.
    pub children: Option<ScopeId>,
    /// What kind of entity this is.
    pub kind: SymbolKind,
    /// Where the symbol was declared.
    pub span: Span,
}

/// The kind of entity a symbol names.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// A declared variable or parameter.
    Variable,
    /// A function declaration.
    Function(FunctionInfo),
    /// The program itself.
    Program,
}

/// Call information of a function symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    /// Index of the function's first quadruple.
    pub entry: QuadrupleIndex,
    /// Parameter types and the local addresses they are passed into.
    pub params: Vec<(DataType, Address)>,
}

impl Symbol {
    /// Create a variable symbol.
    pub fn variable(
        name: impl Into<String>,
        data_type: DataType,
        address: Address,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            address,
            children: None,
            kind: SymbolKind::Variable,
            span,
        }
    }

    /// Create a function symbol. Its parameters are added while the
    /// parameter list is translated.
    pub fn function(
        name: impl Into<String>,
        address: Address,
        entry: QuadrupleIndex,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::LocalTable,
            address,
            children: None,
            kind: SymbolKind::Function(FunctionInfo {
                entry,
                params: Vec::new(),
            }),
            span,
        }
    }

    /// Create the program symbol.
    pub fn program(name: impl Into<String>, address: Address, span: Span) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::GlobalTable,
            address,
            children: None,
            kind: SymbolKind::Program,
            span,
        }
    }

    /// Get the call information of a function symbol.
    pub fn function_info(&self) -> Option<&FunctionInfo> {
        match &self.kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    /// Get the call information of a function symbol (mutable).
    pub fn function_info_mut(&mut self) -> Option<&mut FunctionInfo> {
        match &mut self.kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    /// Check if this symbol names a value that can appear in an expression.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable)
    }
}
