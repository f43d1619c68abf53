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

//! Semantic model shared by the translator.
//!
//! This module provides:
//! - The static data types of the language
//! - The semantic compatibility table used for type checking
//! - Symbols, per-scope symbol tables and the scope directory

pub mod cube;
mod scope;
mod symbol;
mod symbol_table;
mod types;

pub use cube::{is_assignable, result_type, TypeError};
pub use scope::{Scope, ScopeDirectory, ScopeId, ScopeKind, Storage};
pub use symbol::{FunctionInfo, Symbol, SymbolKind};
pub use symbol_table::SymbolTable;
pub use types::DataType;
