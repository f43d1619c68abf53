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

//! Intermediate representation.
//!
//! Programs are translated into a flat list of quadruples
//! `(operator, arg1, arg2, result)`. Forward jumps are emitted with an
//! unset result and filled in later (backpatching).

mod operator;
mod program;
mod quadruple;

pub use operator::{Operator, ResultKind};
pub use program::CompiledProgram;
pub use quadruple::{Quadruple, QuadrupleIndex, QuadrupleStore, Target};
