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

//! Scope directory.
//!
//! All scopes of a program live in one arena and refer to each other by
//! [`ScopeId`]. A stack of open scopes drives name resolution: lookups
//! search from the innermost open scope outwards.

use super::symbol::Symbol;
use super::symbol_table::SymbolTable;

/// Handle of a scope in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The global scope, always the first one.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// What opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Main,
    Block,
}

/// Which family of segments declarations in a scope are assigned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// `global-<type>` segments.
    Global,
    /// `local-<type>` segments of the named function.
    Local(String),
}

/// One lexical scope.
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub storage: Storage,
    pub symbols: SymbolTable,
}

/// Arena of scopes plus the stack of currently open ones.
#[derive(Debug)]
pub struct ScopeDirectory {
    scopes: Vec<Scope>,
    open: Vec<ScopeId>,
}

impl ScopeDirectory {
    /// Create a directory with the global scope open.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                name: "global".to_string(),
                kind: ScopeKind::Global,
                parent: None,
                storage: Storage::Global,
                symbols: SymbolTable::new(),
            }],
            open: vec![ScopeId::GLOBAL],
        }
    }

    /// Open a new scope nested in the current one.
    ///
    /// Function scopes switch to local storage keyed by their name;
    /// every other scope inherits the storage of its parent.
    pub fn enter(&mut self, name: impl Into<String>, kind: ScopeKind) -> ScopeId {
        let name = name.into();
        let parent = self.current();
        let storage = match kind {
            ScopeKind::Function => Storage::Local(name.clone()),
            ScopeKind::Global | ScopeKind::Main => Storage::Global,
            ScopeKind::Block => self.scope(parent).storage.clone(),
        };

        let id = ScopeId(self.scopes.len());
        log::debug!("enter scope {} ({:?}, depth {})", name, kind, self.open.len());
        self.scopes.push(Scope {
            name,
            kind,
            parent: Some(parent),
            storage,
            symbols: SymbolTable::new(),
        });
        self.open.push(id);
        id
    }

    /// Close the innermost scope.
    ///
    /// Panics when asked to close the global scope.
    pub fn exit(&mut self) -> ScopeId {
        assert!(self.open.len() > 1, "cannot close the global scope");
        let id = self.open.pop().expect("scope stack is not empty");
        log::debug!("exit scope {}", self.scope(id).name);
        id
    }

    /// The innermost open scope.
    pub fn current(&self) -> ScopeId {
        *self.open.last().expect("global scope is always open")
    }

    /// Storage of the innermost open scope.
    pub fn storage(&self) -> &Storage {
        &self.scope(self.current()).storage
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    /// Define a symbol in the innermost open scope.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        let current = self.current();
        self.scope_mut(current).symbols.define(symbol)
    }

    /// Resolve a name, searching from innermost to outermost open scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.open
            .iter()
            .rev()
            .find_map(|id| self.scope(*id).symbols.lookup(name))
    }

    /// Resolve a name (mutable).
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let owner = self
            .open
            .iter()
            .rev()
            .copied()
            .find(|id| self.scope(*id).symbols.lookup(name).is_some())?;
        self.scope_mut(owner).symbols.lookup_mut(name)
    }

    /// Number of scopes ever opened, the global one included.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::memory::Address;
    use crate::semantic::DataType;

    fn var(name: &str, raw: u32) -> Symbol {
        Symbol::variable(name, DataType::Int, Address::new(raw), Span::new(0, 0))
    }

    #[test]
    fn test_global_scope_is_open() {
        let directory = ScopeDirectory::new();
        assert_eq!(directory.current(), ScopeId::GLOBAL);
        assert_eq!(directory.depth(), 1);
        assert_eq!(directory.storage(), &Storage::Global);
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut directory = ScopeDirectory::new();
        directory.define(var("a", 10_000)).unwrap();
        let existing = directory.define(var("a", 10_001)).unwrap_err();
        assert_eq!(existing.address, Address::new(10_000));
    }

    #[test]
    fn test_shadowing_in_nested_scope() {
        let mut directory = ScopeDirectory::new();
        directory.define(var("a", 10_000)).unwrap();
        directory.enter("f", ScopeKind::Function);
        directory.define(var("a", 90_000)).unwrap();

        assert_eq!(directory.lookup("a").map(|s| s.address.value()), Some(90_000));
        directory.exit();
        assert_eq!(directory.lookup("a").map(|s| s.address.value()), Some(10_000));
    }

    #[test]
    fn test_closed_scopes_are_not_searched() {
        let mut directory = ScopeDirectory::new();
        directory.enter("f", ScopeKind::Function);
        directory.define(var("x", 90_000)).unwrap();
        directory.exit();
        directory.enter("main", ScopeKind::Main);
        assert!(directory.lookup("x").is_none());
    }

    #[test]
    fn test_storage_follows_scope_kind() {
        let mut directory = ScopeDirectory::new();
        directory.enter("f", ScopeKind::Function);
        directory.enter("block", ScopeKind::Block);
        assert_eq!(directory.storage(), &Storage::Local("f".into()));
        directory.exit();
        directory.exit();

        directory.enter("main", ScopeKind::Main);
        directory.enter("block", ScopeKind::Block);
        assert_eq!(directory.storage(), &Storage::Global);
    }

    #[test]
    fn test_lookup_mut_finds_outer_symbol() {
        let mut directory = ScopeDirectory::new();
        directory.define(var("a", 10_000)).unwrap();
        let child = directory.enter("main", ScopeKind::Main);
        directory.lookup_mut("a").unwrap().children = Some(child);
        let global = &directory.scope(ScopeId::GLOBAL).symbols;
        assert_eq!(global.lookup("a").unwrap().children, Some(child));
    }

    #[test]
    #[should_panic(expected = "cannot close the global scope")]
    fn test_exit_global_panics() {
        ScopeDirectory::new().exit();
    }
}
