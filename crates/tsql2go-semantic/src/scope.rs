// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Scope stack for procedural control flow (spec §3.3).
//!
//! A new scope is pushed for each `IF` consequence/alternative, `WHILE`
//! body, `TRY`/`CATCH` block, and cursor loop body, and popped when the
//! block closes. Locals declared in a scope that are never read before
//! it pops are reported so the lowering engine can emit the target
//! language's unread-variable suppression directive (spec §4.2, §4.3.3).

use crate::error::{SemanticError, SemanticResult};
use crate::symbol::Symbol;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeType {
    Procedure,
    IfConsequence,
    IfAlternative,
    WhileBody,
    TryBlock,
    CatchBlock,
    CursorLoop,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: usize,
    pub parent_id: Option<usize>,
    pub scope_type: ScopeType,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    fn new(id: usize, parent_id: Option<usize>, scope_type: ScopeType) -> Self {
        Self {
            id,
            parent_id,
            scope_type,
            symbols: HashMap::new(),
        }
    }
}

/// Owns the stack of active scopes and the flat arena of all scopes
/// created during one procedure's analysis (closed scopes stay around
/// so their unread-symbol report can still be queried after pop).
#[derive(Debug, Clone)]
pub struct ScopeManager {
    arena: Vec<Scope>,
    stack: Vec<usize>,
}

impl ScopeManager {
    pub fn new() -> Self {
        let root = Scope::new(0, None, ScopeType::Procedure);
        Self {
            arena: vec![root],
            stack: vec![0],
        }
    }

    pub fn current_id(&self) -> usize {
        *self.stack.last().expect("root scope is never popped")
    }

    pub fn push(&mut self, scope_type: ScopeType) -> usize {
        let id = self.arena.len();
        let parent = self.current_id();
        self.arena.push(Scope::new(id, Some(parent), scope_type));
        self.stack.push(id);
        id
    }

    /// Pops the current scope and returns the names of locals declared
    /// in it that were never read (spec §4.2 unread-variable
    /// suppression directive).
    pub fn pop(&mut self) -> SemanticResult<Vec<String>> {
        if self.stack.len() <= 1 {
            return Err(SemanticError::ScopeUnderflow);
        }
        let id = self.stack.pop().expect("checked above");
        let scope = &self.arena[id];
        let unread = scope
            .symbols
            .values()
            .filter(|s| s.is_unread())
            .map(|s| s.name.clone())
            .collect();
        Ok(unread)
    }

    pub fn declare(&mut self, symbol: Symbol) -> SemanticResult<()> {
        let id = self.current_id();
        let scope = &mut self.arena[id];
        if scope.symbols.contains_key(&symbol.name) {
            return Err(SemanticError::DuplicateDeclaration(symbol.name));
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Resolves a name by walking from the current scope up to the root.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = Some(self.current_id());
        while let Some(id) = scope_id {
            let scope = &self.arena[id];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            scope_id = scope.parent_id;
        }
        None
    }

    /// Marks `name` read in whichever ancestor scope declared it.
    pub fn mark_read(&mut self, name: &str) -> SemanticResult<()> {
        let mut scope_id = Some(self.current_id());
        while let Some(id) = scope_id {
            let scope = &mut self.arena[id];
            if let Some(symbol) = scope.symbols.get_mut(name) {
                symbol.mark_read();
                return Ok(());
            }
            scope_id = scope.parent_id;
        }
        Err(SemanticError::UndeclaredVariable(name.to_string()))
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}
