// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-semantic
//!
//! The Semantic Analyzer (spec §4.2): walks a parsed batch bottom-up,
//! assigning a [`tsql2go_ast::TypeDescriptor`] to every expression and
//! tracking local/parameter symbols through a stack of lexical scopes
//! that mirror the procedural control-flow blocks of spec §3.3.

mod analyzer;
mod error;
mod scope;
mod symbol;

pub use analyzer::SemanticAnalyzer;
pub use error::{SemanticError, SemanticResult};
pub use scope::{Scope, ScopeManager, ScopeType};
pub use symbol::Symbol;
