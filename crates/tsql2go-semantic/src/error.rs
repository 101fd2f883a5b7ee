// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for semantic analysis.

use thiserror::Error;

pub type SemanticResult<T> = Result<T, SemanticError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    #[error("undeclared variable: {0}")]
    UndeclaredVariable(String),

    #[error("variable already declared in this scope: {0}")]
    DuplicateDeclaration(String),

    #[error("no enclosing scope to pop")]
    ScopeUnderflow,

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("function '{name}' expects {min}..{max:?} argument(s) but found {found}")]
    FunctionArity {
        name: String,
        min: usize,
        max: Option<usize>,
        found: usize,
    },

    #[error("ERROR_* accessor '{0}' used outside a CATCH block")]
    ErrorAccessorOutsideCatch(String),

    #[error("cannot resolve a target type for CAST/CONVERT target name: {0}")]
    UnknownCastTarget(String),
}
