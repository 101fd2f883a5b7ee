// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-ast
//!
//! Data model consumed by the rest of the transpiler: the input AST
//! contract delivered by an external T-SQL parser, the type descriptor
//! assigned by the semantic analyzer, and the configuration/diagnostic
//! surface exposed to callers.
//!
//! This crate defines types, not behavior. The parser that produces
//! [`Statement`]/[`Expr`] trees and the proto parser that produces
//! [`proc::ProcedureSummary`] siblings are external collaborators; this
//! crate only fixes the shape the rest of the workspace agrees on.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod expr;
pub mod proc;
pub mod stmt;
pub mod types;

pub use backend::Backend;
pub use config::{AnnotateLevel, Config, DdlPolicy, NewIdMode, SpLogger};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use dialect::Dialect;
pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
pub use proc::{ParameterSummary, ProcedureSummary, ResultSetSummary};
pub use stmt::{
    Assignment, Batch, CatchBlock, CommonTableExpr, CursorDecl, DeleteStatement, InsertSource,
    InsertStatement, MergeStatement, ParamDecl, ResolvedLocal, SelectItem, SelectStatement,
    Statement, TableRef, TryCatch, UpdateStatement,
};
pub use types::{TargetType, TypeDescriptor};
