// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statements
//!
//! Statement node shapes the external T-SQL parser is assumed to deliver
//! (spec §3.1): procedures, functions, the full procedural-control subset,
//! DML, cursors, transactions, DDL and error-signalling statements.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::types::TypeDescriptor;

/// One parsed batch: zero or more independent top-level units (spec §2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Batch {
    pub units: Vec<Statement>,
}

/// A declared procedure/function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub declared_type: String,
    pub output: bool,
    pub default: Option<Expr>,
}

/// `DECLARE <name> CURSOR FOR <select>` plus the `FETCH INTO` variables
/// recorded once seen (spec §4.3.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorDecl {
    pub name: String,
    pub query: Box<Statement>,
    pub fetch_into: Vec<String>,
}

/// `BEGIN TRY ... END TRY BEGIN CATCH ... END CATCH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryCatch {
    pub try_body: Vec<Statement>,
    pub catch: CatchBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchBlock {
    pub body: Vec<Statement>,
}

/// A column assigned from a `SET @a = col` or `UPDATE ... SET col = expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
}

/// A T-SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Statement {
    Procedure {
        name: String,
        params: Vec<ParamDecl>,
        body: Vec<Statement>,
    },
    Function {
        name: String,
        params: Vec<ParamDecl>,
        returns: String,
        body: Vec<Statement>,
    },

    Declare {
        name: String,
        declared_type: String,
        init: Option<Expr>,
        /// `DECLARE @t TABLE (...)` - a table-valued local, handled as a
        /// temp table by the runtime temp-table manager (spec §3.4,
        /// Glossary "Temp table").
        is_table: bool,
    },
    Set {
        target: String,
        value: Expr,
        /// `SET @xml.modify(...)`-style method-call statement form
        /// (spec §4.3.2); `value` holds the full call expression and
        /// `target` is empty in this form.
        is_method_call: bool,
    },

    If {
        condition: Expr,
        then_branch: Vec<Statement>,
        /// `Some(vec![Statement::If { .. }])` for an `ELSE IF` chain, per
        /// spec §4.3.3's "proper else-if chaining".
        else_branch: Option<Vec<Statement>>,
    },
    While {
        condition: Expr,
        body: Vec<Statement>,
    },
    Break,
    Continue,
    Block(Vec<Statement>),

    TryCatch(TryCatch),

    Return(Option<Expr>),
    Print(Expr),

    Select(Box<SelectStatement>),
    Insert(Box<InsertStatement>),
    Update(Box<UpdateStatement>),
    Delete(Box<DeleteStatement>),
    Merge(Box<MergeStatement>),
    Exec {
        target: String,
        args: Vec<Expr>,
    },

    With {
        ctes: Vec<CommonTableExpr>,
        body: Box<Statement>,
    },

    BeginTransaction,
    Commit,
    Rollback,

    CreateTable {
        name: String,
        is_temp: bool,
        columns: Vec<(String, String)>,
    },
    DropTable {
        name: String,
    },
    TruncateTable {
        name: String,
    },
    /// Any DDL the core does not model structurally (ALTER, CREATE
    /// VIEW/INDEX/SEQUENCE, ...), preserved verbatim for the
    /// `ddl-policy=extract` path (spec §4.7, §6).
    OtherDdl {
        kind: String,
        verbatim: String,
    },

    CursorDeclare(Box<CursorDecl>),
    CursorOpen(String),
    CursorFetchNext {
        cursor: String,
        into: Vec<String>,
    },
    CursorClose(String),
    CursorDeallocate(String),

    RaisError {
        message: Expr,
        severity: Expr,
        state: Expr,
        args: Vec<Expr>,
    },
    /// `THROW num, msg, state` or bare `THROW` (re-throw), the latter
    /// represented with all fields `None`.
    Throw {
        number: Option<Expr>,
        message: Option<Expr>,
        state: Option<Expr>,
    },

    /// An expression evaluated for its side effect only (rare, but the
    /// parser may deliver e.g. a bare method-call statement that isn't
    /// folded into `Set { is_method_call: true, .. }`).
    ExprStatement(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
    /// `SELECT @a = col` assignment-select form (spec §4.3.2).
    pub assign_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
    /// Table hints such as `WITH (NOLOCK)`, stripped during SQL
    /// re-serialization (spec §4.4.1) but retained here for fidelity.
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub joins: Vec<(TableRef, Expr)>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<(Expr, bool)>,
    pub top: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Select(Box<SelectStatement>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub table: TableRef,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStatement {
    pub target: TableRef,
    pub source: TableRef,
    pub on: Expr,
    /// Verbatim fragments for each `WHEN [NOT] MATCHED THEN ...` clause;
    /// the core treats MERGE as an opaque multi-clause statement for
    /// back-end dispatch purposes (it is lowered as a single exec call,
    /// spec §4.4.1) rather than decomposing each branch structurally.
    pub when_clauses: Vec<String>,
}

/// Declared type metadata for a local/parameter as the analyzer resolves
/// it. Not part of the parser's AST; produced by the semantic analyzer
/// and threaded alongside `Statement::Declare`/`ParamDecl` during
/// lowering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocal {
    pub name: String,
    pub descriptor: TypeDescriptor,
}
