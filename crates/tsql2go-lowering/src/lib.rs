// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-lowering
//!
//! Procedural, DML and expression lowering (spec §4): turns a single
//! top-level unit's AST into Go source text for that unit's function
//! body, plus the signature and import set the assembly stage splices
//! around it.
//!
//! This crate lowers one unit at a time and knows nothing about how
//! units are combined into a package — that is `tsql2go-transpile`'s
//! job (spec §4.1, §4.7).

mod context;
mod dml;
mod error;
mod expr;
mod procedure;
mod stmt;

pub use context::UnitContext;
pub use error::{LoweringError, LoweringResult};
pub use procedure::{lower_function, lower_procedure, UnitOutput};

use std::collections::HashMap;

use tsql2go_ast::{Config, Dialect, ProcedureSummary, Statement};
use tsql2go_comments::CommentIndex;
use tsql2go_functions::FunctionRegistry;

/// Lowers one top-level unit (a `Procedure` or `Function` statement).
/// Any other statement shape is a driver error, not a lowering one —
/// the unit driver (spec §3) is responsible for only handing procedural
/// units to this entry point. `comments` is shared across every unit in
/// the batch — it is keyed by statement signature, not position, so the
/// same index serves every unit's lookups (spec §4.1).
pub fn lower_unit(
    unit: &Statement,
    config: Config,
    dialect: Dialect,
    functions: &FunctionRegistry,
    udf_signatures: HashMap<String, ProcedureSummary>,
    comments: CommentIndex,
) -> LoweringResult<UnitOutput> {
    match unit {
        Statement::Procedure { name, params, body } => {
            lower_procedure(name, params, body, config, dialect, functions, udf_signatures, comments)
        }
        Statement::Function {
            name,
            params,
            returns,
            body,
        } => lower_function(
            name,
            params,
            returns,
            body,
            config,
            dialect,
            functions,
            udf_signatures,
            comments,
        ),
        other => Err(LoweringError::UnknownProcedureSignature(format!(
            "{other:?} is not a procedural unit"
        ))),
    }
}
