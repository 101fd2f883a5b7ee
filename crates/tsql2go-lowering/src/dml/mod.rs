// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Pluggable DML back-end dispatch (spec §4.4).
//!
//! Each backend renders the same statement shapes (`SELECT`, `INSERT`,
//! `UPDATE`, `DELETE`, `MERGE`, `EXEC`) into a different Go call
//! surface. The dispatcher in [`lower_statement`] picks the module by
//! [`tsql2go_ast::Backend`]; callers never match on the backend
//! themselves.

mod inline;
mod mock;
mod rpc;
mod sql;

use tsql2go_ast::{Backend, DeleteStatement, InsertStatement, MergeStatement, SelectStatement, UpdateStatement};
use tsql2go_functions::FunctionRegistry;
use tsql2go_semantic::SemanticAnalyzer;

use crate::context::UnitContext;
use crate::error::LoweringResult;

/// Inputs every backend needs, bundled so the dispatcher's match arms
/// stay one line each.
pub struct DmlCall<'a> {
    pub ctx: &'a mut UnitContext,
    pub analyzer: &'a mut SemanticAnalyzer,
    pub functions: &'a FunctionRegistry,
}

pub fn lower_select(
    call: DmlCall<'_>,
    select: &SelectStatement,
) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_select(call, select),
        Backend::Rpc => rpc::lower_select(call, select),
        Backend::Mock => mock::lower_select(call, select),
        Backend::Inline => inline::lower_select(call, select),
    }
}

pub fn lower_insert(call: DmlCall<'_>, insert: &InsertStatement) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_insert(call, insert),
        Backend::Rpc => rpc::lower_insert(call, insert),
        Backend::Mock => mock::lower_insert(call, insert),
        Backend::Inline => inline::lower_insert(call, insert),
    }
}

pub fn lower_update(call: DmlCall<'_>, update: &UpdateStatement) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_update(call, update),
        Backend::Rpc => rpc::lower_update(call, update),
        Backend::Mock => mock::lower_update(call, update),
        Backend::Inline => inline::lower_update(call, update),
    }
}

pub fn lower_delete(call: DmlCall<'_>, delete: &DeleteStatement) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_delete(call, delete),
        Backend::Rpc => rpc::lower_delete(call, delete),
        Backend::Mock => mock::lower_delete(call, delete),
        Backend::Inline => inline::lower_delete(call, delete),
    }
}

pub fn lower_merge(call: DmlCall<'_>, merge: &MergeStatement) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_merge(call, merge),
        Backend::Rpc => rpc::lower_merge(call, merge),
        Backend::Mock => mock::lower_merge(call, merge),
        Backend::Inline => inline::lower_merge(call, merge),
    }
}

pub fn lower_exec(call: DmlCall<'_>, target: &str, args: &[tsql2go_ast::Expr]) -> LoweringResult<String> {
    match call.ctx.backend {
        Backend::Sql => sql::lower_exec(call, target, args),
        Backend::Rpc => rpc::lower_exec(call, target, args),
        Backend::Mock => mock::lower_exec(call, target, args),
        Backend::Inline => inline::lower_exec(call, target, args),
    }
}
