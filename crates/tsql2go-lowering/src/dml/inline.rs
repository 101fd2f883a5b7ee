// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `inline` backend (spec §4.4): direct calls into a structured-data
//! runtime library (`tsql2gort/store`), for targets with no SQL driver
//! or RPC peer at all — the store variable's methods take and return
//! plain Go structs.

use tsql2go_ast::{DeleteStatement, Expr, InsertStatement, MergeStatement, SelectStatement, TableRef, UpdateStatement};

use crate::dml::DmlCall;
use crate::error::LoweringResult;
use crate::expr::ExprLowerer;

fn pascal(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn store_call(call: &mut DmlCall<'_>, method: &str, table: &TableRef, extra_args: Vec<String>) -> String {
    call.ctx.add_import("context");
    let store = call.ctx.config.store_var.clone();
    let ctx_arg = call.ctx.config.context_arg.clone();
    let mut args = vec![ctx_arg];
    args.extend(extra_args);
    format!("{store}.{method}{}({})", pascal(&table.name), args.join(", "))
}

pub fn lower_select(mut call: DmlCall<'_>, select: &SelectStatement) -> LoweringResult<String> {
    let Some(from) = &select.from else {
        return Ok("nil /* TODO: SELECT without FROM has no inline equivalent */".to_string());
    };
    let mut extra = Vec::new();
    if let Some(where_clause) = &select.where_clause {
        extra.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(where_clause)?);
    }
    Ok(store_call(&mut call, "List", from, extra))
}

pub fn lower_insert(mut call: DmlCall<'_>, insert: &InsertStatement) -> LoweringResult<String> {
    Ok(store_call(&mut call, "Insert", &insert.table, vec!["record".to_string()]))
}

pub fn lower_update(mut call: DmlCall<'_>, update: &UpdateStatement) -> LoweringResult<String> {
    if update.where_clause.is_none() {
        call.ctx.diagnostics.push(tsql2go_ast::Diagnostic::UpdateWithoutWhere {
            table: update.table.name.clone(),
        });
    }
    let mut extra = vec!["record".to_string()];
    if let Some(where_clause) = &update.where_clause {
        extra.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(where_clause)?);
    }
    Ok(store_call(&mut call, "Update", &update.table, extra))
}

pub fn lower_delete(mut call: DmlCall<'_>, delete: &DeleteStatement) -> LoweringResult<String> {
    if delete.where_clause.is_none() {
        call.ctx.diagnostics.push(tsql2go_ast::Diagnostic::DeleteWithoutWhere {
            table: delete.table.name.clone(),
        });
    }
    let mut extra = Vec::new();
    if let Some(where_clause) = &delete.where_clause {
        extra.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(where_clause)?);
    }
    Ok(store_call(&mut call, "Delete", &delete.table, extra))
}

pub fn lower_merge(mut call: DmlCall<'_>, merge: &MergeStatement) -> LoweringResult<String> {
    Ok(store_call(&mut call, "Upsert", &merge.target, vec!["record".to_string()]))
}

pub fn lower_exec(mut call: DmlCall<'_>, target: &str, args: &[Expr]) -> LoweringResult<String> {
    call.ctx.add_import("context");
    let mut rendered = Vec::with_capacity(args.len());
    for arg in args {
        rendered.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(arg)?);
    }
    let store = call.ctx.config.store_var.clone();
    let ctx_arg = call.ctx.config.context_arg.clone();
    Ok(format!("{store}.{}({ctx_arg}, {})", pascal(target), rendered.join(", ")))
}
