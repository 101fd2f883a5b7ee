// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `rpc` backend (spec §4.4.2): infers an entity/method name from the
//! statement's table and operation class, and renders a call against
//! the configured proto client.

use tsql2go_ast::{
    Diagnostic, DeleteStatement, Expr, InsertStatement, MergeStatement, SelectStatement, TableRef,
    UpdateStatement,
};
use tsql2go_catalog::OperationClass;

use crate::dml::DmlCall;
use crate::error::LoweringResult;
use crate::expr::ExprLowerer;

fn singularize(table: &str) -> String {
    let trimmed = table.trim_start_matches('#');
    trimmed
        .strip_suffix("ies")
        .map(|s| format!("{s}y"))
        .or_else(|| trimmed.strip_suffix('s').map(|s| s.to_string()))
        .unwrap_or_else(|| trimmed.to_string())
}

fn pascal(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect()
}

fn method_name(class: OperationClass, table: &str) -> String {
    format!("{}{}", class.verb(), pascal(&singularize(table)))
}

fn temp_table_fallback(call: &mut DmlCall<'_>, table: &TableRef) -> bool {
    if table.name.starts_with('#') {
        call.ctx.diagnostics.push(Diagnostic::TempTableRpcFallback {
            table: table.name.clone(),
            fallback: "sql".to_string(),
        });
        true
    } else {
        false
    }
}

fn render_request_fields(call: &mut DmlCall<'_>, expr: &Expr, fields: &mut Vec<(String, String)>) -> LoweringResult<()> {
    if let Expr::Infix {
        left,
        op: tsql2go_ast::BinaryOp::Eq,
        right,
    } = expr
    {
        if let Expr::Identifier(column) = left.as_ref() {
            let value = ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(right)?;
            fields.push((pascal(column), value));
            return Ok(());
        }
    }
    if let Expr::Infix {
        left,
        op: tsql2go_ast::BinaryOp::And,
        right,
    } = expr
    {
        render_request_fields(call, left, fields)?;
        render_request_fields(call, right, fields)?;
    }
    Ok(())
}

fn build_call(
    call: &mut DmlCall<'_>,
    class: OperationClass,
    table: &str,
    where_clause: Option<&Expr>,
) -> LoweringResult<String> {
    call.ctx.add_import("context");
    let method = method_name(class, table);
    let request_type = format!("{}Request", method);

    let mut fields = Vec::new();
    if let Some(expr) = where_clause {
        render_request_fields(call, expr, &mut fields)?;
    }
    let field_text = fields
        .into_iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");

    let client = call.ctx.config.rpc_client_var.clone();
    let ctx_arg = call.ctx.config.context_arg.clone();
    Ok(format!(
        "{client}.{}({ctx_arg}, &{request_type}{{{field_text}}})",
        method
    ))
}

pub fn lower_select(mut call: DmlCall<'_>, select: &SelectStatement) -> LoweringResult<String> {
    let Some(from) = &select.from else {
        return Ok("nil /* TODO: SELECT without FROM has no rpc equivalent */".to_string());
    };
    if temp_table_fallback(&mut call, from) {
        return super::sql::lower_select(call, select);
    }
    build_call(&mut call, OperationClass::Read, &from.name, select.where_clause.as_ref())
}

pub fn lower_insert(mut call: DmlCall<'_>, insert: &InsertStatement) -> LoweringResult<String> {
    if temp_table_fallback(&mut call, &insert.table) {
        return super::sql::lower_insert(call, insert);
    }
    build_call(&mut call, OperationClass::Create, &insert.table.name, None)
}

pub fn lower_update(mut call: DmlCall<'_>, update: &UpdateStatement) -> LoweringResult<String> {
    if temp_table_fallback(&mut call, &update.table) {
        return super::sql::lower_update(call, update);
    }
    if update.where_clause.is_none() {
        call.ctx.diagnostics.push(Diagnostic::UpdateWithoutWhere {
            table: update.table.name.clone(),
        });
    }
    build_call(&mut call, OperationClass::Update, &update.table.name, update.where_clause.as_ref())
}

pub fn lower_delete(mut call: DmlCall<'_>, delete: &DeleteStatement) -> LoweringResult<String> {
    if temp_table_fallback(&mut call, &delete.table) {
        return super::sql::lower_delete(call, delete);
    }
    if delete.where_clause.is_none() {
        call.ctx.diagnostics.push(Diagnostic::DeleteWithoutWhere {
            table: delete.table.name.clone(),
        });
    }
    build_call(&mut call, OperationClass::Delete, &delete.table.name, delete.where_clause.as_ref())
}

pub fn lower_merge(mut call: DmlCall<'_>, merge: &MergeStatement) -> LoweringResult<String> {
    if temp_table_fallback(&mut call, &merge.target) {
        return super::sql::lower_merge(call, merge);
    }
    build_call(&mut call, OperationClass::Exec, &merge.target.name, None)
}

pub fn lower_exec(mut call: DmlCall<'_>, target: &str, args: &[Expr]) -> LoweringResult<String> {
    call.ctx.add_import("context");
    let mut rendered = Vec::with_capacity(args.len());
    for arg in args {
        rendered.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(arg)?);
    }
    let client = call.ctx.config.rpc_client_var.clone();
    let ctx_arg = call.ctx.config.context_arg.clone();
    Ok(format!(
        "{client}.{}({ctx_arg}, {})",
        pascal(target),
        rendered.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_get_method_from_select() {
        assert_eq!(method_name(OperationClass::Read, "Users"), "GetUser");
    }

    #[test]
    fn singularizes_ies_suffix() {
        assert_eq!(singularize("Categories"), "Category");
    }
}
