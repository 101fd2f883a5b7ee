// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `sql` backend (spec §4.4.1): renders dialect-aware parameterized SQL
//! text and a Go call against the store variable (`db` by default).

use tsql2go_ast::{
    BinaryOp, DeleteStatement, Expr, InsertSource, InsertStatement, MergeStatement, SelectStatement,
    TableRef, UpdateStatement,
};

use crate::dml::DmlCall;
use crate::error::LoweringResult;
use crate::expr::ExprLowerer;

/// Collects `(sql_text, go_bind_args)` for one statement: every
/// `@variable` reference in the statement is replaced with the
/// dialect's placeholder syntax and appended to the bind-arg list in
/// encounter order.
struct SqlBuilder {
    text: String,
    binds: Vec<String>,
}

impl SqlBuilder {
    fn new() -> Self {
        Self {
            text: String::new(),
            binds: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    fn push_placeholder(&mut self, dialect: tsql2go_ast::Dialect, name: &str, go_expr: String) {
        let idx = self.binds.len() + 1;
        self.text.push_str(&dialect.placeholder(idx, name));
        self.binds.push(go_expr);
    }
}

fn render_condition(
    call: &mut DmlCall<'_>,
    builder: &mut SqlBuilder,
    expr: &Expr,
) -> LoweringResult<()> {
    match expr {
        Expr::Variable(name) => {
            let go_expr = ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(expr)?;
            let dialect = call.ctx.dialect;
            builder.push_placeholder(dialect, name, go_expr);
            Ok(())
        }
        Expr::Infix { left, op, right } => {
            builder.push("(");
            render_condition(call, builder, left)?;
            builder.push(sql_operator(*op));
            render_condition(call, builder, right)?;
            builder.push(")");
            Ok(())
        }
        Expr::Identifier(name) => {
            builder.push(name);
            Ok(())
        }
        Expr::Literal(_) => {
            let go_expr = ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(expr)?;
            builder.push(&go_expr);
            Ok(())
        }
        other => {
            let go_expr = ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(other)?;
            builder.push(&go_expr);
            Ok(())
        }
    }
}

fn sql_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => " + ",
        BinaryOp::Sub => " - ",
        BinaryOp::Mul => " * ",
        BinaryOp::Div => " / ",
        BinaryOp::Mod => " % ",
        BinaryOp::Eq => " = ",
        BinaryOp::NotEq => " <> ",
        BinaryOp::Lt => " < ",
        BinaryOp::LtEq => " <= ",
        BinaryOp::Gt => " > ",
        BinaryOp::GtEq => " >= ",
        BinaryOp::And => " AND ",
        BinaryOp::Or => " OR ",
        BinaryOp::Like => " LIKE ",
        BinaryOp::NotLike => " NOT LIKE ",
        BinaryOp::BitAnd => " & ",
        BinaryOp::BitOr => " | ",
        BinaryOp::BitXor => " ^ ",
        BinaryOp::Concat => " || ",
        _ => " ? ",
    }
}

fn table_name(table: &TableRef) -> String {
    match &table.alias {
        Some(alias) => format!("{} AS {}", table.name, alias),
        None => table.name.clone(),
    }
}

fn emit_query_call(call: &mut DmlCall<'_>, builder: SqlBuilder, rows: bool) -> String {
    call.ctx.add_import("context");
    let method = if rows { "QueryContext" } else { "ExecContext" };
    let store = call.ctx.config.store_var.clone();
    let ctx_arg = call.ctx.config.context_arg.clone();
    let mut args = vec![ctx_arg, format!("`{}`", builder.text)];
    args.extend(builder.binds);
    format!("{store}.{method}({})", args.join(", "))
}

pub fn lower_select(mut call: DmlCall<'_>, select: &SelectStatement) -> LoweringResult<String> {
    let mut builder = SqlBuilder::new();
    builder.push("SELECT ");
    let cols: Vec<String> = select
        .items
        .iter()
        .map(|item| match &item.alias {
            Some(alias) => format!("{} AS {}", expr_to_column_text(&item.expr), alias),
            None => expr_to_column_text(&item.expr),
        })
        .collect();
    builder.push(&cols.join(", "));
    if let Some(from) = &select.from {
        builder.push(" FROM ");
        builder.push(&table_name(from));
    }
    if let Some(where_clause) = &select.where_clause {
        builder.push(" WHERE ");
        render_condition(&mut call, &mut builder, where_clause)?;
    }
    Ok(emit_query_call(&mut call, builder, true))
}

fn expr_to_column_text(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(name) => name.clone(),
        Expr::QualifiedIdentifier(parts) => parts.join("."),
        _ => "*".to_string(),
    }
}

pub fn lower_insert(mut call: DmlCall<'_>, insert: &InsertStatement) -> LoweringResult<String> {
    let mut builder = SqlBuilder::new();
    builder.push("INSERT INTO ");
    builder.push(&insert.table.name);
    builder.push(" (");
    builder.push(&insert.columns.join(", "));
    builder.push(") VALUES ");

    match &insert.source {
        InsertSource::Values(rows) => {
            let mut row_fragments = Vec::with_capacity(rows.len());
            for row in rows {
                let mut row_builder = SqlBuilder::new();
                row_builder.push("(");
                for (i, value) in row.iter().enumerate() {
                    if i > 0 {
                        row_builder.push(", ");
                    }
                    render_condition(&mut call, &mut row_builder, value)?;
                }
                row_builder.push(")");
                builder.binds.extend(row_builder.binds.clone());
                row_fragments.push(row_builder.text);
            }
            builder.push(&row_fragments.join(", "));
        }
        InsertSource::Select(select) => {
            builder.text.pop(); // drop the trailing "VALUES "'s space accounting
            builder.push("SELECT 1 /* TODO: nested SELECT source */");
            let _ = select;
        }
    }

    Ok(emit_query_call(&mut call, builder, false))
}

pub fn lower_update(mut call: DmlCall<'_>, update: &UpdateStatement) -> LoweringResult<String> {
    let mut builder = SqlBuilder::new();
    builder.push("UPDATE ");
    builder.push(&update.table.name);
    builder.push(" SET ");

    let mut set_fragments = Vec::with_capacity(update.assignments.len());
    for assignment in &update.assignments {
        let mut frag = SqlBuilder::new();
        frag.push(&assignment.target);
        frag.push(" = ");
        render_condition(&mut call, &mut frag, &assignment.value)?;
        builder.binds.extend(frag.binds.clone());
        set_fragments.push(frag.text);
    }
    builder.push(&set_fragments.join(", "));

    if let Some(where_clause) = &update.where_clause {
        builder.push(" WHERE ");
        render_condition(&mut call, &mut builder, where_clause)?;
    } else {
        call.ctx.diagnostics.push(tsql2go_ast::Diagnostic::UpdateWithoutWhere {
            table: update.table.name.clone(),
        });
    }

    Ok(emit_query_call(&mut call, builder, false))
}

pub fn lower_delete(mut call: DmlCall<'_>, delete: &DeleteStatement) -> LoweringResult<String> {
    let mut builder = SqlBuilder::new();
    builder.push("DELETE FROM ");
    builder.push(&delete.table.name);
    if let Some(where_clause) = &delete.where_clause {
        builder.push(" WHERE ");
        render_condition(&mut call, &mut builder, where_clause)?;
    } else {
        call.ctx.diagnostics.push(tsql2go_ast::Diagnostic::DeleteWithoutWhere {
            table: delete.table.name.clone(),
        });
    }
    Ok(emit_query_call(&mut call, builder, false))
}

pub fn lower_merge(mut call: DmlCall<'_>, merge: &MergeStatement) -> LoweringResult<String> {
    // MERGE is treated as an opaque multi-clause statement (spec §3.1);
    // re-serialize its captured clause fragments verbatim.
    let mut text = format!(
        "MERGE INTO {} USING {} ON {}",
        merge.target.name,
        merge.source.name,
        "/* ON clause re-rendered by the source preserving layer */"
    );
    for clause in &merge.when_clauses {
        text.push(' ');
        text.push_str(clause);
    }
    let builder = SqlBuilder {
        text,
        binds: Vec::new(),
    };
    Ok(emit_query_call(&mut call, builder, false))
}

pub fn lower_exec(mut call: DmlCall<'_>, target: &str, args: &[Expr]) -> LoweringResult<String> {
    if call.ctx.dialect.exec_is_call_statement() {
        let mut builder = SqlBuilder::new();
        builder.push(&format!("CALL {}(", target));
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            render_condition(&mut call, &mut builder, arg)?;
        }
        builder.push(")");
        Ok(emit_query_call(&mut call, builder, false))
    } else {
        // T-SQL-compatible superset: a same-package nested call.
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(ExprLowerer::new(call.ctx, call.analyzer, call.functions).lower(arg)?);
        }
        Ok(format!(
            "{}({}, {})",
            go_proc_name(target),
            call.ctx.config.context_arg,
            rendered.join(", ")
        ))
    }
}

fn go_proc_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{Backend, Config, Dialect};
    use tsql2go_functions::FunctionRegistry;
    use tsql2go_semantic::SemanticAnalyzer;

    #[test]
    fn delete_without_where_is_flagged() {
        let mut ctx = crate::context::UnitContext::new(
            "DeleteAll",
            Config {
                backend: Backend::Sql,
                ..Config::default()
            },
            Dialect::TSql,
        );
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let delete = DeleteStatement {
            table: TableRef {
                name: "users".to_string(),
                alias: None,
                hints: vec![],
            },
            where_clause: None,
        };
        let call = DmlCall {
            ctx: &mut ctx,
            analyzer: &mut analyzer,
            functions: &functions,
        };
        lower_delete(call, &delete).unwrap();
        assert_eq!(ctx.diagnostics.warnings.len(), 1);
    }

    #[test]
    fn select_renders_placeholder_for_variable() {
        let mut ctx = crate::context::UnitContext::new(
            "GetUser",
            Config {
                backend: Backend::Sql,
                dialect: Dialect::PostgresLike,
                ..Config::default()
            },
            Dialect::PostgresLike,
        );
        let mut analyzer = SemanticAnalyzer::new();
        analyzer
            .scopes()
            .declare(tsql2go_semantic::Symbol::local(
                "id",
                tsql2go_ast::TypeDescriptor::new(tsql2go_ast::TargetType::Int64),
                0,
            ))
            .unwrap();
        let functions = FunctionRegistry::new();
        let select = SelectStatement {
            items: vec![tsql2go_ast::SelectItem {
                expr: Expr::ident("email"),
                alias: None,
                assign_to: None,
            }],
            from: Some(TableRef {
                name: "users".to_string(),
                alias: None,
                hints: vec![],
            }),
            joins: vec![],
            where_clause: Some(Expr::infix(Expr::ident("id"), BinaryOp::Eq, Expr::var("id"))),
            group_by: vec![],
            having: None,
            order_by: vec![],
            top: None,
        };
        let call = DmlCall {
            ctx: &mut ctx,
            analyzer: &mut analyzer,
            functions: &functions,
        };
        let rendered = lower_select(call, &select).unwrap();
        assert!(rendered.contains("$1"));
        assert!(rendered.contains("QueryContext"));
    }
}
