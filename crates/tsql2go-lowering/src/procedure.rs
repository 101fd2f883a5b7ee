// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Procedure/function shell emission (spec §4.3.1): the Go function
//! signature wrapping a lowered body, with context-arg-first parameters
//! and named returns for `OUTPUT` parameters plus an optional scalar
//! value.

use std::collections::{BTreeSet, HashMap};

use tsql2go_ast::{
    Config, Diagnostics, Dialect, Expr, ParamDecl, ProcedureSummary, Statement, TargetType, TypeDescriptor,
};
use tsql2go_comments::CommentIndex;
use tsql2go_functions::FunctionRegistry;
use tsql2go_semantic::{SemanticAnalyzer, Symbol};

use crate::context::UnitContext;
use crate::error::LoweringResult;
use crate::expr::go_ident;
use crate::stmt::{declared_target_type, lower_block};

/// A fully lowered unit, ready for the assembly stage to splice into a
/// package-level source file (spec §4.7).
pub struct UnitOutput {
    pub proc_name: String,
    /// Leading comments bound to the `CREATE PROCEDURE`/`CREATE FUNCTION`
    /// signature (spec §4.1), rendered as a doc comment above `signature`.
    pub doc_comment: Vec<String>,
    pub signature: String,
    pub body: String,
    pub diagnostics: Diagnostics,
    pub imports: BTreeSet<String>,
}

/// Whether any `RETURN <expr>` reachable from `body` carries a value,
/// scanned before lowering so every early-exit tuple the body emits
/// agrees on arity (spec §4.3.1, §4.3.6).
fn body_returns_value(body: &[Statement]) -> bool {
    body.iter().any(statement_returns_value)
}

fn statement_returns_value(stmt: &Statement) -> bool {
    match stmt {
        Statement::Return(Some(_)) => true,
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => body_returns_value(then_branch) || else_branch.as_deref().is_some_and(body_returns_value),
        Statement::While { body, .. } => body_returns_value(body),
        Statement::Block(body) => body_returns_value(body),
        Statement::TryCatch(tc) => body_returns_value(&tc.try_body) || body_returns_value(&tc.catch.body),
        Statement::With { body, .. } => statement_returns_value(body),
        _ => false,
    }
}

/// Whether any reachable expression reads `@@ROWCOUNT`, scanned before
/// lowering so write DML knows up front whether to capture `sql.Result`
/// instead of discarding it (spec §4.3.1, §9). DML statement bodies
/// (`Select`/`Insert`/.../`Exec` args) are not walked: the value only
/// ever matters in control flow and assignments evaluated *after* the
/// DML that set it.
fn body_reads_rowcount(body: &[Statement]) -> bool {
    body.iter().any(statement_reads_rowcount)
}

fn statement_reads_rowcount(stmt: &Statement) -> bool {
    match stmt {
        Statement::Declare { init: Some(e), .. } => expr_reads_rowcount(e),
        Statement::Set { value, .. } => expr_reads_rowcount(value),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            expr_reads_rowcount(condition)
                || body_reads_rowcount(then_branch)
                || else_branch.as_deref().is_some_and(body_reads_rowcount)
        }
        Statement::While { condition, body } => expr_reads_rowcount(condition) || body_reads_rowcount(body),
        Statement::Block(body) => body_reads_rowcount(body),
        Statement::TryCatch(tc) => body_reads_rowcount(&tc.try_body) || body_reads_rowcount(&tc.catch.body),
        Statement::With { body, .. } => statement_reads_rowcount(body),
        Statement::Return(Some(e)) => expr_reads_rowcount(e),
        Statement::Print(e) => expr_reads_rowcount(e),
        _ => false,
    }
}

fn expr_reads_rowcount(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier(name) => Expr::is_system_global(name, "@@ROWCOUNT"),
        Expr::Prefix { expr, .. } => expr_reads_rowcount(expr),
        Expr::Infix { left, right, .. } => expr_reads_rowcount(left) || expr_reads_rowcount(right),
        Expr::FunctionCall { args, .. } => args.iter().any(expr_reads_rowcount),
        Expr::Case {
            operand,
            whens,
            else_result,
        } => {
            operand.as_deref().is_some_and(expr_reads_rowcount)
                || whens.iter().any(|(w, t)| expr_reads_rowcount(w) || expr_reads_rowcount(t))
                || else_result.as_deref().is_some_and(expr_reads_rowcount)
        }
        Expr::Cast { expr, .. } => expr_reads_rowcount(expr),
        Expr::IsNull { expr, .. } => expr_reads_rowcount(expr),
        Expr::Between { expr, low, high, .. } => {
            expr_reads_rowcount(expr) || expr_reads_rowcount(low) || expr_reads_rowcount(high)
        }
        Expr::In { expr, list, .. } => expr_reads_rowcount(expr) || list.iter().any(expr_reads_rowcount),
        Expr::Tuple(items) => items.iter().any(expr_reads_rowcount),
        // `Expr` is `#[non_exhaustive]`; subqueries/EXISTS and any future
        // variant are opaque to this scan.
        _ => false,
    }
}

fn pascal(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn declare_params(
    analyzer: &mut SemanticAnalyzer,
    ctx: &mut UnitContext,
    params: &[ParamDecl],
) -> LoweringResult<Vec<String>> {
    let mut arg_list = Vec::with_capacity(params.len() + 1);
    arg_list.push(format!("{} context.Context", ctx.config.context_arg));
    ctx.add_import("context");

    for param in params {
        let target = declared_target_type(&param.declared_type);
        let descriptor = TypeDescriptor::new(target).with_source_type(param.declared_type.clone());
        analyzer
            .scopes()
            .declare(Symbol::param(&param.name, descriptor, 0))?;
        arg_list.push(format!("{} {}", go_ident(&param.name), target.go_type_name()));
        if param.output {
            ctx.out_params.push((param.name.clone(), target.go_type_name().to_string()));
        }
        add_type_import(ctx, target);
    }

    Ok(arg_list)
}

fn add_type_import(ctx: &mut UnitContext, target: TargetType) {
    if target == TargetType::Decimal {
        ctx.add_import("github.com/shopspring/decimal");
    }
    if target == TargetType::Timestamp {
        ctx.add_import("time");
    }
}

/// Builds the `func` line, emitting a method receiver when `config.receiver`
/// names one (spec §6 `receiver` option) instead of a bare function.
fn build_signature(ctx: &UnitContext, args: &[String], scalar_return: Option<TargetType>) -> String {
    let mut returns: Vec<String> = ctx
        .out_params
        .iter()
        .map(|(name, go_type)| format!("{} {go_type}", go_ident(name)))
        .collect();
    if let Some(target) = scalar_return {
        returns.push(format!("result {}", target.go_type_name()));
    }
    returns.push("err error".to_string());

    let receiver = match &ctx.config.receiver {
        Some(name) if !name.is_empty() => format!("(r *{name}) "),
        _ => String::new(),
    };

    format!(
        "func {receiver}{}({}) ({}) {{",
        pascal(&ctx.proc_name),
        args.join(", "),
        returns.join(", ")
    )
}

/// Lowers a `Statement::Procedure`. T-SQL's `RETURN <int>` status code is
/// the procedure's optional scalar return (spec §4.3.6), present in the
/// signature only when the body actually contains a value-carrying
/// `RETURN`; `OUTPUT` parameters always become named returns.
pub fn lower_procedure(
    name: &str,
    params: &[ParamDecl],
    body: &[Statement],
    config: Config,
    dialect: Dialect,
    functions: &FunctionRegistry,
    udf_signatures: HashMap<String, ProcedureSummary>,
    comments: CommentIndex,
) -> LoweringResult<UnitOutput> {
    let mut ctx = UnitContext::new(name, config, dialect);
    ctx.udf_signatures = udf_signatures;
    ctx.comments = comments;
    let mut analyzer = SemanticAnalyzer::new();

    // Pre-scan for a value-carrying RETURN before lowering (spec §4.3.1
    // pre-scans `@@ROWCOUNT` the same way) so every early-exit tuple the
    // body emits, not just the last one, agrees on arity.
    ctx.return_carries_value = body_returns_value(body);
    if ctx.return_carries_value {
        ctx.scalar_return_go_type = Some(TargetType::Int32.go_type_name().to_string());
    }
    ctx.reads_rowcount = body_reads_rowcount(body);

    let args = declare_params(&mut analyzer, &mut ctx, params)?;
    ctx.push_indent();
    if ctx.reads_rowcount {
        ctx.write_line("var rowCount int64");
    }
    lower_block(&mut ctx, &mut analyzer, functions, body)?;
    ctx.pop_indent();

    let scalar_return = ctx.return_carries_value.then_some(TargetType::Int32);
    let signature = build_signature(&ctx, &args, scalar_return);
    let doc_comment = ctx.comments.lookup(&format!("PROC:{}", name.to_lowercase())).leading;
    let (text, diagnostics, imports) = ctx.into_body();
    Ok(UnitOutput {
        proc_name: name.to_string(),
        doc_comment,
        signature,
        body: text,
        diagnostics,
        imports,
    })
}

/// Lowers a `Statement::Function`, whose declared return type (spec
/// §3.1) becomes the scalar named return instead of the implicit
/// integer status code procedures use.
pub fn lower_function(
    name: &str,
    params: &[ParamDecl],
    returns: &str,
    body: &[Statement],
    config: Config,
    dialect: Dialect,
    functions: &FunctionRegistry,
    udf_signatures: HashMap<String, ProcedureSummary>,
    comments: CommentIndex,
) -> LoweringResult<UnitOutput> {
    let mut ctx = UnitContext::new(name, config, dialect);
    ctx.udf_signatures = udf_signatures;
    ctx.comments = comments;
    let mut analyzer = SemanticAnalyzer::new();

    let scalar_return = declared_target_type(returns);
    // Unlike a procedure's optional status code, a function's scalar
    // return is mandatory from the declared signature alone, so every
    // early exit carries it regardless of which RETURN is reached.
    ctx.return_carries_value = true;
    ctx.scalar_return_go_type = Some(scalar_return.go_type_name().to_string());
    add_type_import(&mut ctx, scalar_return);
    ctx.reads_rowcount = body_reads_rowcount(body);

    let args = declare_params(&mut analyzer, &mut ctx, params)?;
    ctx.push_indent();
    if ctx.reads_rowcount {
        ctx.write_line("var rowCount int64");
    }
    lower_block(&mut ctx, &mut analyzer, functions, body)?;
    ctx.pop_indent();

    let signature = build_signature(&ctx, &args, Some(scalar_return));
    let doc_comment = ctx.comments.lookup(&format!("PROC:{}", name.to_lowercase())).leading;
    let (text, diagnostics, imports) = ctx.into_body();
    Ok(UnitOutput {
        proc_name: name.to_string(),
        doc_comment,
        signature,
        body: text,
        diagnostics,
        imports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{BinaryOp, Expr};

    #[test]
    fn procedure_signature_carries_context_and_status_return() {
        let params = vec![ParamDecl {
            name: "userId".to_string(),
            declared_type: "INT".to_string(),
            output: false,
            default: None,
        }];
        let body = vec![Statement::Return(Some(Expr::int(0)))];
        let out = lower_procedure(
            "GetUser",
            &params,
            &body,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            CommentIndex::default(),
        )
        .unwrap();
        assert!(out.signature.contains("func GetUser(ctx context.Context, userId int32)"));
        assert!(out.signature.contains("result int32"));
        assert!(out.signature.contains("err error"));
    }

    #[test]
    fn output_parameter_becomes_named_return() {
        let params = vec![ParamDecl {
            name: "total".to_string(),
            declared_type: "DECIMAL".to_string(),
            output: true,
            default: None,
        }];
        let out = lower_procedure(
            "SumOrders",
            &params,
            &[],
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            CommentIndex::default(),
        )
        .unwrap();
        assert!(out.signature.contains("total decimal.Decimal"));
    }

    #[test]
    fn procedure_reading_rowcount_declares_local() {
        use tsql2go_ast::{InsertSource, InsertStatement, TableRef};

        let body = vec![
            Statement::Insert(Box::new(InsertStatement {
                table: TableRef {
                    name: "Orders".to_string(),
                    alias: None,
                    hints: vec![],
                },
                columns: vec!["id".to_string()],
                source: InsertSource::Values(vec![vec![Expr::int(1)]]),
            })),
            Statement::If {
                condition: Expr::infix(Expr::ident("@@ROWCOUNT"), BinaryOp::Eq, Expr::int(0)),
                then_branch: vec![Statement::Return(None)],
                else_branch: None,
            },
        ];
        let out = lower_procedure(
            "DeactivateStale",
            &[],
            &body,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            CommentIndex::default(),
        )
        .unwrap();
        assert!(out.body.contains("var rowCount int64"));
        assert!(out.body.contains("if rowCount == 0 {"));
        assert!(out.body.contains("rowCount, _ = dmlResult.RowsAffected()"));
    }

    #[test]
    fn named_receiver_emits_method_form() {
        let config = Config {
            receiver: Some("Store".to_string()),
            ..Config::default()
        };
        let out = lower_procedure(
            "GetUser",
            &[],
            &[],
            config,
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            CommentIndex::default(),
        )
        .unwrap();
        assert!(out.signature.contains("func (r *Store) GetUser("));
    }

    #[test]
    fn function_uses_declared_return_type() {
        let body = vec![Statement::Return(Some(Expr::infix(
            Expr::int(1),
            BinaryOp::Add,
            Expr::int(1),
        )))];
        let out = lower_function(
            "AddOne",
            &[],
            "INT",
            &body,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            CommentIndex::default(),
        )
        .unwrap();
        assert!(out.signature.contains("result int32"));
    }
}
