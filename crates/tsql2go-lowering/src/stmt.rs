// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Procedural statement lowering (spec §4.3): control flow, `DECLARE`/
//! `SET`, `TRY`/`CATCH`, cursors, `RETURN`, and DML dispatch.

use tsql2go_ast::{Backend, BinaryOp, DdlPolicy, Diagnostic, Expr, Literal, Statement, TargetType};
use tsql2go_comments::BoundComments;
use tsql2go_functions::FunctionRegistry;
use tsql2go_semantic::{ScopeType, SemanticAnalyzer, Symbol};

use crate::context::UnitContext;
use crate::dml::{self, DmlCall};
use crate::error::{LoweringError, LoweringResult};
use crate::expr::{go_ident, ExprLowerer};

struct Lower<'a> {
    ctx: &'a mut UnitContext,
    analyzer: &'a mut SemanticAnalyzer,
    functions: &'a FunctionRegistry,
}

pub fn lower_block(
    ctx: &mut UnitContext,
    analyzer: &mut SemanticAnalyzer,
    functions: &FunctionRegistry,
    body: &[Statement],
) -> LoweringResult<()> {
    let mut lower = Lower {
        ctx,
        analyzer,
        functions,
    };
    lower.block(body)
}

impl<'a> Lower<'a> {
    fn expr(&mut self, e: &Expr) -> LoweringResult<String> {
        ExprLowerer::new(self.ctx, self.analyzer, self.functions).lower(e)
    }

    fn block(&mut self, stmts: &[Statement]) -> LoweringResult<()> {
        for stmt in stmts {
            self.statement(stmt)?;
        }
        Ok(())
    }

    fn scoped_block(&mut self, scope_type: ScopeType, stmts: &[Statement]) -> LoweringResult<()> {
        self.analyzer.scopes().push(scope_type);
        self.ctx.push_indent();
        let result = self.block(stmts);
        self.ctx.pop_indent();
        let unread = self.analyzer.scopes().pop()?;
        self.emit_suppressions(&unread);
        result
    }

    fn emit_suppressions(&mut self, unread: &[String]) {
        for name in unread {
            self.ctx.write_line(&format!("_ = {}", go_ident(name)));
        }
    }

    /// Looks up a statement signature's bound comments (spec §4.1) and
    /// emits the leading ones as their own comment lines, returning the
    /// trailing same-line comment (if any) for the caller to append.
    fn emit_leading_comments(&mut self, signature: &str) -> Option<String> {
        let BoundComments { leading, trailing } = self.ctx.comments.lookup(signature);
        for line in leading {
            self.ctx.write_line(&format!("// {line}"));
        }
        trailing
    }

    fn statement(&mut self, stmt: &Statement) -> LoweringResult<()> {
        match stmt {
            Statement::Declare {
                name,
                declared_type,
                init,
                is_table,
            } => self.lower_declare(name, declared_type, init.as_ref(), *is_table),

            Statement::Set {
                target,
                value,
                is_method_call,
            } => self.lower_set(target, value, *is_method_call),

            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => self.lower_if(condition, then_branch, else_branch.as_deref()),

            Statement::While { condition, body } => self.lower_while(condition, body),

            Statement::Break => {
                self.ctx.write_line("break");
                Ok(())
            }
            Statement::Continue => {
                self.ctx.write_line("continue");
                Ok(())
            }
            Statement::Block(body) => {
                self.ctx.write_line("{");
                self.scoped_block(ScopeType::Block, body)?;
                self.ctx.write_line("}");
                Ok(())
            }

            Statement::TryCatch(try_catch) => self.lower_try_catch(try_catch),

            Statement::Return(value) => self.lower_return(value.as_ref()),
            Statement::Print(expr) => {
                let rendered = self.expr(expr)?;
                self.ctx.add_import("fmt");
                self.ctx.write_line(&format!("fmt.Println({rendered})"));
                Ok(())
            }

            Statement::Select(select) => {
                let assigns: Vec<String> = select
                    .items
                    .iter()
                    .filter_map(|i| i.assign_to.clone())
                    .collect();
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_select(call, select)?;
                self.emit_dml_statement(&rendered, &assigns, false)
            }
            Statement::Insert(insert) => {
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_insert(call, insert)?;
                self.emit_dml_statement(&rendered, &[], true)
            }
            Statement::Update(update) => {
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_update(call, update)?;
                self.emit_dml_statement(&rendered, &[], true)
            }
            Statement::Delete(delete) => {
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_delete(call, delete)?;
                self.emit_dml_statement(&rendered, &[], true)
            }
            Statement::Merge(merge) => {
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_merge(call, merge)?;
                self.emit_dml_statement(&rendered, &[], true)
            }
            Statement::Exec { target, args } => {
                let call = DmlCall {
                    ctx: self.ctx,
                    analyzer: self.analyzer,
                    functions: self.functions,
                };
                let rendered = dml::lower_exec(call, target, args)?;
                self.emit_dml_statement(&rendered, &[], false)
            }

            Statement::With { ctes, body } => self.lower_with(ctes, body),

            Statement::BeginTransaction => {
                if self.ctx.in_transaction {
                    return Err(LoweringError::NestedTransaction);
                }
                self.ctx.in_transaction = true;
                self.ctx.add_import("context");
                let store = self.ctx.config.store_var.clone();
                let ctx_arg = self.ctx.config.context_arg.clone();
                self.ctx
                    .write_line(&format!("tx, err := {store}.BeginTx({ctx_arg}, nil)"));
                self.ctx.write_line("if err != nil {");
                self.ctx.push_indent();
                self.ctx.write_line("return err");
                self.ctx.pop_indent();
                self.ctx.write_line("}");
                self.ctx
                    .write_line("defer func() { if err != nil { tx.Rollback() } }()");
                Ok(())
            }
            Statement::Commit => {
                self.ctx.in_transaction = false;
                self.ctx.write_line("if err := tx.Commit(); err != nil {");
                self.ctx.push_indent();
                self.ctx.write_line("return err");
                self.ctx.pop_indent();
                self.ctx.write_line("}");
                Ok(())
            }
            Statement::Rollback => {
                self.ctx.in_transaction = false;
                self.ctx.write_line("return tx.Rollback()");
                Ok(())
            }

            Statement::CreateTable { name, is_temp, .. } => {
                if *is_temp {
                    self.ctx.diagnostics.note_temp_table(name.clone());
                }
                self.handle_ddl("CREATE TABLE", None)
            }
            Statement::DropTable { .. } => self.handle_ddl("DROP TABLE", None),
            Statement::TruncateTable { .. } => self.handle_ddl("TRUNCATE TABLE", None),
            Statement::OtherDdl { kind, verbatim } => self.handle_ddl(kind, Some(verbatim)),

            Statement::CursorDeclare(decl) => {
                self.ctx.cursors.insert(decl.name.clone(), (**decl).clone());
                Ok(())
            }
            Statement::CursorOpen(name) => self.lower_cursor_open(name),
            Statement::CursorFetchNext { cursor, into } => {
                self.ctx.write_line(&format!("{}.Next()", go_ident(cursor)));
                for (i, var) in into.iter().enumerate() {
                    self.ctx
                        .write_line(&format!("{} = {}.Scan({})", go_ident(var), go_ident(cursor), i));
                }
                Ok(())
            }
            Statement::CursorClose(name) => {
                self.ctx.write_line(&format!("{}.Close()", go_ident(name)));
                Ok(())
            }
            Statement::CursorDeallocate(name) => {
                self.ctx.cursors.remove(name);
                Ok(())
            }

            Statement::RaisError {
                message,
                severity,
                state,
                args,
            } => self.lower_raiserror(message, severity, state, args),
            Statement::Throw {
                number,
                message,
                state,
            } => self.lower_throw(number.as_ref(), message.as_ref(), state.as_ref()),

            Statement::ExprStatement(expr) => {
                let rendered = self.expr(expr)?;
                self.ctx.write_line(&rendered);
                Ok(())
            }

            Statement::Procedure { .. } | Statement::Function { .. } => {
                // Nested procedure/function definitions are not part of
                // the procedural-body grammar; the unit driver only ever
                // calls `statement` on a procedure's already-unwrapped
                // body (spec §3.4).
                Ok(())
            }

            // `Statement` is `#[non_exhaustive]`; any future variant a
            // parser adds is recorded rather than rejected outright.
            other => {
                self.ctx.diagnostics.push(Diagnostic::UnsupportedStatement {
                    kind: format!("{other:?}"),
                    hint: "statement kind has no lowering rule".to_string(),
                });
                Ok(())
            }
        }
    }

    fn lower_declare(
        &mut self,
        name: &str,
        declared_type: &str,
        init: Option<&Expr>,
        is_table: bool,
    ) -> LoweringResult<()> {
        let trailing = self.emit_leading_comments(&format!("DECLARE:{}", name.to_lowercase()));
        let suffix = trailing.map(|t| format!(" // {t}")).unwrap_or_default();

        if is_table {
            self.ctx.diagnostics.note_temp_table(name.to_string());
            self.ctx.add_import("tsql2gort");
            self.ctx
                .write_line(&format!("{} := tsql2gort.NewTempTable(){suffix}", go_ident(name)));
            return Ok(());
        }

        let descriptor = match init {
            Some(expr) => self.analyzer.infer(expr)?,
            None => tsql2go_ast::TypeDescriptor::new(declared_target_type(declared_type))
                .with_source_type(declared_type)
                .nullable(),
        };

        let scope_id = self.analyzer.scopes().current_id();
        self.analyzer
            .scopes()
            .declare(Symbol::local(name, descriptor.clone(), scope_id))?;

        let rendered = match init {
            Some(expr) => self.expr(expr)?,
            None => descriptor.target.zero_value_expr().to_string(),
        };
        self.ctx
            .write_line(&format!("{} := {rendered}{suffix}", go_ident(name)));
        Ok(())
    }

    fn handle_ddl(&mut self, kind: &str, verbatim: Option<&str>) -> LoweringResult<()> {
        match self.ctx.config.ddl_policy {
            DdlPolicy::Strict => Err(LoweringError::StrictDdlEncountered(kind.to_string())),
            DdlPolicy::SkipWarn => {
                self.ctx.diagnostics.push(Diagnostic::DdlSkipped {
                    statement_kind: kind.to_string(),
                });
                Ok(())
            }
            DdlPolicy::Extract => {
                if let Some(text) = verbatim {
                    self.ctx.diagnostics.push_extracted_ddl(text.to_string());
                }
                self.ctx.diagnostics.push(Diagnostic::DdlSkipped {
                    statement_kind: kind.to_string(),
                });
                Ok(())
            }
        }
    }

    fn lower_cursor_open(&mut self, name: &str) -> LoweringResult<()> {
        let decl = self
            .ctx
            .cursors
            .get(name)
            .cloned()
            .ok_or_else(|| LoweringError::UnresolvedCursor(name.to_string()))?;
        self.ctx.diagnostics.push(Diagnostic::CursorUsed {
            cursor: name.to_string(),
        });
        let select = match decl.query.as_ref() {
            Statement::Select(select) => select.as_ref().clone(),
            _ => return Err(LoweringError::UnresolvedCursor(name.to_string())),
        };
        let call = DmlCall {
            ctx: self.ctx,
            analyzer: self.analyzer,
            functions: self.functions,
        };
        let rendered = dml::lower_select(call, &select)?;
        self.ctx.add_import("tsql2gort");
        self.ctx
            .write_line(&format!("{}Rows, err := {rendered}", go_ident(name)));
        self.emit_error_check();
        self.ctx.write_line(&format!(
            "{} := tsql2gort.NewCursor({}Rows)",
            go_ident(name),
            go_ident(name)
        ));
        Ok(())
    }

    fn lower_set(&mut self, target: &str, value: &Expr, is_method_call: bool) -> LoweringResult<()> {
        let trailing = self.emit_leading_comments(&format!("SET:{}", target.to_lowercase()));
        let suffix = trailing.map(|t| format!(" // {t}")).unwrap_or_default();

        if is_method_call {
            let rendered = self.expr(value)?;
            self.ctx.write_line(&format!("{rendered}{suffix}"));
            return Ok(());
        }

        if let Expr::Subquery(stmt) = value {
            return self.lower_set_scalar_subquery(target, stmt, &suffix);
        }

        // Self-assignments are elided (spec §4.3.2).
        if is_self_assignment(target, value) {
            return Ok(());
        }

        self.analyzer.scopes().mark_read(target).ok();
        let rendered = self.expr(value)?;
        self.ctx
            .write_line(&format!("{} = {rendered}{suffix}", go_ident(target)));
        Ok(())
    }

    /// `SET @x = (SELECT ...)` lowers to the back-end's query call, a
    /// single-row scan, and a zero value on `sql.ErrNoRows` (spec
    /// §4.3.2), matching the cursor-open call shape just above.
    fn lower_set_scalar_subquery(
        &mut self,
        target: &str,
        stmt: &Statement,
        suffix: &str,
    ) -> LoweringResult<()> {
        let select = match stmt {
            Statement::Select(select) => select.as_ref().clone(),
            other => {
                return Err(LoweringError::DynamicSqlUnsupported(format!(
                    "scalar subquery assigned to SET must be a SELECT, found {other:?}"
                )))
            }
        };
        let zero = self
            .analyzer
            .scopes()
            .resolve(target)
            .map(|sym| sym.descriptor.target.zero_value_expr().to_string())
            .unwrap_or_else(|| "nil".to_string());
        let call = DmlCall {
            ctx: self.ctx,
            analyzer: self.analyzer,
            functions: self.functions,
        };
        let rendered = dml::lower_select(call, &select)?;
        self.ctx.add_import("tsql2gort");
        self.analyzer.scopes().mark_read(target).ok();
        self.ctx.write_line(&format!(
            "{}, err = tsql2gort.ScanScalar({rendered}, {zero}){suffix}",
            go_ident(target)
        ));
        self.emit_error_check();
        Ok(())
    }

    fn lower_if(
        &mut self,
        condition: &Expr,
        then_branch: &[Statement],
        else_branch: Option<&[Statement]>,
    ) -> LoweringResult<()> {
        let signature = format!("IF:{}", first_ident_or_var(condition).unwrap_or_default());
        let trailing = self.emit_leading_comments(&signature);
        let suffix = trailing.map(|t| format!(" // {t}")).unwrap_or_default();
        let cond = self.expr(condition)?;
        self.ctx.write_line(&format!("if {cond} {{{suffix}"));
        self.scoped_block(ScopeType::IfConsequence, then_branch)?;
        match else_branch {
            Some([Statement::If { .. }]) => {
                // else-if chain (spec §4.3.3): recurse without opening a
                // second nested block so the chain stays flat in Go too.
                self.ctx.write_line("} else {");
                self.analyzer.scopes().push(ScopeType::IfAlternative);
                self.ctx.push_indent();
                if let [Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                }] = else_branch.unwrap()
                {
                    self.lower_if(condition, then_branch, else_branch.as_deref())?;
                }
                self.ctx.pop_indent();
                let unread = self.analyzer.scopes().pop()?;
                self.emit_suppressions(&unread);
                self.ctx.write_line("}");
            }
            Some(stmts) => {
                self.ctx.write_line("} else {");
                self.scoped_block(ScopeType::IfAlternative, stmts)?;
                self.ctx.write_line("}");
            }
            None => self.ctx.write_line("}"),
        }
        Ok(())
    }

    fn lower_while(&mut self, condition: &Expr, body: &[Statement]) -> LoweringResult<()> {
        let signature = format!("WHILE:{}", first_ident_or_var(condition).unwrap_or_default());
        let trailing = self.emit_leading_comments(&signature);
        let suffix = trailing.map(|t| format!(" // {t}")).unwrap_or_default();

        if let Some((cursor_name, into_vars, inner_body)) = detect_fetch_status_loop(condition, body) {
            if !self.ctx.cursors.contains_key(&cursor_name) {
                return Err(LoweringError::UnresolvedCursor(cursor_name));
            }
            self.ctx.diagnostics.push(Diagnostic::CursorUsed {
                cursor: cursor_name.clone(),
            });
            self.ctx.add_import("tsql2gort");
            self.ctx
                .write_line(&format!("for {}.Next() {{{suffix}", go_ident(&cursor_name)));
            self.ctx.push_indent();
            for (i, var) in into_vars.iter().enumerate() {
                self.ctx
                    .write_line(&format!("{} = {}.Scan({})", go_ident(var), go_ident(&cursor_name), i));
            }
            self.ctx.pop_indent();
            self.scoped_block(ScopeType::CursorLoop, &inner_body)?;
            self.ctx.write_line("}");
            return Ok(());
        }

        let cond = self.expr(condition)?;
        self.ctx.write_line(&format!("for {cond} {{{suffix}"));
        self.scoped_block(ScopeType::WhileBody, body)?;
        self.ctx.write_line("}");
        Ok(())
    }

    fn lower_try_catch(&mut self, tc: &tsql2go_ast::TryCatch) -> LoweringResult<()> {
        self.ctx.add_import("tsql2gort");
        self.ctx
            .write_line("tsErr := func() (recovered *tsql2gort.SqlError) {");
        self.ctx.push_indent();
        self.ctx.write_line("defer func() {");
        self.ctx.push_indent();
        self.ctx.write_line("if r := recover(); r != nil {");
        self.ctx.push_indent();
        self.ctx.write_line("recovered = tsql2gort.RecoverSqlError(r)");
        self.ctx.pop_indent();
        self.ctx.write_line("}");
        self.ctx.pop_indent();
        self.ctx.write_line("}()");

        self.ctx.in_try = true;
        self.scoped_block(ScopeType::TryBlock, &tc.try_body)?;
        self.ctx.in_try = false;

        self.ctx.write_line("return nil");
        self.ctx.pop_indent();
        self.ctx.write_line("}()");

        self.ctx.write_line("if tsErr != nil {");
        self.ctx.push_indent();
        if self.ctx.config.sp_logger.is_enabled() {
            self.ctx.add_import("tsql2gort");
            self.ctx.write_line("spLogger.Log(ctx, tsErr)");
        }
        self.ctx.in_catch = true;
        self.analyzer.enter_catch(ScopeType::CatchBlock);
        let result = self.block(&tc.catch.body);
        self.ctx.pop_indent();
        let unread = self.analyzer.exit_catch()?;
        self.emit_suppressions(&unread);
        self.ctx.in_catch = false;
        self.ctx.write_line("}");
        result
    }

    fn lower_return(&mut self, value: Option<&Expr>) -> LoweringResult<()> {
        let mut parts: Vec<String> = self
            .ctx
            .out_params
            .iter()
            .map(|(name, _)| go_ident(name))
            .collect();
        match value {
            Some(expr) => {
                self.ctx.return_carries_value = true;
                parts.push(self.expr(expr)?);
            }
            None if self.ctx.return_carries_value => {
                let go_type = self.ctx.scalar_return_go_type.as_deref().unwrap_or("int32");
                parts.push(zero_value_for_go_type(go_type));
            }
            None => {}
        }
        parts.push("nil".to_string());
        self.ctx.write_line(&format!("return {}", parts.join(", ")));
        Ok(())
    }

    fn lower_raiserror(
        &mut self,
        message: &Expr,
        severity: &Expr,
        state: &Expr,
        args: &[Expr],
    ) -> LoweringResult<()> {
        let msg = self.expr(message)?;
        let sev = self.expr(severity)?;
        let st = self.expr(state)?;
        let mut rendered_args = vec![msg, sev, st];
        for arg in args {
            rendered_args.push(self.expr(arg)?);
        }
        self.ctx.add_import("tsql2gort");
        let err_expr = format!("tsql2gort.NewRaisedError({})", rendered_args.join(", "));
        self.emit_raise(&err_expr);
        Ok(())
    }

    fn lower_throw(
        &mut self,
        number: Option<&Expr>,
        message: Option<&Expr>,
        state: Option<&Expr>,
    ) -> LoweringResult<()> {
        self.ctx.add_import("tsql2gort");
        match (number, message, state) {
            (None, None, None) => {
                if self.ctx.in_try {
                    self.ctx.write_line("panic(tsql2gort.Rethrow(tsErr))");
                } else {
                    self.emit_error_return("tsErr");
                }
            }
            _ => {
                let num = match number {
                    Some(e) => self.expr(e)?,
                    None => "0".to_string(),
                };
                let msg = match message {
                    Some(e) => self.expr(e)?,
                    None => "\"\"".to_string(),
                };
                let st = match state {
                    Some(e) => self.expr(e)?,
                    None => "1".to_string(),
                };
                let err_expr = format!("tsql2gort.NewThrownError({num}, {msg}, {st})");
                self.emit_raise(&err_expr);
            }
        }
        Ok(())
    }

    /// Outside a TRY, RAISERROR/THROW build an error value and return it
    /// with zero-valued outputs instead of panicking (spec §4.3.6, §7);
    /// only inside a TRY does the panic-and-recover path apply. A CATCH
    /// body runs with `in_try` already false, so a THROW there takes the
    /// same return path back out of the procedure.
    fn emit_raise(&mut self, err_expr: &str) {
        if self.ctx.in_try {
            self.ctx.write_line(&format!("panic({err_expr})"));
        } else {
            self.emit_error_return(err_expr);
        }
    }

    fn emit_error_return(&mut self, err_expr: &str) {
        let mut parts: Vec<String> = self
            .ctx
            .out_params
            .iter()
            .map(|(_, go_type)| zero_value_for_go_type(go_type))
            .collect();
        if self.ctx.return_carries_value {
            let go_type = self.ctx.scalar_return_go_type.as_deref().unwrap_or("int32");
            parts.push(zero_value_for_go_type(go_type));
        }
        parts.push(err_expr.to_string());
        self.ctx.write_line(&format!("return {}", parts.join(", ")));
    }

    fn lower_with(&mut self, ctes: &[tsql2go_ast::CommonTableExpr], body: &Statement) -> LoweringResult<()> {
        if self.ctx.backend == tsql2go_ast::Backend::Rpc {
            return Err(LoweringError::CteUnsupportedByRpcBackend(
                ctes.first().map(|c| c.name.clone()).unwrap_or_default(),
            ));
        }
        // The sql/mock/inline backends inline CTEs as ordinary subqueries
        // at SQL-text render time; structurally the lowered statement is
        // just `body` (spec §4.4.1).
        self.statement(body)
    }

    /// `is_write` marks INSERT/UPDATE/DELETE/MERGE, which capture
    /// `sql.Result` instead of discarding it whenever the procedure reads
    /// `@@ROWCOUNT` afterward (spec §4.4.1, §9). Only the `sql` backend's
    /// rendered call returns a `sql.Result` with `RowsAffected`;
    /// `rpc`/`mock`/`inline` calls render a plain method call, so
    /// `@@ROWCOUNT` is left unsupported there.
    fn emit_dml_statement(&mut self, rendered: &str, assigns: &[String], is_write: bool) -> LoweringResult<()> {
        let captures_rowcount =
            is_write && assigns.is_empty() && self.ctx.reads_rowcount && self.ctx.backend == Backend::Sql;
        if assigns.len() == 1 {
            self.analyzer.scopes().mark_read(&assigns[0]).ok();
            self.ctx
                .write_line(&format!("{}, err = {rendered}", go_ident(&assigns[0])));
        } else if !assigns.is_empty() {
            let targets = assigns.iter().map(|a| go_ident(a)).collect::<Vec<_>>().join(", ");
            self.ctx.write_line(&format!("{targets}, err = {rendered}"));
        } else if captures_rowcount {
            self.ctx.write_line(&format!("dmlResult, err := {rendered}"));
        } else {
            self.ctx.write_line(&format!("_, err := {rendered}"));
        }
        self.emit_error_check();
        if captures_rowcount {
            self.ctx.write_line("rowCount, _ = dmlResult.RowsAffected()");
        }
        Ok(())
    }

    fn emit_error_check(&mut self) {
        self.ctx.write_line("if err != nil {");
        self.ctx.push_indent();
        if self.ctx.in_try {
            self.ctx.add_import("tsql2gort");
            self.ctx.write_line("panic(tsql2gort.NewSqlError(err))");
        } else {
            self.emit_error_return("err");
        }
        self.ctx.pop_indent();
        self.ctx.write_line("}");
    }
}

fn zero_value_for_go_type(go_type: &str) -> String {
    match go_type {
        "string" => "\"\"".to_string(),
        "bool" => "false".to_string(),
        "decimal.Decimal" => "decimal.Zero()".to_string(),
        "time.Time" => "time.Time{}".to_string(),
        t if t.starts_with("int") || t.starts_with("float") || t == "byte" => "0".to_string(),
        _ => "nil".to_string(),
    }
}

/// Maps a T-SQL declared-type name to its target type for a `DECLARE`
/// with no initializer, mirroring the semantic analyzer's cast-target
/// resolution (`SemanticAnalyzer::resolve_cast_target`).
pub(crate) fn declared_target_type(type_name: &str) -> TargetType {
    let upper = type_name.to_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper).trim();
    match base {
        "TINYINT" => TargetType::Byte,
        "SMALLINT" => TargetType::SmallInteger,
        "INT" | "INTEGER" => TargetType::Int32,
        "BIGINT" => TargetType::Int64,
        "REAL" => TargetType::Float32,
        "FLOAT" => TargetType::Float64,
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => TargetType::Decimal,
        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "TEXT" | "NTEXT" => TargetType::String,
        "BINARY" | "VARBINARY" | "IMAGE" => TargetType::ByteString,
        "BIT" => TargetType::Boolean,
        "DATE" | "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "TIME" | "DATETIMEOFFSET" => {
            TargetType::Timestamp
        }
        _ => TargetType::Opaque,
    }
}

/// The first identifier or variable reachable from `expr`, pre-order,
/// normalized to lower case. Used to synthesize the `IF:`/`WHILE:`
/// comment-index signatures (spec §4.1).
fn first_ident_or_var(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(name) | Expr::Variable(name) => Some(name.to_lowercase()),
        Expr::QualifiedIdentifier(parts) => parts.last().map(|p| p.to_lowercase()),
        Expr::Prefix { expr, .. } => first_ident_or_var(expr),
        Expr::Infix { left, right, .. } => first_ident_or_var(left).or_else(|| first_ident_or_var(right)),
        Expr::FunctionCall { args, .. } => args.iter().find_map(first_ident_or_var),
        Expr::Case {
            operand,
            whens,
            else_result,
        } => operand
            .as_deref()
            .and_then(first_ident_or_var)
            .or_else(|| whens.iter().find_map(|(w, _)| first_ident_or_var(w)))
            .or_else(|| else_result.as_deref().and_then(first_ident_or_var)),
        Expr::Cast { expr, .. } => first_ident_or_var(expr),
        Expr::IsNull { expr, .. } => first_ident_or_var(expr),
        Expr::Between { expr, .. } => first_ident_or_var(expr),
        Expr::In { expr, .. } => first_ident_or_var(expr),
        Expr::Tuple(items) => items.iter().find_map(first_ident_or_var),
        _ => None,
    }
}

/// `SET @x = @x` (spec §4.3.2): true only when `value` is exactly the
/// target variable, not merely an expression that happens to read it.
fn is_self_assignment(target: &str, value: &Expr) -> bool {
    matches!(value, Expr::Identifier(name) | Expr::Variable(name) if name.eq_ignore_ascii_case(target))
}

/// Detects the `WHILE @@FETCH_STATUS = 0 ... FETCH NEXT` pattern (spec
/// §4.3.5) and folds it into a single row-iterator loop: returns the
/// cursor name, its `FETCH ... INTO` target variables, and the
/// remaining loop body with the trailing re-fetch stripped.
fn detect_fetch_status_loop(condition: &Expr, body: &[Statement]) -> Option<(String, Vec<String>, Vec<Statement>)> {
    let is_fetch_status = matches!(
        condition,
        Expr::Infix { left, op: BinaryOp::Eq, right }
            if matches!(left.as_ref(), Expr::Identifier(n) if Expr::is_system_global(n, "@@FETCH_STATUS"))
                && matches!(right.as_ref(), Expr::Literal(Literal::Integer(0)))
    );
    if !is_fetch_status {
        return None;
    }

    let (last, rest) = body.split_last()?;
    if let Statement::CursorFetchNext { cursor, into } = last {
        Some((cursor.clone(), into.clone(), rest.to_vec()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{Config, Dialect};

    fn new_ctx() -> UnitContext {
        UnitContext::new("GetUser", Config::default(), Dialect::TSql)
    }

    #[test]
    fn declare_without_init_uses_zero_value() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[Statement::Declare {
                name: "total".to_string(),
                declared_type: "INT".to_string(),
                init: None,
                is_table: false,
            }],
        )
        .unwrap();
        assert!(ctx.body().contains("total := 0"));
    }

    #[test]
    fn if_without_else_emits_single_block() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[Statement::If {
                condition: Expr::infix(Expr::int(1), BinaryOp::Eq, Expr::int(1)),
                then_branch: vec![Statement::Break],
                else_branch: None,
            }],
        )
        .unwrap();
        assert!(ctx.body().contains("if 1 == 1 {"));
        assert!(ctx.body().contains("break"));
    }

    #[test]
    fn rowcount_read_captures_exec_result_on_write_dml() {
        use tsql2go_ast::{InsertSource, InsertStatement, TableRef};

        let mut ctx = new_ctx();
        ctx.reads_rowcount = true;
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let insert = Statement::Insert(Box::new(InsertStatement {
            table: TableRef {
                name: "Orders".to_string(),
                alias: None,
                hints: vec![],
            },
            columns: vec!["id".to_string()],
            source: InsertSource::Values(vec![vec![Expr::int(1)]]),
        }));
        lower_block(&mut ctx, &mut analyzer, &functions, &[insert]).unwrap();
        assert!(ctx.body().contains("dmlResult, err := "));
        assert!(ctx.body().contains("rowCount, _ = dmlResult.RowsAffected()"));
    }

    #[test]
    fn rowcount_not_captured_when_unread() {
        use tsql2go_ast::{InsertSource, InsertStatement, TableRef};

        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let insert = Statement::Insert(Box::new(InsertStatement {
            table: TableRef {
                name: "Orders".to_string(),
                alias: None,
                hints: vec![],
            },
            columns: vec!["id".to_string()],
            source: InsertSource::Values(vec![vec![Expr::int(1)]]),
        }));
        lower_block(&mut ctx, &mut analyzer, &functions, &[insert]).unwrap();
        assert!(ctx.body().contains("_, err := "));
        assert!(!ctx.body().contains("RowsAffected"));
    }

    #[test]
    fn rowcount_not_captured_on_non_sql_backend() {
        use tsql2go_ast::{InsertSource, InsertStatement, TableRef};

        let mut ctx = new_ctx();
        ctx.reads_rowcount = true;
        ctx.backend = Backend::Rpc;
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let insert = Statement::Insert(Box::new(InsertStatement {
            table: TableRef {
                name: "Orders".to_string(),
                alias: None,
                hints: vec![],
            },
            columns: vec!["id".to_string()],
            source: InsertSource::Values(vec![vec![Expr::int(1)]]),
        }));
        lower_block(&mut ctx, &mut analyzer, &functions, &[insert]).unwrap();
        assert!(ctx.body().contains("_, err := "));
        assert!(!ctx.body().contains("RowsAffected"));
    }

    #[test]
    fn nested_transaction_is_fatal() {
        let mut ctx = new_ctx();
        ctx.in_transaction = true;
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let result = lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[Statement::BeginTransaction],
        );
        assert!(matches!(result, Err(LoweringError::NestedTransaction)));
    }

    #[test]
    fn enabled_sp_logger_logs_in_catch_block() {
        let mut ctx = UnitContext::new(
            "GetUser",
            tsql2go_ast::Config {
                sp_logger: tsql2go_ast::SpLogger::Slog,
                ..tsql2go_ast::Config::default()
            },
            Dialect::TSql,
        );
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let tc = tsql2go_ast::TryCatch {
            try_body: vec![],
            catch: tsql2go_ast::CatchBlock { body: vec![] },
        };
        lower_block(&mut ctx, &mut analyzer, &functions, &[Statement::TryCatch(tc)]).unwrap();
        assert!(ctx.body().contains("spLogger.Log(ctx, tsErr)"));
    }

    #[test]
    fn cursor_fetch_status_loop_folds_to_iterator() {
        let mut ctx = new_ctx();
        ctx.cursors.insert(
            "c".to_string(),
            tsql2go_ast::CursorDecl {
                name: "c".to_string(),
                query: Box::new(Statement::Select(Box::new(tsql2go_ast::SelectStatement {
                    items: vec![],
                    from: None,
                    joins: vec![],
                    where_clause: None,
                    group_by: vec![],
                    having: None,
                    order_by: vec![],
                    top: None,
                }))),
                fetch_into: vec!["id".to_string()],
            },
        );
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let condition = Expr::infix(Expr::Identifier("@@FETCH_STATUS".to_string()), BinaryOp::Eq, Expr::int(0));
        let body = vec![
            Statement::Print(Expr::var("id")),
            Statement::CursorFetchNext {
                cursor: "c".to_string(),
                into: vec!["id".to_string()],
            },
        ];
        lower_block(&mut ctx, &mut analyzer, &functions, &[Statement::While { condition, body }]).unwrap();
        assert!(ctx.body().contains("for c.Next() {"));
        assert!(!ctx.body().contains("FETCH"));
    }

    #[test]
    fn bare_return_emits_zero_scalar_when_return_carries_value() {
        let mut ctx = new_ctx();
        ctx.return_carries_value = true;
        ctx.scalar_return_go_type = Some("int32".to_string());
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        lower_block(&mut ctx, &mut analyzer, &functions, &[Statement::Return(None)]).unwrap();
        assert!(ctx.body().contains("return 0, nil"));
    }

    #[test]
    fn self_assignment_is_elided() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[Statement::Set {
                target: "total".to_string(),
                value: Expr::var("total"),
                is_method_call: false,
            }],
        )
        .unwrap();
        assert_eq!(ctx.body(), "");
    }

    #[test]
    fn scalar_subquery_set_scans_with_zero_on_no_rows() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let select = tsql2go_ast::SelectStatement {
            items: vec![],
            from: Some(tsql2go_ast::TableRef {
                name: "Orders".to_string(),
                alias: None,
                hints: vec![],
            }),
            joins: vec![],
            where_clause: None,
            group_by: vec![],
            having: None,
            order_by: vec![],
            top: None,
        };
        lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[
                Statement::Declare {
                    name: "total".to_string(),
                    declared_type: "INT".to_string(),
                    init: None,
                    is_table: false,
                },
                Statement::Set {
                    target: "total".to_string(),
                    value: Expr::Subquery(Box::new(Statement::Select(Box::new(select)))),
                    is_method_call: false,
                },
            ],
        )
        .unwrap();
        assert!(ctx.body().contains("tsql2gort.ScanScalar("));
        assert!(ctx.body().contains("total, err = tsql2gort.ScanScalar("));
    }

    #[test]
    fn raiserror_outside_try_returns_instead_of_panicking() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        lower_block(
            &mut ctx,
            &mut analyzer,
            &functions,
            &[Statement::RaisError {
                message: Expr::string("failed"),
                severity: Expr::int(16),
                state: Expr::int(1),
                args: vec![],
            }],
        )
        .unwrap();
        assert!(!ctx.body().contains("panic("));
        assert!(ctx.body().contains("return nil, tsql2gort.NewRaisedError("));
    }

    #[test]
    fn raiserror_inside_try_still_panics() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let tc = tsql2go_ast::TryCatch {
            try_body: vec![Statement::RaisError {
                message: Expr::string("failed"),
                severity: Expr::int(16),
                state: Expr::int(1),
                args: vec![],
            }],
            catch: tsql2go_ast::CatchBlock { body: vec![] },
        };
        lower_block(&mut ctx, &mut analyzer, &functions, &[Statement::TryCatch(tc)]).unwrap();
        assert!(ctx.body().contains("panic(tsql2gort.NewRaisedError("));
    }
}
