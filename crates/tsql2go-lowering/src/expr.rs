// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression lowering (spec §4.5): renders a [`tsql2go_ast::Expr`] tree
//! into a single line of Go source text, dispatching decimal arithmetic
//! through explicit method calls rather than native operators wherever
//! either operand carries [`TargetType::Decimal`].

use tsql2go_ast::{BinaryOp, Expr, Literal, TargetType, UnaryOp};
use tsql2go_functions::FunctionRegistry;
use tsql2go_semantic::SemanticAnalyzer;

use crate::context::UnitContext;
use crate::error::{LoweringError, LoweringResult};

pub struct ExprLowerer<'a> {
    pub ctx: &'a mut UnitContext,
    pub analyzer: &'a mut SemanticAnalyzer,
    pub functions: &'a FunctionRegistry,
}

impl<'a> ExprLowerer<'a> {
    pub fn new(
        ctx: &'a mut UnitContext,
        analyzer: &'a mut SemanticAnalyzer,
        functions: &'a FunctionRegistry,
    ) -> Self {
        Self {
            ctx,
            analyzer,
            functions,
        }
    }

    pub fn lower(&mut self, expr: &Expr) -> LoweringResult<String> {
        match expr {
            Expr::Identifier(name) if Expr::is_system_global(name, "@@ROWCOUNT") => {
                Ok("rowCount".to_string())
            }
            Expr::Identifier(name) => Ok(go_ident(name)),
            Expr::QualifiedIdentifier(parts) => Ok(go_ident(parts.last().unwrap_or(&String::new()))),
            Expr::Variable(name) => {
                self.analyzer.scopes().mark_read(name).ok();
                Ok(go_ident(name))
            }
            Expr::Literal(lit) => self.lower_literal(lit),
            Expr::Prefix { op, expr } => {
                let inner = self.lower(expr)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-({inner})"),
                    UnaryOp::Not => format!("!({inner})"),
                    UnaryOp::BitNot => format!("^({inner})"),
                    _ => inner,
                })
            }
            Expr::Infix { left, op, right } => self.lower_infix(left, *op, right),
            Expr::FunctionCall { name, args, .. } => self.lower_call(name, args),
            Expr::Case {
                operand,
                whens,
                else_result,
            } => self.lower_case(operand.as_deref(), whens, else_result.as_deref()),
            Expr::Cast { expr, type_name } => self.lower_cast(expr, type_name),
            Expr::IsNull { expr, negated } => {
                let inner = self.lower(expr)?;
                Ok(if *negated {
                    format!("{inner}.Valid")
                } else {
                    format!("!{inner}.Valid")
                })
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let x = self.lower(expr)?;
                let lo = self.lower(low)?;
                let hi = self.lower(high)?;
                let cmp = format!("({lo} <= {x} && {x} <= {hi})");
                Ok(if *negated { format!("!{cmp}") } else { cmp })
            }
            Expr::In { expr, list, negated } => {
                let x = self.lower(expr)?;
                let mut arms = Vec::with_capacity(list.len());
                for item in list {
                    let v = self.lower(item)?;
                    arms.push(format!("{x} == {v}"));
                }
                let joined = if arms.is_empty() {
                    "false".to_string()
                } else {
                    format!("({})", arms.join(" || "))
                };
                Ok(if *negated {
                    format!("!{joined}")
                } else {
                    joined
                })
            }
            Expr::Tuple(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.lower(item)?);
                }
                Ok(format!("[]interface{{}}{{{}}}", rendered.join(", ")))
            }
            Expr::Subquery(_) => Err(LoweringError::DynamicSqlUnsupported(
                "scalar subquery expression reached general expression lowering".to_string(),
            )),
            Expr::Exists { negated, .. } => {
                // Routed through the DML backend in practice (spec §4.4);
                // a bare EXISTS reaching here is rendered as an opaque call
                // the chosen backend is expected to have already resolved.
                Ok(if *negated {
                    "!exists".to_string()
                } else {
                    "exists".to_string()
                })
            }
            // `Expr` is `#[non_exhaustive]`; every current variant is
            // handled above.
            other => Err(LoweringError::DynamicSqlUnsupported(format!(
                "{other:?} has no expression lowering rule"
            ))),
        }
    }

    fn lower_literal(&mut self, lit: &Literal) -> LoweringResult<String> {
        Ok(match lit {
            Literal::Null => "nil".to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) => format!("{f:?}"),
            Literal::String(s) => format!("{:?}", s),
            Literal::Binary(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("0x{b:02x}")).collect();
                format!("[]byte{{{}}}", hex.join(", "))
            }
            Literal::Money(d) => {
                self.ctx.add_import("github.com/shopspring/decimal");
                format!("decimal.RequireFromString({:?})", d.to_string())
            }
            other => {
                return Err(LoweringError::DynamicSqlUnsupported(format!(
                    "{other:?} literal has no lowering rule"
                )))
            }
        })
    }

    fn lower_infix(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> LoweringResult<String> {
        let lhs_ty = self.analyzer.infer(left)?;
        let rhs_ty = self.analyzer.infer(right)?;
        let lhs = self.lower(left)?;
        let rhs = self.lower(right)?;

        if lhs_ty.is_decimal() || rhs_ty.is_decimal() {
            self.ctx.add_import("github.com/shopspring/decimal");
            return decimal_dispatch(&lhs, op, &rhs);
        }

        Ok(match op {
            BinaryOp::Like => format!("matchesLike({lhs}, {rhs})"),
            BinaryOp::NotLike => format!("!matchesLike({lhs}, {rhs})"),
            BinaryOp::Concat => format!("{lhs} + {rhs}"),
            _ => format!("{lhs} {} {rhs}", native_operator(op)),
        })
    }

    fn lower_call(&mut self, name: &str, args: &[Expr]) -> LoweringResult<String> {
        if self.functions.is_error_context_function(name) {
            return Ok(error_accessor_expr(name));
        }

        let sig = match self.functions.lookup(name) {
            Some(sig) => sig,
            // Closed builtin table (spec §4.2); unrecognized calls
            // resolve to opaque rather than failing the batch.
            None => {
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    rendered.push(self.lower(arg)?);
                }
                self.ctx.add_import("tsql2gort");
                return Ok(format!(
                    "tsql2gort.{}({})",
                    go_builtin_name(name),
                    rendered.join(", ")
                ));
            }
        };
        if !sig.accepts_arity(args.len()) {
            return Err(LoweringError::Semantic(
                tsql2go_semantic::SemanticError::FunctionArity {
                    name: name.to_string(),
                    min: sig.min_args,
                    max: sig.max_args,
                    found: args.len(),
                },
            ));
        }

        if name.eq_ignore_ascii_case("NEWID") {
            return Ok(self.lower_newid());
        }

        if name.eq_ignore_ascii_case("ISNULL") || name.eq_ignore_ascii_case("COALESCE") {
            return self.lower_coalesce(args);
        }

        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(self.lower(arg)?);
        }
        self.ctx.add_import("tsql2gort");
        Ok(format!("tsql2gort.{}({})", go_builtin_name(name), rendered.join(", ")))
    }

    /// ISNULL/COALESCE lower to a first-non-null short-circuit (spec
    /// §4.5). A value-typed first argument can never be null under the
    /// zero-value discipline (spec §3.2), so it is returned as-is.
    fn lower_coalesce(&mut self, args: &[Expr]) -> LoweringResult<String> {
        let first_ty = self.analyzer.infer(&args[0])?;
        if !first_ty.nullable {
            return self.lower(&args[0]);
        }

        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(self.lower(arg)?);
        }
        let (last, heads) = rendered.split_last().expect("ISNULL/COALESCE requires at least one argument");
        let arms: Vec<String> = heads
            .iter()
            .map(|v| format!("if {v} != nil {{ return {v} }}"))
            .collect();
        Ok(format!(
            "func() interface{{}} {{ {} ; return {last} }}()",
            arms.join(" ; ")
        ))
    }

    fn lower_newid(&mut self) -> String {
        use tsql2go_ast::NewIdMode;
        match self.ctx.config.newid_mode {
            NewIdMode::App => {
                self.ctx.add_import("github.com/google/uuid");
                "uuid.NewString()".to_string()
            }
            NewIdMode::Db => "tsql2gort.NewIDFromDatabase()".to_string(),
            NewIdMode::Rpc => format!("{}.NewID(ctx)", self.ctx.config.rpc_client_var),
            NewIdMode::Stub => "\"\" /* TODO: NEWID() stub */".to_string(),
            NewIdMode::Mock => "tsql2gort.MockNewID()".to_string(),
        }
    }

    fn lower_case(
        &mut self,
        operand: Option<&Expr>,
        whens: &[(Expr, Expr)],
        else_result: Option<&Expr>,
    ) -> LoweringResult<String> {
        let operand_code = match operand {
            Some(e) => Some(self.lower(e)?),
            None => None,
        };

        let mut arms = Vec::with_capacity(whens.len());
        for (cond, result) in whens {
            let cond_code = self.lower(cond)?;
            let result_code = self.lower(result)?;
            let guard = match &operand_code {
                Some(op) => format!("{op} == {cond_code}"),
                None => cond_code,
            };
            arms.push(format!("if {guard} {{ return {result_code} }}"));
        }
        let else_code = match else_result {
            Some(e) => self.lower(e)?,
            None => "nil".to_string(),
        };
        Ok(format!(
            "func() interface{{}} {{ {} ; return {else_code} }}()",
            arms.join(" else ")
        ))
    }

    fn lower_cast(&mut self, expr: &Expr, type_name: &str) -> LoweringResult<String> {
        let inner = self.lower(expr)?;
        let target = cast_target_type(type_name)
            .ok_or_else(|| LoweringError::Semantic(tsql2go_semantic::SemanticError::UnknownCastTarget(
                type_name.to_string(),
            )))?;
        Ok(match target {
            TargetType::Decimal => {
                self.ctx.add_import("github.com/shopspring/decimal");
                format!("decimal.NewFromFloat(float64({inner}))")
            }
            TargetType::String => format!("fmt.Sprint({inner})"),
            TargetType::Int32 => format!("int32({inner})"),
            TargetType::Int64 => format!("int64({inner})"),
            TargetType::SmallInteger => format!("int16({inner})"),
            TargetType::Byte => format!("byte({inner})"),
            TargetType::Float32 => format!("float32({inner})"),
            TargetType::Float64 => format!("float64({inner})"),
            TargetType::Boolean => format!("({inner} != 0)"),
            TargetType::Timestamp => format!("{inner}.(time.Time)"),
            TargetType::ByteString => format!("[]byte({inner})"),
            TargetType::Opaque => inner,
            _ => inner,
        })
    }
}

pub(crate) fn go_ident(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap().to_ascii_lowercase();
    format!("{first}{}", chars.as_str())
}

fn native_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Like | BinaryOp::NotLike | BinaryOp::Concat => {
            unreachable!("handled by dedicated arms before native_operator is consulted")
        }
        other => unreachable!("operator {other:?} has no native Go rendering"),
    }
}

/// Routes arithmetic/comparison through `rust_decimal`'s Go-side
/// equivalent (`github.com/shopspring/decimal`) method-call surface
/// instead of a native operator (spec §3.2 decimal discipline).
fn decimal_dispatch(lhs: &str, op: BinaryOp, rhs: &str) -> LoweringResult<String> {
    Ok(match op {
        BinaryOp::Add => format!("{lhs}.Add({rhs})"),
        BinaryOp::Sub => format!("{lhs}.Sub({rhs})"),
        BinaryOp::Mul => format!("{lhs}.Mul({rhs})"),
        BinaryOp::Div => format!("{lhs}.Div({rhs})"),
        BinaryOp::Mod => format!("{lhs}.Mod({rhs})"),
        BinaryOp::Eq => format!("{lhs}.Equal({rhs})"),
        BinaryOp::NotEq => format!("!{lhs}.Equal({rhs})"),
        BinaryOp::Lt => format!("{lhs}.LessThan({rhs})"),
        BinaryOp::LtEq => format!("{lhs}.LessThanOrEqual({rhs})"),
        BinaryOp::Gt => format!("{lhs}.GreaterThan({rhs})"),
        BinaryOp::GtEq => format!("{lhs}.GreaterThanOrEqual({rhs})"),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Like | BinaryOp::NotLike
        | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Concat => {
            return Err(LoweringError::DynamicSqlUnsupported(format!(
                "operator {op:?} is not defined over decimal operands"
            )))
        }
        other => {
            return Err(LoweringError::DynamicSqlUnsupported(format!(
                "operator {other:?} is not defined over decimal operands"
            )))
        }
    })
}

fn error_accessor_expr(name: &str) -> String {
    match name.to_uppercase().as_str() {
        "ERROR_MESSAGE" => "tsErr.Message".to_string(),
        "ERROR_NUMBER" => "tsErr.Number".to_string(),
        "ERROR_PROCEDURE" => "tsErr.Procedure".to_string(),
        "ERROR_LINE" => "tsErr.Line".to_string(),
        "ERROR_SEVERITY" => "tsErr.Severity".to_string(),
        "ERROR_STATE" => "tsErr.State".to_string(),
        other => format!("tsql2gort.{other}()"),
    }
}

fn go_builtin_name(name: &str) -> String {
    let upper = name.to_uppercase();
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => format!("{first}{}", chars.as_str().to_lowercase()),
        None => String::new(),
    }
}

fn cast_target_type(type_name: &str) -> Option<TargetType> {
    let upper = type_name.to_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper).trim();
    Some(match base {
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
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{Config, Dialect};

    fn new_ctx() -> UnitContext {
        UnitContext::new("GetUser", Config::default(), Dialect::TSql)
    }

    #[test]
    fn decimal_infix_dispatches_to_method_call() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        analyzer
            .scopes()
            .declare(tsql2go_semantic::Symbol::local(
                "price",
                tsql2go_ast::TypeDescriptor::new(TargetType::Decimal),
                0,
            ))
            .unwrap();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::infix(Expr::var("price"), BinaryOp::Add, Expr::int(1));
        let rendered = lowerer.lower(&expr).unwrap();
        assert!(rendered.contains(".Add("));
    }

    #[test]
    fn native_infix_uses_operator() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::infix(Expr::int(1), BinaryOp::Add, Expr::int(2));
        assert_eq!(lowerer.lower(&expr).unwrap(), "1 + 2");
    }

    #[test]
    fn string_literal_is_quoted() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        assert_eq!(lowerer.lower(&Expr::string("hi")).unwrap(), "\"hi\"");
    }

    #[test]
    fn error_accessor_in_catch_is_resolved() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.enter_catch(tsql2go_semantic::ScopeType::CatchBlock);
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::call("ERROR_MESSAGE", vec![]);
        assert_eq!(lowerer.lower(&expr).unwrap(), "tsErr.Message");
    }

    #[test]
    fn isnull_returns_identity_for_value_typed_arg() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        analyzer
            .scopes()
            .declare(tsql2go_semantic::Symbol::local(
                "count",
                tsql2go_ast::TypeDescriptor::new(TargetType::Int32),
                0,
            ))
            .unwrap();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::call("ISNULL", vec![Expr::var("count"), Expr::int(0)]);
        assert_eq!(lowerer.lower(&expr).unwrap(), "count");
    }

    #[test]
    fn coalesce_short_circuits_nullable_args() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        analyzer
            .scopes()
            .declare(tsql2go_semantic::Symbol::local(
                "nickname",
                tsql2go_ast::TypeDescriptor::opaque_nullable(),
                0,
            ))
            .unwrap();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::call("COALESCE", vec![Expr::var("nickname"), Expr::string("anon")]);
        let rendered = lowerer.lower(&expr).unwrap();
        assert!(rendered.contains("if nickname != nil { return nickname }"));
        assert!(rendered.ends_with("return \"anon\" }()"));
    }

    #[test]
    fn unrecognized_function_resolves_opaque_instead_of_failing() {
        let mut ctx = new_ctx();
        let mut analyzer = SemanticAnalyzer::new();
        let functions = FunctionRegistry::new();
        let mut lowerer = ExprLowerer::new(&mut ctx, &mut analyzer, &functions);
        let expr = Expr::call("DATEPART", vec![Expr::string("yy"), Expr::int(1)]);
        let rendered = lowerer.lower(&expr).unwrap();
        assert!(rendered.starts_with("tsql2gort."));
    }
}
