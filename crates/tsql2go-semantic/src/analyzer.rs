// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Bottom-up expression typing (spec §4.2).
//!
//! The analyzer assigns every [`Expr`] a [`TypeDescriptor`] by recursing
//! into its operands first, so an `Infix` node's type falls out of its
//! already-typed children rather than being re-derived from scratch.

use tsql2go_ast::{BinaryOp, Expr, Literal, TargetType, TypeDescriptor};
use tsql2go_functions::FunctionRegistry;

use crate::error::{SemanticError, SemanticResult};
use crate::scope::{ScopeManager, ScopeType};

/// Walks expressions and statements, typing them against a scope stack
/// and the builtin function registry.
pub struct SemanticAnalyzer {
    scopes: ScopeManager,
    functions: FunctionRegistry,
    in_catch: bool,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeManager::new(),
            functions: FunctionRegistry::new(),
            in_catch: false,
        }
    }

    pub fn scopes(&mut self) -> &mut ScopeManager {
        &mut self.scopes
    }

    /// Entered when lowering begins a `CATCH` block body, so `ERROR_*`
    /// accessors type-check (spec §4.3.4).
    pub fn enter_catch(&mut self, scope_type: ScopeType) {
        self.in_catch = true;
        self.scopes.push(scope_type);
    }

    pub fn exit_catch(&mut self) -> SemanticResult<Vec<String>> {
        self.in_catch = false;
        self.scopes.pop()
    }

    /// Bottom-up type inference for a single expression (spec §4.2).
    pub fn infer(&mut self, expr: &Expr) -> SemanticResult<TypeDescriptor> {
        match expr {
            Expr::Literal(lit) => Ok(Self::literal_type(lit)),

            Expr::Identifier(_) | Expr::QualifiedIdentifier(_) => {
                // Column references are resolved against a catalog the
                // analyzer doesn't own; treat as opaque-but-non-null
                // until a caller attaches catalog-derived metadata.
                Ok(TypeDescriptor::new(TargetType::Opaque))
            }

            Expr::Variable(name) => {
                self.scopes.mark_read(name)?;
                let symbol = self
                    .scopes
                    .resolve(name)
                    .ok_or_else(|| SemanticError::UndeclaredVariable(name.clone()))?;
                Ok(symbol.descriptor.clone())
            }

            Expr::Prefix { expr, .. } => self.infer(expr),

            Expr::Infix { left, op, right } => {
                let lhs = self.infer(left)?;
                let rhs = self.infer(right)?;
                Ok(Self::infix_result_type(*op, &lhs, &rhs))
            }

            Expr::FunctionCall { name, args, .. } => {
                if self.functions.is_error_context_function(name) && !self.in_catch {
                    return Err(SemanticError::ErrorAccessorOutsideCatch(name.clone()));
                }
                let sig = match self.functions.lookup(name) {
                    Some(sig) => sig,
                    // Closed builtin table (spec §4.2); anything it
                    // doesn't recognize resolves to opaque rather than
                    // failing the batch.
                    None => {
                        for arg in args {
                            self.infer(arg)?;
                        }
                        return Ok(TypeDescriptor::opaque_nullable());
                    }
                };
                if !sig.accepts_arity(args.len()) {
                    return Err(SemanticError::FunctionArity {
                        name: name.clone(),
                        min: sig.min_args,
                        max: sig.max_args,
                        found: args.len(),
                    });
                }
                for arg in args {
                    self.infer(arg)?;
                }
                Ok(TypeDescriptor::new(sig.returns))
            }

            Expr::Case {
                whens, else_result, ..
            } => {
                for (cond, result) in whens {
                    self.infer(cond)?;
                    self.infer(result)?;
                }
                match else_result {
                    Some(e) => self.infer(e),
                    None => Ok(TypeDescriptor::opaque_nullable()),
                }
            }

            Expr::Cast { expr, type_name } => {
                self.infer(expr)?;
                Self::resolve_cast_target(type_name)
                    .map(TypeDescriptor::new)
                    .ok_or_else(|| SemanticError::UnknownCastTarget(type_name.clone()))
            }

            Expr::IsNull { expr, .. } => {
                self.infer(expr)?;
                Ok(TypeDescriptor::new(TargetType::Boolean))
            }

            Expr::Between { expr, low, high, .. } => {
                self.infer(expr)?;
                self.infer(low)?;
                self.infer(high)?;
                Ok(TypeDescriptor::new(TargetType::Boolean))
            }

            Expr::In { expr, list, .. } => {
                self.infer(expr)?;
                for item in list {
                    self.infer(item)?;
                }
                Ok(TypeDescriptor::new(TargetType::Boolean))
            }

            Expr::Tuple(items) => {
                for item in items {
                    self.infer(item)?;
                }
                Ok(TypeDescriptor::new(TargetType::Opaque))
            }

            // Subqueries are typed by the DML lowering stage, which knows
            // the result-set shape; the analyzer only needs to know these
            // never resolve to a closed numeric/string table here.
            Expr::Subquery(_) => Ok(TypeDescriptor::new(TargetType::Opaque)),
            Expr::Exists { .. } => Ok(TypeDescriptor::new(TargetType::Boolean)),

            // `Expr` is `#[non_exhaustive]`; every current variant is
            // handled above.
            _ => Ok(TypeDescriptor::new(TargetType::Opaque)),
        }
    }

    fn literal_type(lit: &Literal) -> TypeDescriptor {
        match lit {
            Literal::Null => TypeDescriptor::opaque_nullable(),
            Literal::Boolean(_) => TypeDescriptor::new(TargetType::Boolean),
            Literal::Integer(_) => TypeDescriptor::new(TargetType::Int64),
            Literal::Float(_) => TypeDescriptor::new(TargetType::Float64),
            Literal::String(_) => TypeDescriptor::new(TargetType::String),
            Literal::Binary(_) => TypeDescriptor::new(TargetType::ByteString),
            Literal::Money(_) => TypeDescriptor::new(TargetType::Decimal),
            _ => TypeDescriptor::opaque_nullable(),
        }
    }

    /// Numeric promotion and decimal-discipline rules (spec §3.2, §4.2):
    /// `NULL` folds to the other operand's type (later lowered to that
    /// type's zero value); decimal never silently widens with a native
    /// numeric; comparisons and boolean connectives always yield `bool`.
    fn infix_result_type(
        op: BinaryOp,
        lhs: &TypeDescriptor,
        rhs: &TypeDescriptor,
    ) -> TypeDescriptor {
        if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
            return TypeDescriptor::new(TargetType::Boolean);
        }

        if matches!(op, BinaryOp::Concat) {
            return TypeDescriptor::new(TargetType::String);
        }

        if lhs.target == TargetType::Opaque && lhs.nullable {
            return rhs.clone();
        }
        if rhs.target == TargetType::Opaque && rhs.nullable {
            return lhs.clone();
        }

        if lhs.is_decimal() || rhs.is_decimal() {
            return TypeDescriptor::new(TargetType::Decimal);
        }
        if lhs.target == TargetType::Float64 || rhs.target == TargetType::Float64 {
            return TypeDescriptor::new(TargetType::Float64);
        }
        if lhs.target == TargetType::Int64 || rhs.target == TargetType::Int64 {
            return TypeDescriptor::new(TargetType::Int64);
        }
        lhs.clone()
    }

    fn resolve_cast_target(type_name: &str) -> Option<TargetType> {
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
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{BinaryOp, Expr};

    #[test]
    fn decimal_dominates_arithmetic_promotion() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer
            .scopes()
            .declare(crate::symbol::Symbol::local(
                "price",
                TypeDescriptor::new(TargetType::Decimal),
                0,
            ))
            .unwrap();
        let expr = Expr::infix(Expr::var("price"), BinaryOp::Add, Expr::int(1));
        let descriptor = analyzer.infer(&expr).unwrap();
        assert_eq!(descriptor.target, TargetType::Decimal);
    }

    #[test]
    fn comparison_is_always_boolean() {
        let mut analyzer = SemanticAnalyzer::new();
        let expr = Expr::infix(Expr::int(1), BinaryOp::Eq, Expr::int(2));
        assert_eq!(analyzer.infer(&expr).unwrap().target, TargetType::Boolean);
    }

    #[test]
    fn error_accessor_rejected_outside_catch() {
        let mut analyzer = SemanticAnalyzer::new();
        let expr = Expr::call("ERROR_MESSAGE", vec![]);
        assert!(matches!(
            analyzer.infer(&expr),
            Err(SemanticError::ErrorAccessorOutsideCatch(_))
        ));
    }

    #[test]
    fn error_accessor_allowed_inside_catch() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.enter_catch(ScopeType::CatchBlock);
        let expr = Expr::call("ERROR_MESSAGE", vec![]);
        assert!(analyzer.infer(&expr).is_ok());
    }

    #[test]
    fn null_folds_to_other_operand_type() {
        let mut analyzer = SemanticAnalyzer::new();
        let expr = Expr::infix(Expr::null(), BinaryOp::Add, Expr::int(5));
        assert_eq!(analyzer.infer(&expr).unwrap().target, TargetType::Int64);
    }

    #[test]
    fn cast_resolves_known_target() {
        let mut analyzer = SemanticAnalyzer::new();
        let expr = Expr::Cast {
            expr: Box::new(Expr::int(1)),
            type_name: "DECIMAL(10,2)".to_string(),
        };
        assert_eq!(analyzer.infer(&expr).unwrap().target, TargetType::Decimal);
    }

    #[test]
    fn unknown_function_resolves_opaque() {
        let mut analyzer = SemanticAnalyzer::new();
        let expr = Expr::call("NOT_A_REAL_FUNCTION", vec![]);
        let ty = analyzer.infer(&expr).unwrap();
        assert_eq!(ty.target, TargetType::Opaque);
        assert!(ty.nullable);
    }
}
