// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! Expression node shapes the external T-SQL parser is assumed to deliver
//! (spec §3.1): identifiers, qualified identifiers, variables, literals
//! (including binary and money), prefix/infix operators, function calls,
//! `CASE`, `CAST`/`CONVERT`, `IS NULL`, `BETWEEN`, `IN`, tuples, subqueries
//! and `EXISTS`. All nodes are immutable once built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::stmt::Statement;

/// A T-SQL scalar expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    /// Bare identifier (column name, unqualified).
    Identifier(String),

    /// `schema.table.column`-style qualified identifier, outermost-first.
    QualifiedIdentifier(Vec<String>),

    /// `@variable` reference. Stored without the `@` prefix; the prefix is
    /// a lexical detail the parser strips.
    Variable(String),

    Literal(Literal),

    /// Prefix operator, e.g. unary minus or `NOT`.
    Prefix { op: UnaryOp, expr: Box<Expr> },

    /// Infix operator, e.g. `a + b`, `x = y`, `a AND b`.
    Infix {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `name(args...)`, optionally `DISTINCT`-qualified and carrying an
    /// `OVER (...)` window clause as an opaque source fragment (window
    /// function bodies are not modeled structurally; spec §1 lists window
    /// functions among consumed input but the core only needs to know a
    /// call is windowed for back-end dispatch purposes).
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
        over: bool,
    },

    /// Simple or searched `CASE`. Simple CASE has `operand = Some(_)`.
    Case {
        operand: Option<Box<Expr>>,
        whens: Vec<(Expr, Expr)>,
        else_result: Option<Box<Expr>>,
    },

    /// `CAST(expr AS type)` / `CONVERT(type, expr)`.
    Cast { expr: Box<Expr>, type_name: String },

    /// `expr IS [NOT] NULL`.
    IsNull { expr: Box<Expr>, negated: bool },

    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// `expr [NOT] IN (list)`.
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// Parenthesized tuple, e.g. the `(a, b)` on the left of a row-value
    /// comparison.
    Tuple(Vec<Expr>),

    /// A `SELECT` used as a scalar or row-valued expression.
    Subquery(Box<Statement>),

    /// `[NOT] EXISTS (subquery)`.
    Exists { subquery: Box<Statement>, negated: bool },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn infix(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            args,
            distinct: false,
            over: false,
        }
    }

    /// Variable name referenced by `@@ROWCOUNT`/`@@FETCH_STATUS`-style
    /// system globals, used by the procedural lowering pre-scan (spec
    /// §4.3.1). System globals are represented as plain identifiers with
    /// the `@@` prefix stripped, qualified by a leading `@@` marker kept
    /// in the string so they are never confused with a user variable of
    /// the same bare name.
    pub fn is_system_global(name: &str, global: &str) -> bool {
        name.eq_ignore_ascii_case(global)
    }
}

/// Literal values, including T-SQL's binary and money literal forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// `0x...` binary literal.
    Binary(Vec<u8>),
    /// `$123.45`-style money literal, kept as an exact decimal rather than
    /// a float so the decimal-discipline lowering (spec §4.2) never has to
    /// round-trip through binary floating point.
    Money(Decimal),
}

/// Binary (infix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    And,
    Or,

    Like,
    NotLike,

    BitAnd,
    BitOr,
    BitXor,

    /// String concatenation (`+` between two string-typed operands).
    Concat,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }
}

/// Unary (prefix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infix_builder_roundtrip() {
        let e = Expr::infix(Expr::var("x"), BinaryOp::Add, Expr::int(1));
        match e {
            Expr::Infix { op, .. } => assert_eq!(op, BinaryOp::Add),
            _ => panic!("expected infix"),
        }
    }

    #[test]
    fn comparison_classification() {
        assert!(BinaryOp::Eq.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(BinaryOp::Mod.is_arithmetic());
    }
}
