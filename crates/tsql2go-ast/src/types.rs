// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Type descriptor
//!
//! Every value in the analyzer's world is annotated with a [`TypeDescriptor`]
//! (spec §3.2). This module defines the canonical target-type names and the
//! descriptor that carries the derived flags and nullability hint.

use serde::{Deserialize, Serialize};

/// Canonical target-type name a value is lowered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TargetType {
    SmallInteger,
    Int32,
    Int64,
    Byte,
    Float32,
    Float64,
    /// Arbitrary-precision decimal, backed by `rust_decimal::Decimal` in the
    /// analyzer's constant-folding helpers and by the runtime companion
    /// library's decimal type in emitted Go.
    Decimal,
    String,
    ByteString,
    Boolean,
    Timestamp,
    /// Type could not be resolved to a closed-table target; treated as
    /// `interface{}`-shaped in emission and never widened against another
    /// numeric type.
    Opaque,
}

impl TargetType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TargetType::SmallInteger
                | TargetType::Int32
                | TargetType::Int64
                | TargetType::Byte
                | TargetType::Float32
                | TargetType::Float64
                | TargetType::Decimal
        )
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, TargetType::Decimal)
    }

    pub fn is_string(self) -> bool {
        matches!(self, TargetType::String)
    }

    pub fn is_bool(self) -> bool {
        matches!(self, TargetType::Boolean)
    }

    pub fn is_date_time(self) -> bool {
        matches!(self, TargetType::Timestamp)
    }

    /// The Go zero-value expression for this type, used by the
    /// NULL-to-zero lowering (spec §3.2) and by `RETURN`'s implicit tuple
    /// (spec §4.3.6).
    pub fn zero_value_expr(self) -> &'static str {
        match self {
            TargetType::SmallInteger
            | TargetType::Int32
            | TargetType::Int64
            | TargetType::Byte
            | TargetType::Float32
            | TargetType::Float64 => "0",
            TargetType::Decimal => "decimal.Zero()",
            TargetType::String => "\"\"",
            TargetType::ByteString => "nil",
            TargetType::Boolean => "false",
            TargetType::Timestamp => "time.Time{}",
            TargetType::Opaque => "nil",
        }
    }

    /// The Go type name this target lowers to, used for parameter and
    /// named-return signatures (spec §4.3.1).
    pub fn go_type_name(self) -> &'static str {
        match self {
            TargetType::SmallInteger => "int16",
            TargetType::Int32 => "int32",
            TargetType::Int64 => "int64",
            TargetType::Byte => "byte",
            TargetType::Float32 => "float32",
            TargetType::Float64 => "float64",
            TargetType::Decimal => "decimal.Decimal",
            TargetType::String => "string",
            TargetType::ByteString => "[]byte",
            TargetType::Boolean => "bool",
            TargetType::Timestamp => "time.Time",
            TargetType::Opaque => "interface{}",
        }
    }
}

/// Type descriptor assigned to every expression by the semantic analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub target: TargetType,

    /// `true` unless the source syntax forces nullability (e.g. a column
    /// reference with unknown nullability from an external source, or a
    /// bare `NULL` literal before it is lowered into an assignment).
    pub nullable: bool,

    /// The original T-SQL type name, when known (e.g. `"VARCHAR(50)"`).
    /// Not part of the core's decision making; retained so
    /// `annotate-level=verbose` can emit informative comments (spec §6).
    pub source_type: Option<String>,
}

impl TypeDescriptor {
    pub fn new(target: TargetType) -> Self {
        Self {
            target,
            nullable: false,
            source_type: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.target.is_numeric()
    }

    pub fn is_decimal(&self) -> bool {
        self.target.is_decimal()
    }

    pub fn is_string(&self) -> bool {
        self.target.is_string()
    }

    pub fn is_bool(&self) -> bool {
        self.target.is_bool()
    }

    pub fn is_date_time(&self) -> bool {
        self.target.is_date_time()
    }

    /// Opaque-nullable descriptor used for a bare `NULL` literal before
    /// it is folded into an assignment target's type (spec §4.2).
    pub fn opaque_nullable() -> Self {
        Self::new(TargetType::Opaque).nullable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_never_mixes_with_native_zero() {
        assert_eq!(TargetType::Decimal.zero_value_expr(), "decimal.Zero()");
        assert_eq!(TargetType::Int64.zero_value_expr(), "0");
    }

    #[test]
    fn descriptor_builder() {
        let d = TypeDescriptor::new(TargetType::Decimal).with_source_type("MONEY");
        assert!(d.is_decimal());
        assert!(!d.nullable);
        assert_eq!(d.source_type.as_deref(), Some("MONEY"));
    }
}
