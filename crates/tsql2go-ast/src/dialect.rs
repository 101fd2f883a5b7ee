// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL text dialects (spec §4.4.1, §6)
//!
//! A dialect governs placeholder style, quoting, and which SQL idioms the
//! SQL back-end is allowed to emit. Distinct from [`crate::Backend`]: the
//! dialect only matters when `backend = sql` (or as the fallback for
//! `rpc`/`mock` temp-table statements).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    Ansi,
    /// A T-SQL-compatible superset: kept as the default so re-serialized
    /// SQL round-trips closest to the source when no target dialect is
    /// specified.
    TSql,
    PostgresLike,
    MySqlLike,
    SqliteLike,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::TSql
    }
}

impl Dialect {
    /// The placeholder style used when substituting `@variable`
    /// references during SQL re-serialization (spec §4.4.1).
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Dialect::PostgresLike => PlaceholderStyle::NumberedDollar,
            Dialect::MySqlLike | Dialect::SqliteLike => PlaceholderStyle::QuestionMark,
            Dialect::Ansi => PlaceholderStyle::QuestionMark,
            Dialect::TSql => PlaceholderStyle::NamedAt,
        }
    }

    /// Render the Nth (1-based) placeholder for this dialect.
    pub fn placeholder(self, index: usize, name: &str) -> String {
        match self.placeholder_style() {
            PlaceholderStyle::NumberedDollar => format!("${}", index),
            PlaceholderStyle::QuestionMark => "?".to_string(),
            PlaceholderStyle::NamedColon => format!(":{}", name),
            PlaceholderStyle::NamedAt => format!("@{}", name),
        }
    }

    /// Whether `EXEC proc arg1, arg2` lowers to a nested function call
    /// (true, T-SQL-compatible superset) or a SQL `CALL` statement
    /// (false, ANSI/Postgres/MySQL-like; spec §4.4.1).
    pub fn exec_is_call_statement(self) -> bool {
        !matches!(self, Dialect::TSql)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ...
    NumberedDollar,
    /// `?`
    QuestionMark,
    /// `:name`
    NamedColon,
    /// `@name`
    NamedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_rendering() {
        assert_eq!(Dialect::PostgresLike.placeholder(1, "id"), "$1");
        assert_eq!(Dialect::MySqlLike.placeholder(1, "id"), "?");
        assert_eq!(Dialect::TSql.placeholder(1, "id"), "@id");
    }

    #[test]
    fn default_is_tsql() {
        assert_eq!(Dialect::default(), Dialect::TSql);
    }
}
