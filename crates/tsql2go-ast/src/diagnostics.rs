// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics (spec §6 "Diagnostic categories", §4.7, §5)
//!
//! Warnings are advisory and never fatal; they accumulate on a
//! [`Diagnostics`] collector that is threaded through a unit's lowering
//! and surfaced on the final [`crate::proc`]-adjacent output structure.

use serde::{Deserialize, Serialize};

/// One stable, filterable diagnostic category with its structured
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Diagnostic {
    /// DDL was detected and not lowered.
    DdlSkipped { statement_kind: String },
    /// A temp-table statement forced fallback to another back-end.
    TempTableRpcFallback { table: String, fallback: String },
    /// A cursor statement was encountered (behaviorally preserved).
    CursorUsed { cursor: String },
    DeleteWithoutWhere { table: String },
    UpdateWithoutWhere { table: String },
    /// `EXEC(string)` that cannot be statically analyzed.
    DynamicSqlDetected,
    /// A statement kind the core does not lower, with a directive hint.
    UnsupportedStatement { kind: String, hint: String },
}

impl Diagnostic {
    /// The stable category string named in spec §6.
    pub fn category(&self) -> &'static str {
        match self {
            Diagnostic::DdlSkipped { .. } => "ddl-skipped",
            Diagnostic::TempTableRpcFallback { .. } => "temp-table-rpc-fallback",
            Diagnostic::CursorUsed { .. } => "cursor-used",
            Diagnostic::DeleteWithoutWhere { .. } => "delete-without-where",
            Diagnostic::UpdateWithoutWhere { .. } => "update-without-where",
            Diagnostic::DynamicSqlDetected => "dynamic-sql-detected",
            Diagnostic::UnsupportedStatement { .. } => "unsupported-statement",
        }
    }
}

/// Accumulator for warnings, extracted DDL text and temp-table usage
/// notes for one batch (spec §4.7, §6 Output).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub warnings: Vec<Diagnostic>,
    pub extracted_ddl: Vec<String>,
    pub temp_tables: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    pub fn push_extracted_ddl(&mut self, text: impl Into<String>) {
        self.extracted_ddl.push(text.into());
    }

    pub fn note_temp_table(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.temp_tables.contains(&name) {
            self.temp_tables.push(name);
        }
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.warnings.iter().filter(move |w| w.category() == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_tables_are_deduplicated() {
        let mut d = Diagnostics::new();
        d.note_temp_table("#staging");
        d.note_temp_table("#staging");
        assert_eq!(d.temp_tables.len(), 1);
    }

    #[test]
    fn filter_by_category() {
        let mut d = Diagnostics::new();
        d.push(Diagnostic::CursorUsed {
            cursor: "c1".to_string(),
        });
        d.push(Diagnostic::DynamicSqlDetected);
        assert_eq!(d.by_category("cursor-used").count(), 1);
        assert_eq!(d.by_category("dynamic-sql-detected").count(), 1);
    }
}
