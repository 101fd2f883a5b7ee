// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-transpile
//!
//! Top-level entry point tying the whole pipeline together (spec §2):
//! the Comment Indexer runs once over the batch's source text, the Unit
//! Driver lowers every procedural unit, the Proto↔Procedure Matcher
//! reports its best guesses when a catalog is supplied, and Diagnostics
//! & Assembly splices everything into one Go source file.

mod assembly;
mod driver;
mod error;

use std::collections::{BTreeSet, HashMap};

use tsql2go_ast::{Batch, Config, Diagnostics, Dialect, ProcedureSummary};
use tsql2go_catalog::StaticCatalog;
use tsql2go_comments::CommentIndexer;
use tsql2go_functions::FunctionRegistry;
use tsql2go_protomatch::{MatchOutcome, ProcedureMatcher};

pub use assembly::assemble;
pub use error::{TranspileError, TranspileResult};

/// A procedure's best-guess proto RPC method, reported alongside the
/// transpile output but not consumed by lowering itself (spec §4.6: the
/// `rpc` backend already names its own target method independently).
#[derive(Debug, Clone, PartialEq)]
pub struct ProcMatch {
    pub procedure: String,
    pub outcome: MatchOutcome,
}

/// Everything a caller gets back from one transpile run.
#[derive(Debug, Clone)]
pub struct TranspileOutput {
    pub source: String,
    pub diagnostics: Diagnostics,
    pub proto_matches: Vec<ProcMatch>,
}

/// Runs the full pipeline over one parsed batch.
///
/// `source_text` is the original batch text the `Batch` was parsed
/// from; the Comment Indexer re-scans it once here rather than earlier
/// in the pipeline, since it is keyed by statement signature and not by
/// parse tree node. `catalog`/`procedure_summaries` are optional: when
/// absent, `proto_matches` is empty and matching is skipped entirely.
pub fn transpile(
    batch: &Batch,
    config: Config,
    dialect: Dialect,
    functions: &FunctionRegistry,
    udf_signatures: HashMap<String, ProcedureSummary>,
    source_text: &str,
    catalog: Option<&StaticCatalog>,
    procedure_summaries: &[ProcedureSummary],
) -> TranspileResult<TranspileOutput> {
    let comments = CommentIndexer::index(source_text);
    let unit_outputs = driver::lower_units(
        &batch.units,
        &config,
        dialect,
        functions,
        &udf_signatures,
        &comments,
    )?;

    let mut diagnostics = Diagnostics::default();
    let mut imports: BTreeSet<String> = BTreeSet::new();
    for unit in &unit_outputs {
        diagnostics.warnings.extend(unit.diagnostics.warnings.iter().cloned());
        diagnostics.extracted_ddl.extend(unit.diagnostics.extracted_ddl.iter().cloned());
        diagnostics.temp_tables.extend(unit.diagnostics.temp_tables.iter().cloned());
        imports.extend(unit.imports.iter().cloned());
    }

    let proto_matches = match catalog {
        Some(catalog) => {
            let matcher = ProcedureMatcher::new(catalog);
            procedure_summaries
                .iter()
                .filter_map(|summary| {
                    matcher.best_match(summary).map(|outcome| ProcMatch {
                        procedure: summary.name.clone(),
                        outcome,
                    })
                })
                .collect()
        }
        None => Vec::new(),
    };

    let source = assembly::assemble(&config, &imports, &unit_outputs);

    Ok(TranspileOutput {
        source,
        diagnostics,
        proto_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::{Expr, Statement};

    fn procedure(name: &str, body: Vec<Statement>) -> Statement {
        Statement::Procedure {
            name: name.to_string(),
            params: vec![],
            body,
        }
    }

    #[test]
    fn transpiles_single_procedure_to_valid_looking_source() {
        let batch = Batch {
            units: vec![procedure("GetUser", vec![Statement::Return(Some(Expr::int(0)))])],
        };
        let out = transpile(
            &batch,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            "CREATE PROCEDURE GetUser AS BEGIN RETURN 0 END",
            None,
            &[],
        )
        .unwrap();
        assert!(out.source.starts_with("package generated\n\n"));
        assert!(out.source.contains("func GetUser("));
        assert!(out.proto_matches.is_empty());
    }

    #[test]
    fn ddl_only_batch_is_rejected() {
        let batch = Batch {
            units: vec![Statement::OtherDdl {
                kind: "ALTER TABLE".to_string(),
                verbatim: "ALTER TABLE foo ADD bar INT".to_string(),
            }],
        };
        let result = transpile(
            &batch,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            "ALTER TABLE foo ADD bar INT",
            None,
            &[],
        );
        assert!(matches!(result, Err(TranspileError::NoProceduralUnits)));
    }

    #[test]
    fn aggregates_diagnostics_and_imports_across_units() {
        let batch = Batch {
            units: vec![
                procedure("First", vec![Statement::Return(Some(Expr::int(0)))]),
                procedure("Second", vec![]),
            ],
        };
        let out = transpile(
            &batch,
            Config::default(),
            Dialect::TSql,
            &FunctionRegistry::new(),
            HashMap::new(),
            "",
            None,
            &[],
        )
        .unwrap();
        assert!(out.source.contains("func First("));
        assert!(out.source.contains("func Second("));
        assert!(out.source.contains("\"context\""));
    }
}
