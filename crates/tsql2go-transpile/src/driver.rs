// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit Driver (spec §2 step 2, §3.4): walks a batch's top-level units,
//! lowering each procedural one independently. The analyzer's scope
//! stack is rebuilt from scratch per unit (`tsql2go_lowering::lower_unit`
//! constructs a fresh [`tsql2go_semantic::SemanticAnalyzer`] itself), so
//! nothing here carries state from one unit to the next.

use std::collections::HashMap;

use tsql2go_ast::{Config, Dialect, ProcedureSummary, Statement};
use tsql2go_comments::CommentIndex;
use tsql2go_functions::FunctionRegistry;
use tsql2go_lowering::{lower_unit, UnitOutput};

use crate::error::{TranspileError, TranspileResult};

/// Lowers every procedural unit in `units`, in batch order. `comments`
/// is shared across all of them since it's keyed by statement signature,
/// not by unit.
pub fn lower_units(
    units: &[Statement],
    config: &Config,
    dialect: Dialect,
    functions: &FunctionRegistry,
    udf_signatures: &HashMap<String, ProcedureSummary>,
    comments: &CommentIndex,
) -> TranspileResult<Vec<UnitOutput>> {
    let procedural: Vec<&Statement> = units
        .iter()
        .filter(|u| matches!(u, Statement::Procedure { .. } | Statement::Function { .. }))
        .collect();

    if !units.is_empty() && procedural.is_empty() {
        return Err(TranspileError::NoProceduralUnits);
    }

    procedural
        .into_iter()
        .map(|unit| {
            lower_unit(
                unit,
                config.clone(),
                dialect,
                functions,
                udf_signatures.clone(),
                comments.clone(),
            )
            .map_err(TranspileError::from)
        })
        .collect()
}
