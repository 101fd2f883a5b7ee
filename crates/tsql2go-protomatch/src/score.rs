// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Scoring functions for the matcher (spec §4.6).
//!
//! Three independent signals are blended: name similarity (weight 0.5),
//! parameter overlap (weight 0.3), and result-shape overlap (weight
//! 0.2). Each returns `0.0..=1.0`; the blended confidence must clear a
//! 0.3 floor for a candidate to be reported at all.

use std::collections::HashSet;

use tsql2go_ast::proc::ProcedureSummary;
use tsql2go_catalog::{Message, Method};

pub const NAME_WEIGHT: f64 = 0.5;
pub const PARAM_WEIGHT: f64 = 0.3;
pub const RESULT_WEIGHT: f64 = 0.2;
pub const CONFIDENCE_FLOOR: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub name_similarity: f64,
    pub parameter_overlap: f64,
    pub result_shape_overlap: f64,
}

impl MatchScore {
    pub fn confidence(&self) -> f64 {
        self.name_similarity * NAME_WEIGHT
            + self.parameter_overlap * PARAM_WEIGHT
            + self.result_shape_overlap * RESULT_WEIGHT
    }

    pub fn clears_floor(&self) -> bool {
        self.confidence() >= CONFIDENCE_FLOOR
    }
}

pub fn score(
    procedure: &ProcedureSummary,
    method: &Method,
    request: Option<&Message>,
    response: Option<&Message>,
) -> MatchScore {
    MatchScore {
        name_similarity: name_similarity(&procedure.name, method),
        parameter_overlap: parameter_overlap(procedure, request),
        result_shape_overlap: result_shape_overlap(procedure, response),
    }
}

fn tokenize(name: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                tokens.insert(std::mem::take(&mut current).to_lowercase());
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            tokens.insert(std::mem::take(&mut current).to_lowercase());
        }
        current.push(c);
    }
    if !current.is_empty() {
        tokens.insert(current.to_lowercase());
    }
    tokens
}

/// Dice coefficient over case/underscore-split tokens of the procedure
/// name and the method's verb-stripped stem (spec §4.6 step 2).
fn name_similarity(procedure_name: &str, method: &Method) -> f64 {
    let proc_tokens = tokenize(procedure_name);
    let method_tokens = tokenize(&method.stem());

    if proc_tokens.is_empty() || method_tokens.is_empty() {
        return 0.0;
    }

    let intersection = proc_tokens.intersection(&method_tokens).count();
    (2.0 * intersection as f64) / (proc_tokens.len() + method_tokens.len()) as f64
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace('_', "")
}

/// Overlap between procedure parameter names and the request message's
/// field names (spec §4.6 step 3). Falls back to 0.0 when either side
/// has no members to compare.
fn parameter_overlap(procedure: &ProcedureSummary, request: Option<&Message>) -> f64 {
    if procedure.parameters.is_empty() {
        return 0.0;
    }
    let Some(request) = request else {
        return 0.0;
    };
    overlap_ratio(
        procedure.parameters.iter().map(|p| normalize(&p.name)),
        request.fields.iter().map(|f| f.normalized_name()),
    )
}

/// Overlap between a procedure's result-set column names and the
/// response message's scalar field names (spec §4.6 step 4).
fn result_shape_overlap(procedure: &ProcedureSummary, response: Option<&Message>) -> f64 {
    let columns: Vec<String> = procedure
        .result_sets
        .iter()
        .flat_map(|rs| rs.columns.iter())
        .map(|c| normalize(c))
        .collect();
    if columns.is_empty() {
        return 0.0;
    }
    let Some(response) = response else {
        return 0.0;
    };
    let field_names: Vec<String> = response
        .scalar_fields()
        .map(|f| f.normalized_name())
        .collect();
    overlap_ratio(columns.into_iter(), field_names.into_iter())
}

fn overlap_ratio(
    lhs: impl Iterator<Item = String>,
    rhs: impl Iterator<Item = String>,
) -> f64 {
    let lhs: HashSet<String> = lhs.collect();
    let rhs: HashSet<String> = rhs.collect();
    if lhs.is_empty() || rhs.is_empty() {
        return 0.0;
    }
    let intersection = lhs.intersection(&rhs).count();
    intersection as f64 / lhs.len().max(rhs.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::proc::{ParameterSummary, ResultSetSummary};

    #[test]
    fn identical_stems_score_perfect_name_similarity() {
        let method = Method::new("GetUserById", "GetUserByIdRequest", "User");
        assert_eq!(name_similarity("GetUserById", &method), 1.0);
    }

    #[test]
    fn confidence_blends_three_signals() {
        let score = MatchScore {
            name_similarity: 1.0,
            parameter_overlap: 1.0,
            result_shape_overlap: 1.0,
        };
        assert!((score.confidence() - 1.0).abs() < f64::EPSILON);
        assert!(score.clears_floor());
    }

    #[test]
    fn zero_overlap_misses_floor() {
        let score = MatchScore {
            name_similarity: 0.1,
            parameter_overlap: 0.0,
            result_shape_overlap: 0.0,
        };
        assert!(!score.clears_floor());
    }

    #[test]
    fn result_shape_overlap_matches_columns_to_fields() {
        use tsql2go_catalog::Field;
        let procedure = ProcedureSummary::new("GetUser").with_result_sets(vec![ResultSetSummary {
            source_table: "users".to_string(),
            columns: vec!["user_id".to_string(), "email".to_string()],
        }]);
        let response = Message::new("User", "pkg.User")
            .with_fields(vec![Field::new("user_id", 1, "int64"), Field::new("email", 2, "string")]);
        assert_eq!(result_shape_overlap(&procedure, Some(&response)), 1.0);
    }

    #[test]
    fn unused_parameter_summary_field_acknowledged() {
        let p = ParameterSummary {
            name: "id".to_string(),
            source_type: "INT".to_string(),
            target_type: "int64".to_string(),
            has_default: false,
            is_output: false,
        };
        assert_eq!(p.name, "id");
    }
}
