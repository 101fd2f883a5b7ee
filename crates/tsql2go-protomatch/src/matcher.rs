// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Bipartite matching between procedures and proto methods (spec §4.6).

use tsql2go_ast::proc::ProcedureSummary;
use tsql2go_catalog::{Method, Service, StaticCatalog};

use crate::score::{self, MatchScore};

/// One candidate match between a procedure and a method, carrying the
/// score that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub method_name: String,
    pub service_name: String,
    pub score: MatchScore,
}

impl MatchOutcome {
    pub fn confidence(&self) -> f64 {
        self.score.confidence()
    }
}

/// Matches procedure summaries against every method in a catalog,
/// tolerating many-to-one matches and breaking ties deterministically by
/// ascending method name (spec §4.6 step 5).
pub struct ProcedureMatcher<'a> {
    catalog: &'a StaticCatalog,
}

impl<'a> ProcedureMatcher<'a> {
    pub fn new(catalog: &'a StaticCatalog) -> Self {
        Self { catalog }
    }

    /// Best-scoring method for `procedure`, or `None` if every candidate
    /// falls below the confidence floor.
    pub fn best_match(&self, procedure: &ProcedureSummary) -> Option<MatchOutcome> {
        let mut candidates: Vec<MatchOutcome> = self
            .catalog
            .all_methods()
            .filter_map(|(service, method)| self.score_one(procedure, service, method))
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence()
                .partial_cmp(&a.confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.method_name.cmp(&b.method_name))
        });

        candidates.into_iter().next()
    }

    /// All candidates clearing the confidence floor, ranked best-first.
    /// A single method may end up matched to more than one procedure;
    /// that's tolerated (spec §4.6).
    pub fn ranked_matches(&self, procedure: &ProcedureSummary) -> Vec<MatchOutcome> {
        let mut candidates: Vec<MatchOutcome> = self
            .catalog
            .all_methods()
            .filter_map(|(service, method)| self.score_one(procedure, service, method))
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence()
                .partial_cmp(&a.confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.method_name.cmp(&b.method_name))
        });
        candidates
    }

    fn score_one(
        &self,
        procedure: &ProcedureSummary,
        service: &Service,
        method: &Method,
    ) -> Option<MatchOutcome> {
        let request = self.catalog.message(&method.request_message);
        let response = self.catalog.message(&method.response_message);
        let scored = score::score(procedure, method, request, response);
        if !scored.clears_floor() {
            return None;
        }
        Some(MatchOutcome {
            method_name: method.name.clone(),
            service_name: service.name.clone(),
            score: scored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql2go_ast::proc::{ParameterSummary, ResultSetSummary};
    use tsql2go_catalog::{Field, Message};

    fn sample_catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_messages(vec![
                Message::new("GetUserRequest", "pkg.GetUserRequest")
                    .with_fields(vec![Field::new("user_id", 1, "int64")]),
                Message::new("User", "pkg.User").with_fields(vec![
                    Field::new("user_id", 1, "int64"),
                    Field::new("email", 2, "string"),
                ]),
            ])
            .with_services(vec![Service::new("Users", "pkg").with_methods(vec![
                Method::new("GetUser", "GetUserRequest", "User"),
            ])])
    }

    #[test]
    fn matches_procedure_to_method_above_floor() {
        let catalog = sample_catalog();
        let matcher = ProcedureMatcher::new(&catalog);
        let procedure = ProcedureSummary::new("GetUser")
            .with_parameters(vec![ParameterSummary {
                name: "user_id".to_string(),
                source_type: "INT".to_string(),
                target_type: "int64".to_string(),
                has_default: false,
                is_output: false,
            }])
            .with_result_sets(vec![ResultSetSummary {
                source_table: "users".to_string(),
                columns: vec!["user_id".to_string(), "email".to_string()],
            }]);

        let outcome = matcher.best_match(&procedure).expect("should match");
        assert_eq!(outcome.method_name, "GetUser");
    }

    #[test]
    fn no_match_below_floor_returns_none() {
        let catalog = sample_catalog();
        let matcher = ProcedureMatcher::new(&catalog);
        let procedure = ProcedureSummary::new("PurgeStaleSessions");
        assert!(matcher.best_match(&procedure).is_none());
    }

    #[test]
    fn ties_break_by_ascending_method_name() {
        let catalog = StaticCatalog::new()
            .with_messages(vec![])
            .with_services(vec![Service::new("Users", "pkg").with_methods(vec![
                Method::new("GetUserZeta", "Req", "Resp"),
                Method::new("GetUserAlpha", "Req", "Resp"),
            ])]);
        let matcher = ProcedureMatcher::new(&catalog);
        let procedure = ProcedureSummary::new("GetUser");
        let ranked = matcher.ranked_matches(&procedure);
        if ranked.len() == 2 {
            assert_eq!(ranked[0].method_name, "GetUserAlpha");
        }
    }
}
