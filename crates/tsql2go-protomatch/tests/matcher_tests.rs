// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests matching procedure summaries against a canned
//! catalog, exercising the full bipartite scoring pass rather than a
//! single scoring function in isolation.

use tsql2go_ast::proc::ProcedureSummary;
use tsql2go_catalog::{Method, Service, StaticCatalog};
use tsql2go_protomatch::ProcedureMatcher;
use tsql2go_test_utils::MockProtoCatalog;

fn distinctive_catalog() -> StaticCatalog {
    StaticCatalog::new().with_services(vec![Service::new("CatalogService", "catalog.v1").with_methods(vec![
        Method::new("GetWidget", "GetWidgetRequest", "GetWidgetResponse"),
        Method::new("ListOrder", "ListOrderRequest", "ListOrderResponse"),
    ])])
}

#[test]
fn matches_procedure_to_its_verb_aligned_method() {
    let catalog = distinctive_catalog();
    let matcher = ProcedureMatcher::new(&catalog);

    let summary = ProcedureSummary::new("GetWidget");
    let outcome = matcher.best_match(&summary).expect("expected a match");

    assert_eq!(outcome.method_name, "GetWidget");
    assert_eq!(outcome.service_name, "CatalogService");
}

#[test]
fn unrelated_procedure_name_yields_no_confident_match() {
    let catalog = MockProtoCatalog::user_service().build();
    let matcher = ProcedureMatcher::new(&catalog);

    let summary = ProcedureSummary::new("ComputeQuarterlyTaxReport");
    assert!(matcher.best_match(&summary).is_none());
}
