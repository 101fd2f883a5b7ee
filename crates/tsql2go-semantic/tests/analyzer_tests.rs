// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the scoped analyzer, exercising declare/read
//! tracking and expression inference together rather than in isolation.

use tsql2go_ast::{Expr, TargetType, TypeDescriptor};
use tsql2go_semantic::{SemanticAnalyzer, Symbol};

#[test]
fn declared_local_is_readable_after_declare() {
    let mut analyzer = SemanticAnalyzer::new();
    let scope_id = analyzer.scopes().current_id();
    analyzer
        .scopes()
        .declare(Symbol::local("total", TypeDescriptor::new(TargetType::Int64), scope_id))
        .unwrap();
    analyzer.scopes().mark_read("total").unwrap();
    assert!(analyzer.infer(&Expr::var("total")).is_ok());
}

#[test]
fn reading_an_undeclared_variable_fails() {
    let mut analyzer = SemanticAnalyzer::new();
    assert!(analyzer.infer(&Expr::var("missing")).is_err());
}

#[test]
fn system_global_identifier_never_needs_a_declaration() {
    let mut analyzer = SemanticAnalyzer::new();
    let descriptor = analyzer.infer(&Expr::ident("@@ROWCOUNT")).unwrap();
    assert_eq!(descriptor, TypeDescriptor::new(TargetType::Opaque));
}
