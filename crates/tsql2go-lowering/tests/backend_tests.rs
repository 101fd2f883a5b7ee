// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests exercising each DML backend end to end, one file
//! per variant like the dialect-specific test splits elsewhere in this
//! workspace.

use tsql2go_ast::{Backend, Config};
use tsql2go_comments::CommentIndex;
use tsql2go_functions::FunctionRegistry;
use tsql2go_lowering::lower_unit;
use tsql2go_test_utils::builder::{insert_values, procedure, select_star};

fn config_with_backend(backend: Backend) -> Config {
    Config {
        backend,
        fallback_backend: backend,
        ..Config::default()
    }
}

fn lower_with_backend(backend: Backend) -> tsql2go_lowering::UnitOutput {
    let unit = procedure(
        "ListOrders",
        vec![],
        vec![select_star("Orders"), insert_values("OrderLog", vec!["id"], vec![vec![tsql2go_ast::Expr::int(1)]])],
    );
    lower_unit(
        &unit,
        config_with_backend(backend),
        tsql2go_ast::Dialect::TSql,
        &FunctionRegistry::new(),
        Default::default(),
        CommentIndex::default(),
    )
    .unwrap()
}

#[test]
fn sql_backend_renders_exec_context() {
    let out = lower_with_backend(Backend::Sql);
    assert!(out.body.contains("ExecContext("));
    assert!(out.body.contains("QueryContext("));
}

#[test]
fn rpc_backend_renders_client_call_not_sql() {
    let out = lower_with_backend(Backend::Rpc);
    assert!(!out.body.contains("ExecContext("));
    assert!(!out.body.contains("QueryContext("));
}

#[test]
fn inline_backend_renders_store_calls() {
    let out = lower_with_backend(Backend::Inline);
    assert!(out.body.contains(".Insert("));
    assert!(!out.body.contains("ExecContext("));
}

#[test]
fn mock_backend_wraps_rpc_shape() {
    let out = lower_with_backend(Backend::Mock);
    assert!(!out.body.contains("ExecContext("));
}
