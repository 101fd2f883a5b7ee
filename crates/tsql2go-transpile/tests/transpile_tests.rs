// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end pipeline tests: a whole batch goes in, assembled Go
//! source comes out, rather than testing any one stage in isolation.

use std::collections::HashMap;

use tsql2go_ast::{Batch, Config, Dialect};
use tsql2go_functions::FunctionRegistry;
use tsql2go_test_utils::fixtures::{crc16_procedure, easter_procedure};
use tsql2go_transpile::transpile;

#[test]
fn transpiles_a_single_procedure_end_to_end() {
    let batch = Batch {
        units: vec![easter_procedure()],
    };
    let output = transpile(
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

    assert!(output.source.contains("func "));
    assert!(output.proto_matches.is_empty());
}

#[test]
fn transpiles_a_batch_of_several_procedures() {
    let batch = Batch {
        units: vec![easter_procedure(), crc16_procedure()],
    };
    let output = transpile(
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

    let func_count = output.source.matches("func ").count();
    assert_eq!(func_count, 2);
}

#[test]
fn ddl_only_batch_is_rejected() {
    let batch = Batch {
        units: vec![tsql2go_ast::Statement::CreateTable {
            name: "Widgets".to_string(),
            is_temp: false,
            columns: vec![("id".to_string(), "INT".to_string())],
        }],
    };
    let result = transpile(
        &batch,
        Config::default(),
        Dialect::TSql,
        &FunctionRegistry::new(),
        HashMap::new(),
        "",
        None,
        &[],
    );
    assert!(result.is_err());
}
