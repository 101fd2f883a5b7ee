// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Procedure summary (spec §3.6)
//!
//! Produced by an external extractor (not this crate) and consumed by the
//! proto↔procedure matcher ([`tsql2go_protomatch`]) and the RPC back-end's
//! entity/method-name inference.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    pub source_type: String,
    pub target_type: String,
    pub has_default: bool,
    pub is_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSetSummary {
    pub source_table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureSummary {
    pub name: String,
    pub parameters: Vec<ParameterSummary>,
    pub result_sets: Vec<ResultSetSummary>,
    /// Opaque fingerprint of the procedure body (e.g. a hash), used only
    /// for cache-invalidation purposes by callers; the matcher does not
    /// interpret its contents.
    pub body_fingerprint: String,
}

impl ProcedureSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result_sets: Vec::new(),
            body_fingerprint: String::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterSummary>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_result_sets(mut self, result_sets: Vec<ResultSetSummary>) -> Self {
        self.result_sets = result_sets;
        self
    }
}
