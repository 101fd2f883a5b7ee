// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # DML back-end selector (spec §4.4, §6)

use serde::{Deserialize, Serialize};

/// Pluggable strategy for lowering DML statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Parameterized SQL text over a relational driver.
    Sql,
    /// Remote-procedure calls matched against a parsed proto catalog.
    Rpc,
    /// A programmable in-process mock server.
    Mock,
    /// Direct calls into a structured-data runtime library.
    Inline,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Sql
    }
}
