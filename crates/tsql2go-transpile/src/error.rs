// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Batch-level fatal errors (spec §4.7, §5 "Error propagation"): an
//! unrecoverable failure anywhere in the batch means the caller gets no
//! partial output, just this single structured error.

use thiserror::Error;
use tsql2go_lowering::LoweringError;

pub type TranspileResult<T> = Result<T, TranspileError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranspileError {
    /// The input batch had statements but none of them were a
    /// `CREATE PROCEDURE`/`CREATE FUNCTION` unit (spec §4.7 last bullet).
    #[error("batch contains no procedures or functions to transpile; use DDL/migration tooling for schema-only input")]
    NoProceduralUnits,

    #[error(transparent)]
    Lowering(#[from] LoweringError),
}
