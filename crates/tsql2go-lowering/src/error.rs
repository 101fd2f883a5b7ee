// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fatal lowering errors (spec §7). Unlike the semantic analyzer's
//! errors, most of what lowering encounters is handled by degrading
//! gracefully and recording a [`tsql2go_ast::Diagnostic`] — these
//! variants are reserved for the handful of cases spec §7 calls out as
//! unrecoverable.

use thiserror::Error;
use tsql2go_semantic::SemanticError;

pub type LoweringResult<T> = Result<T, LoweringError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoweringError {
    /// `BEGIN TRANSACTION` nested inside an already-open transaction
    /// (spec §9 Open Question #2: rejected fatally rather than silently
    /// flattened).
    #[error("nested BEGIN TRANSACTION is not supported")]
    NestedTransaction,

    /// Dynamic SQL (`EXEC(@sql)` / `sp_executesql`) cannot be routed to
    /// any backend; the unit is abandoned rather than emitting broken
    /// code (spec §4.4, Diagnostic::DynamicSqlDetected covers the
    /// recoverable sibling case where the rest of the unit still
    /// lowers).
    #[error("dynamic SQL construct could not be lowered: {0}")]
    DynamicSqlUnsupported(String),

    /// A CTE was referenced by DML routed to the `rpc` backend, which
    /// has no way to express a CTE as a single RPC call (spec §4.4).
    #[error("common table expression '{0}' cannot be lowered for the rpc backend")]
    CteUnsupportedByRpcBackend(String),

    /// `FETCH NEXT` referenced a cursor with no matching `DECLARE
    /// CURSOR` in the same unit.
    #[error("cursor '{0}' was never declared")]
    UnresolvedCursor(String),

    /// A call to another procedure had no known signature in the
    /// lowering context's UDF signature map (spec §3.4).
    #[error("no known signature for called procedure '{0}'")]
    UnknownProcedureSignature(String),

    /// The proto↔procedure matcher produced no candidate above its
    /// confidence floor and no `fallback_backend` diagnostic route
    /// applies.
    #[error("no rpc method matched procedure '{0}' with sufficient confidence")]
    NoConfidentRpcMatch(String),

    /// DDL encountered under `ddl_policy = strict` (spec §4.7, §6).
    #[error("DDL statement '{0}' is not permitted under the strict ddl policy")]
    StrictDdlEncountered(String),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
