// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-protomatch
//!
//! The Proto↔Procedure Matcher (spec §4.6): a confidence-weighted
//! bipartite match between T-SQL procedure summaries and proto RPC
//! methods, used by the `rpc` backend to resolve which method a
//! procedure's DML should call.

mod matcher;
mod score;

pub use matcher::{MatchOutcome, ProcedureMatcher};
pub use score::MatchScore;
