// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-functions
//!
//! A centralized registry of builtin T-SQL scalar functions with known
//! return types and arity, consulted by the semantic analyzer (spec
//! §4.2) when it types a `CALL` expression and by the lowering engine
//! (spec §4.5) when it emits the target-language equivalent.

mod builtin;
mod registry;
mod signature;

pub use registry::FunctionRegistry;
pub use signature::FunctionSignature;
