// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-catalog
//!
//! Parsed proto catalog types (spec §3.5): services, methods and messages,
//! as an external proto parser (not this crate, spec §1) would deliver
//! them. This crate also provides [`StaticCatalog`], an in-memory
//! builder used by callers that already have a parsed catalog on hand
//! and by the test suites.

pub mod catalog;
pub mod message;
pub mod method;
pub mod service;

pub use catalog::StaticCatalog;
pub use message::{Field, FieldKind, Message};
pub use method::{Method, OperationClass};
pub use service::Service;
