// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Proto messages and fields (spec §3.5)

use serde::{Deserialize, Serialize};

/// Shape a field's wire-level nullability/repetition takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// A `proto3 optional` scalar field.
    Optional,
    /// A nested message field.
    Message,
    /// A `repeated` field.
    Repeated,
    /// A `map<k, v>` field.
    Map,
    /// A plain required-by-convention scalar field.
    Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub wire_number: u32,
    pub wire_type: String,
    pub kind: FieldKind,
    /// `Some((key_type, value_type))` when `kind == Map`.
    pub map_types: Option<(String, String)>,
}

impl Field {
    pub fn new(name: impl Into<String>, wire_number: u32, wire_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire_number,
            wire_type: wire_type.into(),
            kind: FieldKind::Scalar,
            map_types: None,
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, FieldKind::Map)
    }

    /// Normalized name used by the matcher's field-overlap scoring
    /// (spec §4.6): lowercased, underscores stripped.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase().replace('_', "")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub fully_qualified_name: String,
    pub fields: Vec<Field>,
}

impl Message {
    pub fn new(name: impl Into<String>, fully_qualified_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name: fully_qualified_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Fields that are plain scalars (not message/repeated/map), used by
    /// the matcher's response-shape overlap scoring (spec §4.6).
    pub fn scalar_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Scalar | FieldKind::Optional))
    }
}
