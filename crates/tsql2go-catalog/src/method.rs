// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Proto methods (spec §3.5, §4.4.2, §4.6)

use serde::{Deserialize, Serialize};

/// Coarse-grained RPC category inferred from a method's verb prefix
/// (spec §4.4.2, Glossary "Operation class").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationClass {
    Read,
    Create,
    Update,
    Delete,
    Exec,
}

impl OperationClass {
    /// Infer the class from a method's verb prefix (spec §4.6 step 1).
    pub fn infer_from_method_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let starts_with_any = |prefixes: &[&str]| prefixes.iter().any(|p| lower.starts_with(p));

        if starts_with_any(&["get", "list", "find", "search"]) {
            OperationClass::Read
        } else if starts_with_any(&["create", "add", "insert"]) {
            OperationClass::Create
        } else if starts_with_any(&["update", "set", "modify"]) {
            OperationClass::Update
        } else if starts_with_any(&["delete", "remove"]) {
            OperationClass::Delete
        } else {
            OperationClass::Exec
        }
    }

    /// Infer the class from a DML statement kind (spec §4.4.2).
    pub fn from_statement_kind(kind: &str) -> Self {
        match kind.to_lowercase().as_str() {
            "select" => OperationClass::Read,
            "insert" => OperationClass::Create,
            "update" => OperationClass::Update,
            "delete" => OperationClass::Delete,
            _ => OperationClass::Exec,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            OperationClass::Read => "Get",
            OperationClass::Create => "Create",
            OperationClass::Update => "Update",
            OperationClass::Delete => "Delete",
            OperationClass::Exec => "Exec",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub request_message: String,
    pub response_message: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        request_message: impl Into<String>,
        response_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            request_message: request_message.into(),
            response_message: response_message.into(),
            client_streaming: false,
            server_streaming: false,
        }
    }

    pub fn operation_class(&self) -> OperationClass {
        OperationClass::infer_from_method_name(&self.name)
    }

    /// The method name stripped of its inferred verb prefix, used by
    /// name-similarity scoring (spec §4.6).
    pub fn stem(&self) -> String {
        let verb = self.operation_class().verb().to_lowercase();
        let lower = self.name.to_lowercase();
        lower.strip_prefix(&verb).unwrap_or(&lower).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_operation_class_from_verb() {
        assert_eq!(
            OperationClass::infer_from_method_name("GetUserById"),
            OperationClass::Read
        );
        assert_eq!(
            OperationClass::infer_from_method_name("CreateUser"),
            OperationClass::Create
        );
        assert_eq!(
            OperationClass::infer_from_method_name("RemoveUser"),
            OperationClass::Delete
        );
        assert_eq!(
            OperationClass::infer_from_method_name("ArchiveUser"),
            OperationClass::Exec
        );
    }

    #[test]
    fn stem_strips_verb_prefix() {
        let m = Method::new("GetUserById", "GetUserByIdRequest", "User");
        assert_eq!(m.stem(), "userbyid");
    }
}
