// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::collections::HashMap;

use crate::builtin;
use crate::signature::FunctionSignature;

/// Lookup table for builtin functions, keyed case-insensitively.
///
/// # Examples
///
/// ```
/// use tsql2go_functions::FunctionRegistry;
///
/// let registry = FunctionRegistry::new();
/// assert!(registry.lookup("len").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    by_name: HashMap<String, FunctionSignature>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let by_name = builtin::all_functions()
            .into_iter()
            .map(|f| (f.name.to_uppercase(), f))
            .collect();
        Self { by_name }
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionSignature> {
        self.by_name.get(&name.to_uppercase())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_uppercase())
    }

    pub fn is_error_context_function(&self, name: &str) -> bool {
        builtin::is_error_context_function(name)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_case_insensitively() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.lookup("Len").unwrap().name, "LEN");
        assert!(registry.lookup("NOT_A_FUNCTION").is_none());
    }

    #[test]
    fn arity_is_enforced_by_signature() {
        let registry = FunctionRegistry::new();
        let substring = registry.lookup("SUBSTRING").unwrap();
        assert!(substring.accepts_arity(3));
        assert!(!substring.accepts_arity(2));
    }
}
