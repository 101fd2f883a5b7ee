// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin function table (spec §4.2, §4.5, §D).
//!
//! Every function a transpiled procedure can call without a UDF
//! signature entry. Names are matched case-insensitively by the
//! registry; the table itself is written upper-case to match T-SQL
//! convention.

use tsql2go_ast::TargetType;

use crate::signature::FunctionSignature;

pub fn all_functions() -> Vec<FunctionSignature> {
    use TargetType::*;
    vec![
        // String functions
        FunctionSignature::new("LEN", Int64, 1, Some(1)),
        FunctionSignature::new("SUBSTRING", String, 3, Some(3)),
        FunctionSignature::new("CONCAT", String, 1, None),
        FunctionSignature::new("UPPER", String, 1, Some(1)),
        FunctionSignature::new("LOWER", String, 1, Some(1)),
        FunctionSignature::new("CHARINDEX", Int64, 2, Some(3)),
        FunctionSignature::new("LEFT", String, 2, Some(2)),
        FunctionSignature::new("RIGHT", String, 2, Some(2)),
        FunctionSignature::new("REPLACE", String, 3, Some(3)),
        FunctionSignature::new("REPLICATE", String, 2, Some(2)),
        FunctionSignature::new("REVERSE", String, 1, Some(1)),
        // Date/time functions
        FunctionSignature::new("GETDATE", Timestamp, 0, Some(0)),
        FunctionSignature::new("DATEADD", Timestamp, 3, Some(3)),
        FunctionSignature::new("DATEDIFF", Int64, 3, Some(3)),
        // Numeric functions
        FunctionSignature::new("ABS", Decimal, 1, Some(1)),
        FunctionSignature::new("ROUND", Decimal, 1, Some(2)),
        FunctionSignature::new("POWER", Decimal, 2, Some(2)),
        FunctionSignature::new("CEIL", Int64, 1, Some(1)),
        FunctionSignature::new("FLOOR", Int64, 1, Some(1)),
        FunctionSignature::new("SQRT", Float64, 1, Some(1)),
        FunctionSignature::new("SIGN", Int32, 1, Some(1)),
        // Null-handling
        FunctionSignature::new("ISNULL", Opaque, 2, Some(2)),
        FunctionSignature::new("COALESCE", Opaque, 1, None),
        // Identity
        FunctionSignature::new("NEWID", String, 0, Some(0)),
        // Error-context accessors, valid only inside a CATCH block
        // (spec §4.3.4)
        FunctionSignature::new("ERROR_MESSAGE", String, 0, Some(0)),
        FunctionSignature::new("ERROR_NUMBER", Int32, 0, Some(0)),
        FunctionSignature::new("ERROR_PROCEDURE", String, 0, Some(0)),
        FunctionSignature::new("ERROR_LINE", Int32, 0, Some(0)),
        FunctionSignature::new("ERROR_SEVERITY", Int32, 0, Some(0)),
        FunctionSignature::new("ERROR_STATE", Int32, 0, Some(0)),
    ]
}

/// The subset of [`all_functions`] only valid inside a `CATCH` block
/// (spec §4.3.4). The semantic analyzer rejects their use elsewhere.
pub fn is_error_context_function(name: &str) -> bool {
    matches!(
        name.to_uppercase().as_str(),
        "ERROR_MESSAGE"
            | "ERROR_NUMBER"
            | "ERROR_PROCEDURE"
            | "ERROR_LINE"
            | "ERROR_SEVERITY"
            | "ERROR_STATE"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_names() {
        let fns = all_functions();
        let mut names: Vec<_> = fns.iter().map(|f| f.name).collect();
        names.sort_unstable();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }

    #[test]
    fn error_accessors_are_flagged() {
        assert!(is_error_context_function("error_message"));
        assert!(!is_error_context_function("LEN"));
    }
}
