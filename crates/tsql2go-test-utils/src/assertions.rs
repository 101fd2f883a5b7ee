// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertion helpers for emitted-Go-text tests.

use tsql2go_ast::Diagnostics;

/// Asserts `haystack` contains `snippet` verbatim, panicking with both
/// strings on failure so a mismatch is easy to diff by eye.
pub fn assert_contains_go_snippet(haystack: &str, snippet: &str) {
    assert!(
        haystack.contains(snippet),
        "expected generated Go to contain:\n---\n{snippet}\n---\nfound:\n---\n{haystack}\n---"
    );
}

/// Asserts `haystack` does not contain `snippet`.
pub fn assert_not_contains_go_snippet(haystack: &str, snippet: &str) {
    assert!(
        !haystack.contains(snippet),
        "expected generated Go to NOT contain:\n---\n{snippet}\n---\nfound in:\n---\n{haystack}\n---"
    );
}

/// Asserts a [`Diagnostics`] accumulator carries no warnings, the
/// all-clear case most lowering tests expect.
pub fn assert_no_warnings(diagnostics: &Diagnostics) {
    assert!(
        diagnostics.warnings.is_empty(),
        "expected no warnings, found {:?}",
        diagnostics.warnings
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_passes_on_substring() {
        assert_contains_go_snippet("func GetUser(ctx context.Context) error {", "func GetUser(");
    }

    #[test]
    #[should_panic(expected = "expected generated Go to contain")]
    fn contains_panics_on_miss() {
        assert_contains_go_snippet("func GetUser() error {", "func GetOrder(");
    }

    #[test]
    fn no_warnings_passes_on_empty_diagnostics() {
        assert_no_warnings(&Diagnostics::default());
    }
}
