// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # tsql2go-comments
//!
//! The Comment Indexer (spec §4.1): during parsing, the indexer is handed
//! the raw input text and produces a map from synthesized **statement
//! signatures** to their leading and same-line trailing comments.
//!
//! Signatures are composite strings, not positions, so the index never
//! needs to carry the external parser's AST node identities — only the
//! same signature-synthesis rule the lowering engine uses when it looks
//! comments up (`PROC:<lower-name>`, `DECLARE:<lower-name>`,
//! `SET:<lower-name>`, `IF:<first-ident>`, `WHILE:<first-ident>`).

use std::collections::HashMap;

mod scan;

pub use scan::Signature;

/// A single bound comment, whitespace-trimmed, verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundComments {
    pub leading: Vec<String>,
    pub trailing: Option<String>,
}

impl BoundComments {
    fn empty() -> Self {
        Self {
            leading: Vec::new(),
            trailing: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_none()
    }
}

/// The index built by [`CommentIndexer::index`].
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    by_signature: HashMap<String, BoundComments>,
}

impl CommentIndex {
    /// Lookup is exact; a signature with no comments returns an empty
    /// [`BoundComments`] (spec §4.1 contract).
    pub fn lookup(&self, signature: &str) -> BoundComments {
        self.by_signature
            .get(signature)
            .cloned()
            .unwrap_or_else(BoundComments::empty)
    }
}

/// Builds a [`CommentIndex`] from raw T-SQL text.
pub struct CommentIndexer;

impl CommentIndexer {
    /// Idempotent: the same input text always produces the same index
    /// (spec §4.1 contract).
    pub fn index(text: &str) -> CommentIndex {
        let lines = scan::scan_lines(text);
        let mut by_signature: HashMap<String, BoundComments> = HashMap::new();

        let mut pending_leading: Vec<String> = Vec::new();
        for line in &lines {
            match &line.kind {
                scan::LineKind::CommentOnly(text) => {
                    pending_leading.push(text.trim().to_string());
                }
                scan::LineKind::Blank => {
                    // A blank line severs a run of leading comments from the
                    // statement that follows it, matching how a reader would
                    // parse a "floating" comment block.
                    pending_leading.clear();
                }
                scan::LineKind::Statement {
                    signature,
                    trailing_comment,
                } => {
                    if let Some(signature) = signature {
                        let entry = by_signature
                            .entry(signature.0.clone())
                            .or_insert_with(BoundComments::empty);
                        entry.leading.extend(pending_leading.drain(..));
                        if let Some(trailing) = trailing_comment {
                            entry.trailing = Some(trailing.trim().to_string());
                        }
                    } else {
                        pending_leading.clear();
                    }
                }
            }
        }

        CommentIndex { by_signature }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_leading_comment_to_declare() {
        let text = "-- running total\nDECLARE @Total INT = 0;\n";
        let index = CommentIndexer::index(text);
        let bound = index.lookup("DECLARE:total");
        assert_eq!(bound.leading, vec!["running total".to_string()]);
    }

    #[test]
    fn binds_trailing_comment_same_line() {
        let text = "SET @Total = 0 -- reset\n";
        let index = CommentIndexer::index(text);
        let bound = index.lookup("SET:total");
        assert_eq!(bound.trailing.as_deref(), Some("reset"));
    }

    #[test]
    fn missing_signature_returns_empty() {
        let index = CommentIndexer::index("SELECT 1;\n");
        assert!(index.lookup("DECLARE:nope").is_empty());
    }

    #[test]
    fn blank_line_severs_leading_run() {
        let text = "-- stale comment\n\nDECLARE @X INT;\n";
        let index = CommentIndexer::index(text);
        assert!(index.lookup("DECLARE:x").leading.is_empty());
    }

    #[test]
    fn idempotent_across_calls() {
        let text = "-- note\nIF @Flag = 1\nBEGIN\nEND\n";
        let a = CommentIndexer::index(text);
        let b = CommentIndexer::index(text);
        assert_eq!(
            a.lookup("IF:flag").leading,
            b.lookup("IF:flag").leading
        );
    }
}
