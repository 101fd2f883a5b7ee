// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Line-oriented scanning and statement-signature synthesis.
//!
//! This is deliberately text-based rather than CST-based: the signature
//! scheme (spec §4.1) is built from a statement's own surface syntax, so a
//! simple per-line classifier reproduces exactly the same keys the
//! lowering engine synthesizes later from the parsed AST, without needing
//! to share position information with the external parser.

/// A synthesized statement signature, e.g. `DECLARE:total` or `PROC:getuser`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub String);

pub(crate) enum LineKind {
    Blank,
    CommentOnly(String),
    Statement {
        signature: Option<Signature>,
        trailing_comment: Option<String>,
    },
}

pub(crate) struct Line {
    pub kind: LineKind,
}

pub(crate) fn scan_lines(text: &str) -> Vec<Line> {
    text.lines().map(scan_one_line).collect()
}

fn scan_one_line(raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Line {
            kind: LineKind::Blank,
        };
    }

    if let Some(comment) = trimmed.strip_prefix("--") {
        return Line {
            kind: LineKind::CommentOnly(comment.to_string()),
        };
    }
    if trimmed.starts_with("/*") && trimmed.ends_with("*/") {
        let inner = trimmed
            .trim_start_matches("/*")
            .trim_end_matches("*/")
            .to_string();
        return Line {
            kind: LineKind::CommentOnly(inner),
        };
    }

    let (code, trailing_comment) = split_trailing_comment(trimmed);
    let signature = synthesize_signature(code);

    Line {
        kind: LineKind::Statement {
            signature,
            trailing_comment,
        },
    }
}

/// Splits a `-- ` line comment off the end of a code line. Does not
/// attempt to track string-literal quoting; good enough for the surface
/// syntax this indexer sees in practice.
fn split_trailing_comment(code: &str) -> (&str, Option<String>) {
    match code.find("--") {
        Some(idx) => (code[..idx].trim_end(), Some(code[idx + 2..].to_string())),
        None => (code, None),
    }
}

fn synthesize_signature(code: &str) -> Option<Signature> {
    let upper = code.to_uppercase();

    if upper.starts_with("CREATE PROCEDURE") || upper.starts_with("CREATE PROC") {
        let name = first_identifier_after(code, &["PROCEDURE", "PROC"])?;
        return Some(Signature(format!("PROC:{}", name.to_lowercase())));
    }
    if upper.starts_with("DECLARE") {
        let name = first_variable(code)?;
        return Some(Signature(format!("DECLARE:{}", name.to_lowercase())));
    }
    if upper.starts_with("SET") {
        let name = first_variable(code)?;
        return Some(Signature(format!("SET:{}", name.to_lowercase())));
    }
    if upper.starts_with("IF") {
        let token = first_identifier_or_variable(&code[2..])?;
        return Some(Signature(format!("IF:{}", token.to_lowercase())));
    }
    if upper.starts_with("WHILE") {
        let token = first_identifier_or_variable(&code[5..])?;
        return Some(Signature(format!("WHILE:{}", token.to_lowercase())));
    }

    None
}

fn first_identifier_after(code: &str, keywords: &[&str]) -> Option<String> {
    let upper = code.to_uppercase();
    let mut rest = code;
    for kw in keywords {
        if let Some(pos) = upper.find(kw) {
            rest = &code[pos + kw.len()..];
            break;
        }
    }
    first_identifier_or_variable(rest)
}

fn first_variable(code: &str) -> Option<String> {
    let at = code.find('@')?;
    first_identifier_or_variable(&code[at..])
}

fn first_identifier_or_variable(code: &str) -> Option<String> {
    let trimmed = code.trim_start().trim_start_matches('@');
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    let ident = &trimmed[..end];
    if ident.is_empty() {
        None
    } else {
        Some(ident.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_proc_signature() {
        assert_eq!(
            synthesize_signature("CREATE PROCEDURE GetUser @Id INT"),
            Some(Signature("PROC:getuser".to_string()))
        );
    }

    #[test]
    fn synthesizes_declare_signature() {
        assert_eq!(
            synthesize_signature("DECLARE @Total INT = 0"),
            Some(Signature("DECLARE:total".to_string()))
        );
    }

    #[test]
    fn synthesizes_if_signature_from_variable() {
        assert_eq!(
            synthesize_signature("IF @Flag = 1"),
            Some(Signature("IF:flag".to_string()))
        );
    }

    #[test]
    fn unrecognized_statement_has_no_signature() {
        assert_eq!(synthesize_signature("BEGIN"), None);
    }
}
