// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-unit lowering state (spec §3.4).
//!
//! One [`UnitContext`] is created per top-level unit (procedure) and
//! discarded once that unit's Go source text has been produced; nothing
//! here survives across units, matching the stateless-across-batches
//! execution model (spec §5).

use std::collections::{BTreeSet, HashMap};

use tsql2go_ast::{Backend, Config, CursorDecl, Diagnostics, Dialect};
use tsql2go_ast::proc::ProcedureSummary;
use tsql2go_comments::CommentIndex;

/// Accumulates Go source text plus every piece of side-state the
/// lowering stages need to share while lowering a single procedure.
pub struct UnitContext {
    pub config: Config,
    pub dialect: Dialect,
    pub backend: Backend,

    /// Deduplicated import paths; sorted and emitted by the assembly
    /// stage (spec §4.7).
    pub imports: BTreeSet<String>,

    buf: String,
    indent: usize,

    pub proc_name: String,
    /// `(name, go_type)` pairs for `OUTPUT` parameters, used to build
    /// the function's named-return list (spec §4.3.1).
    pub out_params: Vec<(String, String)>,
    /// Set once a bare `RETURN <expr>` is seen; controls whether the
    /// generated signature carries a value return alongside named
    /// outputs (spec §4.3.6).
    pub return_carries_value: bool,
    /// The Go type of that scalar return, once `return_carries_value`
    /// is set; used to pick the right zero value on early-exit error
    /// paths instead of an untyped `nil`.
    pub scalar_return_go_type: Option<String>,

    /// Whether the procedure reads `@@ROWCOUNT` anywhere in its body,
    /// decided by a pre-scan before lowering starts; gates whether write
    /// DML captures `sql.Result` instead of discarding it (spec §9).
    pub reads_rowcount: bool,

    pub in_try: bool,
    pub in_catch: bool,
    pub in_transaction: bool,

    pub cursors: HashMap<String, CursorDecl>,
    /// Known signatures of procedures this unit calls, keyed by
    /// lower-cased procedure name.
    pub udf_signatures: HashMap<String, ProcedureSummary>,

    /// Comments bound to statement signatures by the Comment Indexer
    /// (spec §4.1), looked up by `DECLARE:`/`SET:`/`IF:`/`WHILE:` keys as
    /// each statement lowers.
    pub comments: CommentIndex,

    pub diagnostics: Diagnostics,
}

impl UnitContext {
    pub fn new(proc_name: impl Into<String>, config: Config, dialect: Dialect) -> Self {
        let backend = config.fallback_backend;
        Self {
            config,
            dialect,
            backend,
            imports: BTreeSet::new(),
            buf: String::new(),
            indent: 0,
            proc_name: proc_name.into(),
            out_params: Vec::new(),
            return_carries_value: false,
            scalar_return_go_type: None,
            reads_rowcount: false,
            in_try: false,
            in_catch: false,
            in_transaction: false,
            cursors: HashMap::new(),
            udf_signatures: HashMap::new(),
            comments: CommentIndex::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn add_import(&mut self, path: impl Into<String>) {
        self.imports.insert(path.into());
    }

    pub fn push_indent(&mut self) {
        self.indent += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_line(&mut self, line: &str) {
        if line.is_empty() {
            self.buf.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.buf.push('\t');
        }
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// The accumulated procedure body text, without the enclosing
    /// function shell (added separately in the assembly stage).
    pub fn into_body(self) -> (String, Diagnostics, BTreeSet<String>) {
        (self.buf, self.diagnostics, self.imports)
    }

    pub fn body(&self) -> &str {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_line_respects_indent() {
        let mut ctx = UnitContext::new("GetUser", Config::default(), Dialect::TSql);
        ctx.push_indent();
        ctx.write_line("return nil");
        assert_eq!(ctx.body(), "\treturn nil\n");
    }

    #[test]
    fn imports_are_deduplicated_and_sorted() {
        let mut ctx = UnitContext::new("GetUser", Config::default(), Dialect::TSql);
        ctx.add_import("context");
        ctx.add_import("fmt");
        ctx.add_import("context");
        let imports: Vec<_> = ctx.imports.iter().collect();
        assert_eq!(imports, vec!["context", "fmt"]);
    }
}
