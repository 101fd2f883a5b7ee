// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Diagnostics & Assembly (spec §4.7): splices the per-unit outputs the
//! unit driver collected into one package-level Go source text.

use std::collections::BTreeSet;

use tsql2go_ast::{Config, SpLogger};
use tsql2go_lowering::UnitOutput;

/// The Go constructor call for the configured SP-logger (spec §4.3.4,
/// §6 `sp-logger` option). Callers only reach this after checking
/// `SpLogger::is_enabled`.
fn logger_ctor(logger: SpLogger) -> &'static str {
    match logger {
        SpLogger::Slog => "tsql2gort.NewSlogLogger()",
        SpLogger::Db => "tsql2gort.NewDbLogger()",
        SpLogger::File => "tsql2gort.NewFileLogger()",
        SpLogger::Multi => "tsql2gort.NewMultiLogger()",
        SpLogger::Nop => "tsql2gort.NewNopLogger()",
        SpLogger::None => unreachable!("caller checks is_enabled() first"),
    }
}

/// Builds the full package source text: package declaration, sorted
/// import block, optional logger-init block, then every unit's
/// doc-commented signature and body in batch order.
pub fn assemble(config: &Config, imports: &BTreeSet<String>, units: &[UnitOutput]) -> String {
    let mut out = String::new();
    out.push_str(&format!("package {}\n\n", config.package));

    if !imports.is_empty() {
        out.push_str("import (\n");
        for import in imports {
            out.push_str(&format!("\t\"{import}\"\n"));
        }
        out.push_str(")\n\n");
    }

    if config.sp_logger.is_enabled() {
        out.push_str(&format!("var spLogger = {}\n\n", logger_ctor(config.sp_logger)));
    }

    for unit in units {
        for line in &unit.doc_comment {
            out.push_str(&format!("// {line}\n"));
        }
        out.push_str(&unit.signature);
        out.push('\n');
        out.push_str(&unit.body);
        out.push_str("}\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(signature: &str, body: &str) -> UnitOutput {
        UnitOutput {
            proc_name: "GetUser".to_string(),
            doc_comment: vec![],
            signature: signature.to_string(),
            body: body.to_string(),
            diagnostics: tsql2go_ast::Diagnostics::default(),
            imports: BTreeSet::new(),
        }
    }

    #[test]
    fn emits_package_and_sorted_imports() {
        let mut imports = BTreeSet::new();
        imports.insert("fmt".to_string());
        imports.insert("context".to_string());
        let text = assemble(&Config::default(), &imports, &[]);
        assert!(text.starts_with("package generated\n\n"));
        let fmt_idx = text.find("\"fmt\"").unwrap();
        let ctx_idx = text.find("\"context\"").unwrap();
        assert!(ctx_idx < fmt_idx);
    }

    #[test]
    fn emits_logger_init_block_when_enabled() {
        let config = Config {
            sp_logger: SpLogger::Slog,
            ..Config::default()
        };
        let text = assemble(&config, &BTreeSet::new(), &[]);
        assert!(text.contains("var spLogger = tsql2gort.NewSlogLogger()"));
    }

    #[test]
    fn no_logger_block_when_disabled() {
        let text = assemble(&Config::default(), &BTreeSet::new(), &[]);
        assert!(!text.contains("spLogger"));
    }

    #[test]
    fn concatenates_units_in_order_with_doc_comments() {
        let mut first = unit("func GetUser() (err error) {", "\treturn nil\n");
        first.doc_comment = vec!["fetches a user".to_string()];
        let second = unit("func GetOrder() (err error) {", "\treturn nil\n");
        let text = assemble(&Config::default(), &BTreeSet::new(), &[first, second]);
        let user_idx = text.find("func GetUser").unwrap();
        let order_idx = text.find("func GetOrder").unwrap();
        assert!(user_idx < order_idx);
        assert!(text.contains("// fetches a user\nfunc GetUser"));
    }
}
