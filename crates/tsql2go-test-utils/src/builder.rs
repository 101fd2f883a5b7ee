// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! AST builder helpers for lowering/transpile tests, built on the free
//! constructors [`tsql2go_ast::Expr`] already carries; these add the
//! statement-level shapes that crate has no need of outside test code.

use tsql2go_ast::{
    Assignment, CatchBlock, CursorDecl, Expr, InsertSource, InsertStatement, ParamDecl,
    SelectItem, SelectStatement, Statement, TableRef, TryCatch, UpdateStatement,
};

pub fn param(name: &str, declared_type: &str) -> ParamDecl {
    ParamDecl {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        output: false,
        default: None,
    }
}

pub fn output_param(name: &str, declared_type: &str) -> ParamDecl {
    ParamDecl {
        output: true,
        ..param(name, declared_type)
    }
}

pub fn procedure(name: &str, params: Vec<ParamDecl>, body: Vec<Statement>) -> Statement {
    Statement::Procedure {
        name: name.to_string(),
        params,
        body,
    }
}

pub fn function(name: &str, params: Vec<ParamDecl>, returns: &str, body: Vec<Statement>) -> Statement {
    Statement::Function {
        name: name.to_string(),
        params,
        returns: returns.to_string(),
        body,
    }
}

pub fn declare(name: &str, declared_type: &str, init: Option<Expr>) -> Statement {
    Statement::Declare {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        init,
        is_table: false,
    }
}

pub fn set(target: &str, value: Expr) -> Statement {
    Statement::Set {
        target: target.to_string(),
        value,
        is_method_call: false,
    }
}

pub fn if_then(condition: Expr, then_branch: Vec<Statement>) -> Statement {
    Statement::If {
        condition,
        then_branch,
        else_branch: None,
    }
}

pub fn if_then_else(condition: Expr, then_branch: Vec<Statement>, else_branch: Vec<Statement>) -> Statement {
    Statement::If {
        condition,
        then_branch,
        else_branch: Some(else_branch),
    }
}

pub fn while_loop(condition: Expr, body: Vec<Statement>) -> Statement {
    Statement::While { condition, body }
}

pub fn ret(value: Option<Expr>) -> Statement {
    Statement::Return(value)
}

pub fn try_catch(try_body: Vec<Statement>, catch_body: Vec<Statement>) -> Statement {
    Statement::TryCatch(TryCatch {
        try_body,
        catch: CatchBlock { body: catch_body },
    })
}

pub fn table(name: &str) -> TableRef {
    TableRef {
        name: name.to_string(),
        alias: None,
        hints: Vec::new(),
    }
}

pub fn select_star(from: &str) -> Statement {
    Statement::Select(Box::new(SelectStatement {
        items: vec![SelectItem {
            expr: Expr::ident("*"),
            alias: None,
            assign_to: None,
        }],
        from: Some(table(from)),
        joins: Vec::new(),
        where_clause: None,
        group_by: Vec::new(),
        having: None,
        order_by: Vec::new(),
        top: None,
    }))
}

pub fn insert_values(into: &str, columns: Vec<&str>, rows: Vec<Vec<Expr>>) -> Statement {
    Statement::Insert(Box::new(InsertStatement {
        table: table(into),
        columns: columns.into_iter().map(String::from).collect(),
        source: InsertSource::Values(rows),
    }))
}

pub fn update_set(table_name: &str, assignments: Vec<(&str, Expr)>, where_clause: Option<Expr>) -> Statement {
    Statement::Update(Box::new(UpdateStatement {
        table: table(table_name),
        assignments: assignments
            .into_iter()
            .map(|(target, value)| Assignment {
                target: target.to_string(),
                value,
            })
            .collect(),
        where_clause,
    }))
}

pub fn cursor_declare(name: &str, query: Statement, fetch_into: Vec<&str>) -> Statement {
    Statement::CursorDeclare(Box::new(CursorDecl {
        name: name.to_string(),
        query: Box::new(query),
        fetch_into: fetch_into.into_iter().map(String::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_minimal_procedure() {
        let proc = procedure("GetUser", vec![param("userId", "INT")], vec![ret(Some(Expr::int(0)))]);
        match proc {
            Statement::Procedure { name, params, body } => {
                assert_eq!(name, "GetUser");
                assert_eq!(params.len(), 1);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("expected Procedure"),
        }
    }

    #[test]
    fn output_param_sets_output_flag() {
        let p = output_param("total", "DECIMAL");
        assert!(p.output);
    }
}
