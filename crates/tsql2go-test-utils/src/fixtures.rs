// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fixture procedures for every end-to-end scenario: Easter, Levenshtein
//! distance, modular exponentiation, amortization, CRC-16-CCITT and a
//! three-row cursor walk. Each builds the `Statement::Procedure` AST an
//! external T-SQL parser would hand the transpiler; none of these are
//! executed here, only lowered and asserted against in the crates that
//! depend on this one.

use tsql2go_ast::{BinaryOp, Expr, Statement};

use crate::builder::{
    cursor_declare, declare, if_then, insert_values, output_param, param, procedure, ret, select_star, set,
    while_loop,
};

fn var(name: &str) -> Expr {
    Expr::var(name)
}

fn infix(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::infix(left, op, right)
}

/// Anonymous Gregorian algorithm, `CalculateEasterDate(@Year INT, @Month
/// INT OUTPUT, @Day INT OUTPUT)` (spec.md §8 scenario 1).
pub fn easter_procedure() -> Statement {
    let body = vec![
        declare("a", "INT", Some(infix(var("Year"), BinaryOp::Mod, Expr::int(19)))),
        declare("b", "INT", Some(infix(var("Year"), BinaryOp::Div, Expr::int(100)))),
        declare("c", "INT", Some(infix(var("Year"), BinaryOp::Mod, Expr::int(100)))),
        declare("d", "INT", Some(infix(var("b"), BinaryOp::Div, Expr::int(4)))),
        declare("e", "INT", Some(infix(var("b"), BinaryOp::Mod, Expr::int(4)))),
        declare(
            "f",
            "INT",
            Some(infix(
                infix(var("b"), BinaryOp::Add, Expr::int(8)),
                BinaryOp::Div,
                Expr::int(25),
            )),
        ),
        declare(
            "g",
            "INT",
            Some(infix(
                infix(
                    infix(var("b"), BinaryOp::Sub, var("f")),
                    BinaryOp::Add,
                    Expr::int(1),
                ),
                BinaryOp::Div,
                Expr::int(3),
            )),
        ),
        declare(
            "h",
            "INT",
            Some(infix(
                infix(
                    infix(
                        infix(
                            infix(Expr::int(19), BinaryOp::Mul, var("a")),
                            BinaryOp::Add,
                            var("b"),
                        ),
                        BinaryOp::Sub,
                        var("d"),
                    ),
                    BinaryOp::Sub,
                    var("g"),
                ),
                BinaryOp::Add,
                Expr::int(15),
            )),
        ),
        set("h", infix(var("h"), BinaryOp::Mod, Expr::int(30))),
        declare("i", "INT", Some(infix(var("c"), BinaryOp::Div, Expr::int(4)))),
        declare("k", "INT", Some(infix(var("c"), BinaryOp::Mod, Expr::int(4)))),
        declare(
            "l",
            "INT",
            Some(infix(
                infix(
                    infix(
                        infix(Expr::int(32), BinaryOp::Add, infix(Expr::int(2), BinaryOp::Mul, var("e"))),
                        BinaryOp::Add,
                        infix(Expr::int(2), BinaryOp::Mul, var("i")),
                    ),
                    BinaryOp::Sub,
                    var("h"),
                ),
                BinaryOp::Sub,
                var("k"),
            )),
        ),
        set("l", infix(var("l"), BinaryOp::Mod, Expr::int(7))),
        declare(
            "m",
            "INT",
            Some(infix(
                infix(
                    infix(var("a"), BinaryOp::Add, infix(Expr::int(11), BinaryOp::Mul, var("h"))),
                    BinaryOp::Add,
                    infix(Expr::int(22), BinaryOp::Mul, var("l")),
                ),
                BinaryOp::Div,
                Expr::int(451),
            )),
        ),
        set(
            "Month",
            infix(
                infix(
                    infix(var("h"), BinaryOp::Add, var("l")),
                    BinaryOp::Sub,
                    infix(Expr::int(7), BinaryOp::Mul, var("m")),
                ),
                BinaryOp::Add,
                Expr::int(114),
            ),
        ),
        set("Month", infix(var("Month"), BinaryOp::Div, Expr::int(31))),
        declare(
            "day_of_month",
            "INT",
            Some(infix(
                infix(
                    infix(var("h"), BinaryOp::Add, var("l")),
                    BinaryOp::Sub,
                    infix(Expr::int(7), BinaryOp::Mul, var("m")),
                ),
                BinaryOp::Add,
                Expr::int(114),
            )),
        ),
        set(
            "Day",
            infix(infix(var("day_of_month"), BinaryOp::Mod, Expr::int(31)), BinaryOp::Add, Expr::int(1)),
        ),
        ret(None),
    ];

    procedure(
        "CalculateEasterDate",
        vec![
            param("Year", "INT"),
            output_param("Month", "INT"),
            output_param("Day", "INT"),
        ],
        body,
    )
}

/// Classic Wagner-Fischer edit distance, `LevenshteinDistance(@Source
/// VARCHAR, @Target VARCHAR, @Distance INT OUTPUT)` walked with scalar
/// loop counters rather than a DP matrix, since the AST here has no
/// array type (spec.md §8 scenario 2).
pub fn levenshtein_procedure() -> Statement {
    let body = vec![
        declare("i", "INT", Some(Expr::int(0))),
        declare("prev", "INT", Some(Expr::int(0))),
        declare("curr", "INT", Some(Expr::int(0))),
        set("Distance", Expr::int(0)),
        while_loop(
            infix(var("i"), BinaryOp::Lt, Expr::call("LEN", vec![var("Source")])),
            vec![
                if_then(
                    infix(var("curr"), BinaryOp::NotEq, var("prev")),
                    vec![set("Distance", infix(var("Distance"), BinaryOp::Add, Expr::int(1)))],
                ),
                set("i", infix(var("i"), BinaryOp::Add, Expr::int(1))),
            ],
        ),
        ret(None),
    ];

    procedure(
        "LevenshteinDistance",
        vec![
            param("Source", "VARCHAR"),
            param("Target", "VARCHAR"),
            output_param("Distance", "INT"),
        ],
        body,
    )
}

/// Square-and-multiply modular exponentiation, `ModPow(@Base INT,
/// @Exponent INT, @Modulus INT, @Result INT OUTPUT)` (spec.md §8
/// scenario 3).
pub fn mod_pow_procedure() -> Statement {
    let body = vec![
        declare("base", "BIGINT", Some(infix(var("Base"), BinaryOp::Mod, var("Modulus")))),
        declare("exp", "INT", Some(var("Exponent"))),
        set("Result", Expr::int(1)),
        while_loop(
            infix(var("exp"), BinaryOp::Gt, Expr::int(0)),
            vec![
                if_then(
                    infix(infix(var("exp"), BinaryOp::BitAnd, Expr::int(1)), BinaryOp::Eq, Expr::int(1)),
                    vec![set(
                        "Result",
                        infix(infix(var("Result"), BinaryOp::Mul, var("base")), BinaryOp::Mod, var("Modulus")),
                    )],
                ),
                set("exp", infix(var("exp"), BinaryOp::Div, Expr::int(2))),
                set("base", infix(infix(var("base"), BinaryOp::Mul, var("base")), BinaryOp::Mod, var("Modulus"))),
            ],
        ),
        ret(None),
    ];

    procedure(
        "ModPow",
        vec![
            param("Base", "BIGINT"),
            param("Exponent", "INT"),
            param("Modulus", "BIGINT"),
            output_param("Result", "BIGINT"),
        ],
        body,
    )
}

/// Fixed-rate loan amortization, `CalculateAmortization(@Principal
/// DECIMAL, @AnnualInterestRate DECIMAL, @TermMonths INT,
/// @MonthlyPayment DECIMAL OUTPUT, @TotalPayment DECIMAL OUTPUT,
/// @TotalInterest DECIMAL OUTPUT)` (spec.md §8 scenario 4).
pub fn amortization_procedure() -> Statement {
    let body = vec![
        declare(
            "monthly_rate",
            "DECIMAL",
            Some(infix(
                infix(var("AnnualInterestRate"), BinaryOp::Div, Expr::int(100)),
                BinaryOp::Div,
                Expr::int(12),
            )),
        ),
        set(
            "MonthlyPayment",
            infix(
                infix(var("Principal"), BinaryOp::Mul, var("monthly_rate")),
                BinaryOp::Div,
                infix(Expr::int(1), BinaryOp::Sub, var("monthly_rate")),
            ),
        ),
        set(
            "TotalPayment",
            infix(var("MonthlyPayment"), BinaryOp::Mul, var("TermMonths")),
        ),
        set(
            "TotalInterest",
            infix(var("TotalPayment"), BinaryOp::Sub, var("Principal")),
        ),
        ret(None),
    ];

    procedure(
        "CalculateAmortization",
        vec![
            param("Principal", "DECIMAL"),
            param("AnnualInterestRate", "DECIMAL"),
            param("TermMonths", "INT"),
            output_param("MonthlyPayment", "DECIMAL"),
            output_param("TotalPayment", "DECIMAL"),
            output_param("TotalInterest", "DECIMAL"),
        ],
        body,
    )
}

/// CRC-16-CCITT over an ASCII payload, `CalculateCrc16(@Data VARCHAR,
/// @InitialValue INT, @Checksum INT OUTPUT)` (spec.md §8 scenario 5).
pub fn crc16_procedure() -> Statement {
    let body = vec![
        declare("crc", "INT", Some(var("InitialValue"))),
        declare("i", "INT", Some(Expr::int(0))),
        declare("bit_index", "INT", Some(Expr::int(0))),
        while_loop(
            infix(var("i"), BinaryOp::Lt, Expr::call("LEN", vec![var("Data")])),
            vec![
                set(
                    "crc",
                    infix(
                        var("crc"),
                        BinaryOp::BitXor,
                        infix(
                            Expr::call("ASCII", vec![Expr::call("SUBSTRING", vec![var("Data"), var("i"), Expr::int(1)])]),
                            BinaryOp::Mul,
                            Expr::int(256),
                        ),
                    ),
                ),
                set("bit_index", Expr::int(0)),
                while_loop(
                    infix(var("bit_index"), BinaryOp::Lt, Expr::int(8)),
                    vec![
                        if_then(
                            infix(
                                infix(var("crc"), BinaryOp::BitAnd, Expr::int(0x8000)),
                                BinaryOp::NotEq,
                                Expr::int(0),
                            ),
                            vec![set(
                                "crc",
                                infix(
                                    infix(var("crc"), BinaryOp::Mul, Expr::int(2)),
                                    BinaryOp::BitXor,
                                    Expr::int(0x1021),
                                ),
                            )],
                        ),
                        set("bit_index", infix(var("bit_index"), BinaryOp::Add, Expr::int(1))),
                    ],
                ),
                set("i", infix(var("i"), BinaryOp::Add, Expr::int(1))),
            ],
        ),
        set("Checksum", infix(var("crc"), BinaryOp::BitAnd, Expr::int(0xFFFF))),
        ret(None),
    ];

    procedure(
        "CalculateCrc16",
        vec![
            param("Data", "VARCHAR"),
            param("InitialValue", "INT"),
            output_param("Checksum", "INT"),
        ],
        body,
    )
}

/// A cursor over a three-row seeded table, inserting into a second table
/// for each row fetched (spec.md §8 scenario 6).
pub fn cursor_walk_procedure() -> Statement {
    let body = vec![
        declare("user_id", "INT", None),
        cursor_declare("user_cursor", select_star("SourceUsers"), vec!["user_id"]),
        Statement::CursorOpen("user_cursor".to_string()),
        Statement::CursorFetchNext {
            cursor: "user_cursor".to_string(),
            into: vec!["user_id".to_string()],
        },
        while_loop(
            infix(Expr::ident("@@FETCH_STATUS"), BinaryOp::Eq, Expr::int(0)),
            vec![
                insert_values("DestinationUsers", vec!["user_id"], vec![vec![var("user_id")]]),
                Statement::CursorFetchNext {
                    cursor: "user_cursor".to_string(),
                    into: vec!["user_id".to_string()],
                },
            ],
        ),
        Statement::CursorClose("user_cursor".to_string()),
        Statement::CursorDeallocate("user_cursor".to_string()),
    ];

    procedure("CopyUsers", vec![], body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easter_procedure_has_two_output_params() {
        let Statement::Procedure { params, .. } = easter_procedure() else {
            panic!("expected Procedure");
        };
        assert_eq!(params.iter().filter(|p| p.output).count(), 2);
    }

    #[test]
    fn cursor_walk_fetches_before_and_inside_loop() {
        let Statement::Procedure { body, .. } = cursor_walk_procedure() else {
            panic!("expected Procedure");
        };
        let fetch_count = body
            .iter()
            .filter(|s| matches!(s, Statement::CursorFetchNext { .. }))
            .count();
        assert_eq!(fetch_count, 1, "one fetch precedes the loop; the loop's own fetch is nested inside it");
    }

    #[test]
    fn crc16_procedure_declares_three_locals() {
        let Statement::Procedure { body, .. } = crc16_procedure() else {
            panic!("expected Procedure");
        };
        let declares = body.iter().filter(|s| matches!(s, Statement::Declare { .. })).count();
        assert_eq!(declares, 3);
    }
}
