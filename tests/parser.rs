// tests/parser.rs
use lsys_turtle::ast::{BinaryOp, ColorExpr, Decl, Expr, Symbol, TransformDecl, TransformKind, Unit};
use lsys_turtle::parse;

fn num(v: f64) -> Expr {
    Expr::Num(v)
}

fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

/// Parses `var v = <expr>;` and returns the expression.
fn expr(source: &str) -> Expr {
    let root = parse(&format!("var v = {};", source)).unwrap();
    match root.body.into_iter().next() {
        Some(Decl::Var { value, .. }) => value,
        other => panic!("expected var declaration, got {:?}", other),
    }
}

fn single_transform(source: &str) -> TransformDecl {
    let root = parse(source).unwrap();
    match root.body.into_iter().next() {
        Some(Decl::Transform(t)) => t,
        other => panic!("expected transform declaration, got {:?}", other),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(
        expr("1 + 2 * 3"),
        bin(BinaryOp::Add, num(1.0), bin(BinaryOp::Mul, num(2.0), num(3.0)))
    );
    assert_eq!(
        expr("2 * 3 + 4"),
        bin(BinaryOp::Add, bin(BinaryOp::Mul, num(2.0), num(3.0)), num(4.0))
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(
        expr("8 - 4 - 2"),
        bin(BinaryOp::Sub, bin(BinaryOp::Sub, num(8.0), num(4.0)), num(2.0))
    );
    assert_eq!(
        expr("8 / 4 / 2"),
        bin(BinaryOp::Div, bin(BinaryOp::Div, num(8.0), num(4.0)), num(2.0))
    );
}

#[test]
fn test_mixed_chain() {
    // ((1 * 2) + (3 * 4)) - 5
    assert_eq!(
        expr("1 * 2 + 3 * 4 - 5"),
        bin(
            BinaryOp::Sub,
            bin(
                BinaryOp::Add,
                bin(BinaryOp::Mul, num(1.0), num(2.0)),
                bin(BinaryOp::Mul, num(3.0), num(4.0)),
            ),
            num(5.0),
        )
    );
}

#[test]
fn test_negation_binds_tighter_than_binary_ops() {
    assert_eq!(
        expr("-a * b"),
        bin(
            BinaryOp::Mul,
            Expr::Neg(Box::new(Expr::ident("a"))),
            Expr::ident("b")
        )
    );
    assert_eq!(
        expr("2 - -3"),
        bin(BinaryOp::Sub, num(2.0), Expr::Neg(Box::new(num(3.0))))
    );
}

#[test]
fn test_groups_and_calls() {
    assert_eq!(
        expr("(1 + 2) * max(a, 3)"),
        bin(
            BinaryOp::Mul,
            Expr::Group(Box::new(bin(BinaryOp::Add, num(1.0), num(2.0)))),
            Expr::Call {
                name: "max".into(),
                args: vec![Expr::ident("a"), num(3.0)],
            },
        )
    );
    assert_eq!(
        expr("random()"),
        Expr::Call {
            name: "random".into(),
            args: vec![],
        }
    );
}

#[test]
fn test_rule_declaration() {
    let root = parse("rule A = A [ + B ] - B bias 2; rule B = A;").unwrap();
    assert_eq!(
        root.body,
        vec![
            Decl::Rule {
                name: "A".into(),
                body: vec![
                    Symbol::ident("A"),
                    Symbol::Push,
                    Symbol::ident("+"),
                    Symbol::ident("B"),
                    Symbol::Pop,
                    Symbol::ident("-"),
                    Symbol::ident("B"),
                ],
                bias: Some(num(2.0)),
            },
            Decl::Rule {
                name: "B".into(),
                body: vec![Symbol::ident("A")],
                bias: None,
            },
        ]
    );
}

#[test]
fn test_rule_without_body() {
    let root = parse("rule A;").unwrap();
    assert_eq!(
        root.body,
        vec![Decl::Rule {
            name: "A".into(),
            body: vec![],
            bias: None
        }]
    );
}

#[test]
fn test_empty_rule_string_is_syntax_error() {
    let err = parse("rule A = ;").unwrap_err();
    assert!(err.message.contains("Empty rule string"), "{}", err);
}

#[test]
fn test_global_declarations() {
    let root = parse("axiom F; length 2; width 0.5; color 128; iterate 4;").unwrap();
    assert_eq!(
        root.body,
        vec![
            Decl::Axiom(vec![Symbol::ident("F")]),
            Decl::Length(num(2.0)),
            Decl::Width(num(0.5)),
            Decl::Color(ColorExpr::gray(num(128.0))),
            Decl::Iterate(num(4.0)),
        ]
    );
}

#[test]
fn test_rotate_transforms() {
    let t = single_transform("transform + rotate 25;");
    assert_eq!(t.name, "+");
    assert_eq!(
        t.kind,
        TransformKind::Rotate {
            angle: num(25.0),
            unit: Unit::Deg
        }
    );

    let t = single_transform("transform turn rotate pi / 4 rad;");
    assert_eq!(
        t.kind,
        TransformKind::Rotate {
            angle: bin(BinaryOp::Div, Expr::ident("pi"), num(4.0)),
            unit: Unit::Rad
        }
    );

    let t = single_transform("transform - rotate 10 deg;");
    assert_eq!(t.name, "-");
}

#[test]
fn test_translate_transforms() {
    // One argument: forward translation.
    let t = single_transform("transform F translate 10 width 2 color 50;");
    assert_eq!(
        t.kind,
        TransformKind::ForwardTranslate {
            distance: num(10.0),
            width: Some(num(2.0)),
            color: Some(ColorExpr::gray(num(50.0))),
        }
    );

    // Two arguments: absolute translation.
    let t = single_transform("transform M translate 1, 2 color 255, 0, 10;");
    assert_eq!(
        t.kind,
        TransformKind::AbsoluteTranslate {
            dx: num(1.0),
            dy: num(2.0),
            width: None,
            color: Some(ColorExpr {
                r: num(255.0),
                g: num(0.0),
                b: num(10.0)
            }),
        }
    );
}

#[test]
fn test_missing_semicolon_reports_end_of_input() {
    let err = parse("axiom A").unwrap_err();
    assert!(err.message.contains("end of input"), "{}", err);
    assert!(err.message.contains("';'"), "{}", err);
    assert_eq!((err.line, err.column), (1, 8));
}

#[test]
fn test_error_points_at_start_of_unexpected_token() {
    let err = parse("axiom F;\nlength 1 rotate;").unwrap_err();
    assert_eq!((err.line, err.column), (2, 10));
    assert_eq!(err.excerpt, "length 1 rotate;\n         ^");
    assert!(err.message.contains("'rotate'"), "{}", err);
}

#[test]
fn test_unknown_declaration() {
    let err = parse("F;").unwrap_err();
    assert_eq!((err.line, err.column), (1, 1));
    assert!(err.message.contains("declaration"), "{}", err);
}

#[test]
fn test_transform_requires_kind() {
    let err = parse("transform F 10;").unwrap_err();
    assert!(err.message.contains("transform type"), "{}", err);
}

#[test]
fn test_unbalanced_parenthesis() {
    let err = parse("length (1 + 2;").unwrap_err();
    assert!(err.message.contains("')'"), "{}", err);
}

#[test]
fn test_nesting_limit() {
    let deep = format!("length {}1{};", "(".repeat(400), ")".repeat(400));
    let err = parse(&deep).unwrap_err();
    assert!(err.message.contains("nested"), "{}", err);

    let shallow = format!("length {}1{};", "(".repeat(50), ")".repeat(50));
    assert!(parse(&shallow).is_ok());
}

#[test]
fn test_operator_chain_limit() {
    // Every operator of a left-associative chain adds a tree level.
    let chain = |terms: usize| format!("length {};", vec!["1"; terms].join(" + "));

    assert!(parse(&chain(200)).is_ok());

    let err = parse(&chain(600)).unwrap_err();
    assert!(err.message.contains("nested deeper than 256"), "{}", err);

    // A huge chain fails early instead of building (and later dropping) a deep tree.
    let err = parse(&chain(300_000)).unwrap_err();
    assert!(err.message.contains("nested"), "{}", err);
    assert_eq!(err.line, 1);

    // Mixed precedence counts the height of the resulting tree.
    let mixed = format!("length {};", vec!["2 * 3"; 150].join(" + "));
    assert!(parse(&mixed).is_ok());
}

#[test]
fn test_number_literal_must_be_finite() {
    let huge = format!("length {};", "9".repeat(400));
    let err = parse(&huge).unwrap_err();
    assert!(err.message.starts_with("Invalid number"), "{}", err);
    assert_eq!(err.column, 8);
}

#[test]
fn test_round_trip() {
    let source = "
        # a plant
        var angle = 25 + random(-5, 5);
        var shrink = -(1 - 0.5) * 2 / 4 - 1;
        axiom X;
        length 2; width 0.5; color 10, 120, 30; iterate 5;
        rule X = F [ + X ] F [ - X ] + X bias 3;
        rule X = F [ - X ] F bias depth / iterations;
        rule F = F F;
        rule Y;
        transform + rotate angle;
        transform - rotate -angle rad;
        transform F translate size * 1.5 width max(0.1, 1 - depth) color 40;
        transform G translate 1, -2;
    ";
    let root = parse(source).unwrap();
    let printed = root.to_string();
    let reparsed = parse(&printed).unwrap();
    assert_eq!(root, reparsed, "printed source:\n{}", printed);
}
