// tests/specification.rs
use lsys_turtle::ast::{Expr, Symbol, Unit};
use lsys_turtle::{
    Error, EvalContext, EvalError, SpecError, Specification, TransformOp, compile, evaluate, parse,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn build(source: &str) -> Result<Specification, SpecError> {
    Specification::build(&parse(source).unwrap())
}

#[test]
fn test_duplicate_axiom() {
    let err = build("axiom A; axiom B;").unwrap_err();
    assert_eq!(err, SpecError::DuplicateDeclaration("Axiom"));
    assert_eq!(err.to_string(), "Axiom declared more than once");
}

#[test]
fn test_duplicate_globals() {
    for (source, what) in [
        ("axiom A; length 1; length 2;", "Length"),
        ("axiom A; width 1; width 2;", "Width"),
        ("axiom A; color 1; color 2;", "Color"),
        ("axiom A; iterate 1; iterate 2;", "Iterate"),
    ] {
        assert_eq!(
            build(source).unwrap_err(),
            SpecError::DuplicateDeclaration(what),
            "{}",
            source
        );
    }
}

#[test]
fn test_duplicate_variable() {
    let err = build("axiom A; var a = 1; var b = 2; var a = 3;").unwrap_err();
    assert_eq!(err, SpecError::DuplicateVariable("a".into()));
}

#[test]
fn test_empty_rule_and_missing_axiom() {
    assert_eq!(
        build("axiom A; rule A;").unwrap_err(),
        SpecError::EmptyRule("A".into())
    );
    assert_eq!(build("iterate 2;").unwrap_err(), SpecError::MissingAxiom);
}

#[test]
fn test_compile_wraps_stage_errors() {
    assert!(matches!(compile("axiom A"), Err(Error::Syntax(_))));
    assert!(matches!(
        compile("axiom A; axiom B;"),
        Err(Error::Spec(SpecError::DuplicateDeclaration("Axiom")))
    ));
}

#[test]
fn test_defaults() {
    let spec = build("axiom F;").unwrap();
    assert_eq!(spec.axiom(), &[Symbol::ident("F")]);
    assert_eq!(spec.length(), &Expr::Num(1.0));
    assert_eq!(spec.width(), &Expr::Num(1.0));
    assert_eq!(spec.iterate(), &Expr::Num(1.0));

    match &spec.transform("+").unwrap().op {
        TransformOp::Rotate { angle, unit } => {
            assert_eq!(angle, &Expr::Num(90.0));
            assert_eq!(*unit, Unit::Deg);
        }
        other => panic!("unexpected default for '+': {:?}", other),
    }
    match &spec.transform("-").unwrap().op {
        TransformOp::Rotate { angle, .. } => assert_eq!(angle, &Expr::Num(-90.0)),
        other => panic!("unexpected default for '-': {:?}", other),
    }
    assert!(spec.transform("F").is_none());
}

#[test]
fn test_transform_redeclaration_overrides() {
    let spec = build(
        "axiom F;
         transform + rotate 30;
         transform F translate 1;
         transform F translate 2, 3 width 4;",
    )
    .unwrap();

    match &spec.transform("+").unwrap().op {
        TransformOp::Rotate { angle, .. } => assert_eq!(angle, &Expr::Num(30.0)),
        other => panic!("unexpected '+': {:?}", other),
    }
    match &spec.transform("F").unwrap().op {
        TransformOp::Absolute { dx, dy, width, .. } => {
            assert_eq!(dx, &Expr::Num(2.0));
            assert_eq!(dy, &Expr::Num(3.0));
            assert_eq!(width, &Expr::Num(4.0));
        }
        other => panic!("unexpected 'F': {:?}", other),
    }
}

#[test]
fn test_transform_overrides_default_to_unit_width_and_black() {
    let spec = build("axiom F; width 7; color 200; transform F translate 1;").unwrap();
    match &spec.transform("F").unwrap().op {
        TransformOp::Forward { width, color, .. } => {
            assert_eq!(width, &Expr::Num(1.0));
            assert_eq!(color.r, Expr::Num(0.0));
        }
        other => panic!("unexpected 'F': {:?}", other),
    }
}

#[test]
fn test_instances_do_not_share_state() {
    let a = build("axiom A; rule A = B; var x = 1;").unwrap();
    let b = build("axiom C;").unwrap();
    assert_eq!(a.rules().len(), 1);
    assert_eq!(a.variables().len(), 1);
    assert!(b.rules().is_empty());
    assert!(b.variables().is_empty());
}

#[test]
fn test_create_context_binds_variables() {
    let spec = build("axiom A; var a = 2; var b = a * pi;").unwrap();
    let mut ctx = spec.create_context(StdRng::seed_from_u64(0));
    let value = evaluate(&Expr::ident("b"), &mut ctx).unwrap();
    assert_eq!(value, 2.0 * std::f64::consts::PI);
}

#[test]
fn test_select_rule_without_candidates() {
    let spec = build("axiom A; rule A = B;").unwrap();
    let mut ctx = EvalContext::seeded(0);
    assert!(spec.select_rule("Z", &mut ctx).unwrap().is_none());
}

#[test]
fn test_single_candidate_skips_bias() {
    // The bias refers to an unknown variable but is never evaluated.
    let spec = build("axiom A; rule A = B bias undefined;").unwrap();
    let mut ctx = EvalContext::seeded(0);
    let rule = spec.select_rule("A", &mut ctx).unwrap().unwrap();
    assert_eq!(rule.body, vec![Symbol::ident("B")]);
}

#[test]
fn test_weighted_selection_frequencies() {
    let spec = build("axiom A; rule A = B bias 1; rule A = C bias 3; rule A = D bias 0;").unwrap();
    let mut ctx = EvalContext::seeded(1234);

    let draws = 20_000;
    let mut counts = [0usize; 3];
    for _ in 0..draws {
        let rule = spec.select_rule("A", &mut ctx).unwrap().unwrap();
        match rule.body[0].name() {
            Some("B") => counts[0] += 1,
            Some("C") => counts[1] += 1,
            Some("D") => counts[2] += 1,
            other => panic!("unexpected rule body {:?}", other),
        }
    }

    let freq_b = counts[0] as f64 / draws as f64;
    let freq_c = counts[1] as f64 / draws as f64;
    assert!((freq_b - 0.25).abs() < 0.02, "B chosen {:.3}", freq_b);
    assert!((freq_c - 0.75).abs() < 0.02, "C chosen {:.3}", freq_c);
    assert_eq!(counts[2], 0, "zero-bias rule must never be chosen");
}

#[test]
fn test_bias_depends_on_context() {
    let spec = build("axiom A; var w = 0; rule A = B bias w; rule A = C bias 1;").unwrap();
    let mut ctx = spec.create_context(StdRng::seed_from_u64(5));
    for _ in 0..100 {
        let rule = spec.select_rule("A", &mut ctx).unwrap().unwrap();
        assert_eq!(rule.body, vec![Symbol::ident("C")]);
    }

    // The bias is re-evaluated at every selection.
    ctx.set("w", 1e9);
    let rule = spec.select_rule("A", &mut ctx).unwrap().unwrap();
    assert_eq!(rule.body, vec![Symbol::ident("B")]);
}

#[test]
fn test_invalid_biases() {
    let spec = build("axiom A; rule A = B bias -1; rule A = C;").unwrap();
    let mut ctx = EvalContext::seeded(0);
    assert!(matches!(
        spec.select_rule("A", &mut ctx),
        Err(EvalError::InvalidBias { .. })
    ));

    let spec = build("axiom A; rule A = B bias 0; rule A = C bias 0;").unwrap();
    assert!(matches!(
        spec.select_rule("A", &mut ctx),
        Err(EvalError::InvalidBias { .. })
    ));

    let spec = build("axiom A; rule A = B bias nope; rule A = C;").unwrap();
    assert_eq!(
        spec.select_rule("A", &mut ctx).unwrap_err(),
        EvalError::UnknownVariable("nope".into())
    );
}
