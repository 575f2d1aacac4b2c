//! Differential tests: the expression tree's evaluator and printer against
//! the meval expression engine. Expressions are rendered to text, parsed back
//! by meval, and evaluated at a grid of sample points; both engines must
//! agree.

use meval::Context;
use probe_math::symbolic::{Bindings, Expr, simplify};

fn assert_engines_agree(expr: &Expr, samples: &[(f64, f64)]) {
    let rendered = expr.to_string();
    let parsed: meval::Expr = rendered
        .parse()
        .unwrap_or_else(|error| panic!("meval rejected `{rendered}`: {error}"));

    for &(x, a) in samples {
        let mut context = Context::new();
        context.var("x", x);
        context.var("a", a);
        let expected = parsed
            .eval_with_context(&context)
            .unwrap_or_else(|error| panic!("meval failed on `{rendered}`: {error}"));

        let bindings = Bindings::new().bind("x", x).bind("a", a);
        let actual = expr.eval(&bindings).unwrap();
        assert!(
            (expected - actual).abs() < 1e-9,
            "`{rendered}` at x={x}, a={a}: meval {expected}, eval {actual}"
        );
    }
}

fn x() -> Expr {
    Expr::symbol("x")
}

fn a() -> Expr {
    Expr::symbol("a")
}

const SAMPLES: [(f64, f64); 4] = [(0.0, 1.0), (0.7, 2.0), (-1.3, 0.5), (2.9, 3.0)];

#[test]
fn polynomial_expressions_agree() {
    let expr = x().powi(3) + Expr::number(2.0) * x().powi(2) - x() + Expr::number(4.0);
    assert_engines_agree(&expr, &SAMPLES);
}

#[test]
fn trigonometric_expressions_agree() {
    let expr = x().sin() * a().cos() + (x() * a()).cos();
    assert_engines_agree(&expr, &SAMPLES);
}

#[test]
fn rational_expressions_agree() {
    // Denominator stays positive over the sample grid.
    let expr = (x() + a().powi(2)) / (Expr::number(2.0) + x().sin().powi(2));
    assert_engines_agree(&expr, &SAMPLES);
}

#[test]
fn lobe_like_expression_agrees() {
    let k = (a().powi(2) - Expr::number(1.0)) / (Expr::number(2.0) + Expr::number(2.0) * x().sin());
    let expr = x().cos() / (Expr::number(1.0) + k * x().cos().powi(2)).powi(2);
    assert_engines_agree(&expr, &SAMPLES);
}

#[test]
fn simplification_preserves_rendered_meaning() {
    let expr = (x() + x()) * (a() + Expr::number(0.0)) + x().powi(2) * Expr::number(1.0)
        - (x() * a() + x() * a());
    let simplified = simplify(&expr);
    // Both renderings must evaluate identically under meval.
    assert_engines_agree(&expr, &SAMPLES);
    assert_engines_agree(&simplified, &SAMPLES);

    for &(x_value, a_value) in &SAMPLES {
        let bindings = Bindings::new().bind("x", x_value).bind("a", a_value);
        let before = expr.eval(&bindings).unwrap();
        let after = simplified.eval(&bindings).unwrap();
        assert!((before - after).abs() < 1e-9);
    }
}
