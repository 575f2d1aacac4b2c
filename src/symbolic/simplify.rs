//! Structural simplification of expression trees.
//!
//! Bottom-up rewriting with a fixed rule set: flatten nested sums and
//! products, fold constants, drop neutral elements, collect like terms by
//! coefficient and like factors by exponent, and reduce trivial powers.
//! Sine and cosine of symbol-free arguments fold to numbers, with results
//! snapped to the nearest integer when within rounding distance so that
//! boundary values like `cos(π/2)` come out exact.
//!
//! The pass is deterministic and preserves first-seen operand order; it makes
//! no attempt at trigonometric identities or factoring.

use super::expr::Expr;

/// Tolerance for snapping constant-folded trig values to integers.
const TRIG_SNAP_EPSILON: f64 = 1e-12;

/// Simplify an expression.
#[must_use]
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Add(terms) => simplify_add(terms),
        Expr::Mul(factors) => simplify_mul(factors),
        Expr::Pow(base, exponent) => simplify_pow(&simplify(base), &simplify(exponent)),
        Expr::Sin(arg) => {
            let arg = simplify(arg);
            match arg.const_value() {
                Some(value) => Expr::Number(snap_near_integer(value.sin())),
                None => Expr::Sin(Box::new(arg)),
            }
        }
        Expr::Cos(arg) => {
            let arg = simplify(arg);
            match arg.const_value() {
                Some(value) => Expr::Number(snap_near_integer(value.cos())),
                None => Expr::Cos(Box::new(arg)),
            }
        }
        Expr::Integral {
            integrand,
            var,
            lower,
            upper,
        } => Expr::Integral {
            integrand: Box::new(simplify(integrand)),
            var: var.clone(),
            lower: Box::new(simplify(lower)),
            upper: Box::new(simplify(upper)),
        },
    }
}

fn snap_near_integer(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < TRIG_SNAP_EPSILON {
        rounded
    } else {
        value
    }
}

/// Split a simplified term into `(coefficient, core)`.
fn split_coefficient(term: &Expr) -> (f64, Expr) {
    if let Expr::Mul(factors) = term {
        if let Some(Expr::Number(coefficient)) = factors.first() {
            let rest: Vec<Expr> = factors[1..].to_vec();
            let core = match rest.len() {
                0 => Expr::Number(1.0),
                1 => rest.into_iter().next().unwrap_or(Expr::Number(1.0)),
                _ => Expr::Mul(rest),
            };
            return (*coefficient, core);
        }
    }
    (1.0, term.clone())
}

/// Rebuild `coefficient * core`, splicing into an existing product.
fn with_coefficient(coefficient: f64, core: Expr) -> Expr {
    if coefficient == 1.0 {
        return core;
    }
    match core {
        Expr::Number(value) => Expr::Number(coefficient * value),
        Expr::Mul(factors) => {
            let mut combined = Vec::with_capacity(factors.len() + 1);
            combined.push(Expr::Number(coefficient));
            combined.extend(factors);
            Expr::Mul(combined)
        }
        other => Expr::Mul(vec![Expr::Number(coefficient), other]),
    }
}

fn simplify_add(terms: &[Expr]) -> Expr {
    // Simplify children and flatten nested sums.
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        match simplify(term) {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = 0.0;
    let mut collected: Vec<(Expr, f64)> = Vec::new();
    for term in flat {
        if let Expr::Number(value) = term {
            constant += value;
            continue;
        }
        let (coefficient, core) = split_coefficient(&term);
        match collected.iter_mut().find(|(existing, _)| *existing == core) {
            Some((_, total)) => *total += coefficient,
            None => collected.push((core, coefficient)),
        }
    }

    let mut rebuilt: Vec<Expr> = collected
        .into_iter()
        .filter(|(_, coefficient)| *coefficient != 0.0)
        .map(|(core, coefficient)| with_coefficient(coefficient, core))
        .collect();
    if constant != 0.0 || rebuilt.is_empty() {
        rebuilt.push(Expr::Number(constant));
    }

    if rebuilt.len() == 1 {
        rebuilt.into_iter().next().unwrap_or(Expr::Number(0.0))
    } else {
        Expr::Add(rebuilt)
    }
}

fn simplify_mul(factors: &[Expr]) -> Expr {
    // Simplify children and flatten nested products.
    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        match simplify(factor) {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut coefficient = 1.0;
    let mut collected: Vec<(Expr, f64)> = Vec::new();
    for factor in flat {
        if let Expr::Number(value) = factor {
            coefficient *= value;
            continue;
        }
        let (base, exponent) = match factor {
            Expr::Pow(base, exponent) => match *exponent {
                Expr::Number(n) => (*base, n),
                other => (Expr::Pow(base, Box::new(other)), 1.0),
            },
            other => (other, 1.0),
        };
        match collected.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, total)) => *total += exponent,
            None => collected.push((base, exponent)),
        }
    }

    if coefficient == 0.0 {
        return Expr::Number(0.0);
    }

    let mut rebuilt: Vec<Expr> = Vec::with_capacity(collected.len() + 1);
    if coefficient != 1.0 {
        rebuilt.push(Expr::Number(coefficient));
    }
    for (base, exponent) in collected {
        if exponent == 0.0 {
            continue;
        }
        if exponent == 1.0 {
            rebuilt.push(base);
        } else {
            rebuilt.push(Expr::Pow(Box::new(base), Box::new(Expr::Number(exponent))));
        }
    }

    match rebuilt.len() {
        0 => Expr::Number(1.0),
        1 => rebuilt.into_iter().next().unwrap_or(Expr::Number(1.0)),
        _ => Expr::Mul(rebuilt),
    }
}

fn simplify_pow(base: &Expr, exponent: &Expr) -> Expr {
    if let (Expr::Number(b), Expr::Number(e)) = (base, exponent) {
        return Expr::Number(b.powf(*e));
    }
    if let Expr::Number(e) = exponent {
        if *e == 0.0 {
            return Expr::Number(1.0);
        }
        if *e == 1.0 {
            return base.clone();
        }
    }
    if let Expr::Number(b) = base {
        if *b == 1.0 {
            return Expr::Number(1.0);
        }
    }
    // (x^a)^b with numeric exponents collapses to x^(a*b).
    if let Expr::Pow(inner_base, inner_exponent) = base {
        if let (Expr::Number(inner), Expr::Number(outer)) = (inner_exponent.as_ref(), exponent) {
            return simplify_pow(inner_base, &Expr::Number(inner * outer));
        }
    }
    Expr::Pow(Box::new(base.clone()), Box::new(exponent.clone()))
}
