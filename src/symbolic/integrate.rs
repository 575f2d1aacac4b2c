//! Definite integration: a closed-form rule table with quadrature fallback.
//!
//! The rule table covers linearity, constant factors, `sin`, `cos` and powers
//! of the integration variable. Everything else yields an unevaluated
//! [`Expr::Integral`] node — for the reflectance integrand with symbolic
//! parameters that is the expected outcome, not a failure.

use super::SymbolicError;
use super::expr::{Bindings, Expr};
use super::simplify::simplify;

/// Quadrature resolution used when evaluating integral nodes numerically.
pub const DEFAULT_QUADRATURE_SAMPLES: usize = 512;

/// Outcome of a symbolic definite integration.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegralResult {
    /// An antiderivative was found; the value is `F(upper) - F(lower)`,
    /// simplified.
    Closed(Expr),
    /// No antiderivative in the rule table; the expression is an
    /// [`Expr::Integral`] node that can still be evaluated numerically.
    Unevaluated(Expr),
}

impl IntegralResult {
    #[must_use]
    pub fn as_expr(&self) -> &Expr {
        match self {
            Self::Closed(expr) | Self::Unevaluated(expr) => expr,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

/// Integrate `integrand` with respect to `var` over `[lower, upper]`,
/// holding all other symbols fixed.
#[must_use]
pub fn definite_integral(integrand: &Expr, var: &str, lower: &Expr, upper: &Expr) -> IntegralResult {
    let integrand = simplify(integrand);
    if let Some(anti) = antiderivative(&integrand, var) {
        let at_upper = anti.substitute(var, upper);
        let at_lower = anti.substitute(var, lower);
        IntegralResult::Closed(simplify(&(at_upper - at_lower)))
    } else {
        log::debug!("no closed-form antiderivative in {var}; leaving the integral unevaluated");
        IntegralResult::Unevaluated(Expr::Integral {
            integrand: Box::new(integrand),
            var: var.to_owned(),
            lower: Box::new(lower.clone()),
            upper: Box::new(upper.clone()),
        })
    }
}

/// Antiderivative of `expr` in `var`, if the rule table has one.
fn antiderivative(expr: &Expr, var: &str) -> Option<Expr> {
    // Expressions free of the variable integrate to a linear ramp.
    if !expr.contains(var) {
        return Some(expr.clone() * Expr::symbol(var));
    }
    match expr {
        Expr::Symbol(name) if name == var => {
            Some(Expr::number(0.5) * Expr::symbol(var).powi(2))
        }
        Expr::Add(terms) => {
            let parts: Option<Vec<Expr>> =
                terms.iter().map(|term| antiderivative(term, var)).collect();
            Some(Expr::Add(parts?))
        }
        Expr::Mul(factors) => {
            // Split off factors free of the variable; a single varying factor
            // keeps the product integrable.
            let (constant, varying): (Vec<&Expr>, Vec<&Expr>) =
                factors.iter().partition(|factor| !factor.contains(var));
            if varying.len() != 1 {
                return None;
            }
            let anti = antiderivative(varying[0], var)?;
            let mut rebuilt: Vec<Expr> = constant.into_iter().cloned().collect();
            rebuilt.push(anti);
            Some(Expr::Mul(rebuilt))
        }
        Expr::Pow(base, exponent) => {
            let Expr::Symbol(name) = base.as_ref() else {
                return None;
            };
            let Expr::Number(n) = exponent.as_ref() else {
                return None;
            };
            if name != var || *n == -1.0 {
                return None;
            }
            Some(Expr::number(1.0 / (n + 1.0)) * Expr::symbol(var).pow(Expr::number(n + 1.0)))
        }
        Expr::Sin(arg) => match arg.as_ref() {
            Expr::Symbol(name) if name == var => Some(-Expr::symbol(var).cos()),
            _ => None,
        },
        Expr::Cos(arg) => match arg.as_ref() {
            Expr::Symbol(name) if name == var => Some(Expr::symbol(var).sin()),
            _ => None,
        },
        _ => None,
    }
}

/// Evaluate a definite integral numerically with composite Simpson quadrature
/// on a uniform grid.
///
/// # Errors
/// [`SymbolicError::InvalidQuadrature`] for non-finite bounds or a zero
/// sample count; evaluation errors from the integrand propagate.
pub fn integrate_numeric(
    integrand: &Expr,
    var: &str,
    lower: f64,
    upper: f64,
    bindings: &Bindings,
    samples: usize,
) -> Result<f64, SymbolicError> {
    if samples == 0 {
        return Err(SymbolicError::InvalidQuadrature {
            reason: "sample count must be nonzero".to_owned(),
        });
    }
    if !lower.is_finite() || !upper.is_finite() {
        return Err(SymbolicError::InvalidQuadrature {
            reason: "integration bounds must be finite".to_owned(),
        });
    }

    // Simpson needs an even interval count.
    let intervals = if samples % 2 == 0 { samples } else { samples + 1 };
    let step = (upper - lower) / intervals as f64;

    let mut local = bindings.clone();
    let mut value_at = |t: f64| -> Result<f64, SymbolicError> {
        local.set(var, t);
        integrand.eval(&local)
    };

    let mut sum = value_at(lower)? + value_at(upper)?;
    for i in 1..intervals {
        let t = lower + step * i as f64;
        let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
        sum += weight * value_at(t)?;
    }
    Ok(sum * step / 3.0)
}
