//! Expression tree for the derivation tools.
//!
//! Just enough of a term language for the reflectance derivations: numbers, π,
//! named symbols, n-ary sums and products, powers, sine and cosine, and an
//! unevaluated definite integral node. Sums and products are n-ary so that
//! simplification can flatten and fold across all operands at once.
//!
//! `a - b` is represented as `a + (-1)·b` and `a / b` as `a · b⁻¹`; the
//! pretty-printer folds both back into infix notation.

use std::collections::BTreeMap;

use super::SymbolicError;

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Const {
    Pi,
}

impl Const {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
        }
    }
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Constant(Const),
    Symbol(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    /// A definite integral that has not been evaluated symbolically.
    Integral {
        integrand: Box<Expr>,
        var: String,
        lower: Box<Expr>,
        upper: Box<Expr>,
    },
}

/// Variable bindings for numeric evaluation.
#[derive(Debug, Clone, Default)]
pub struct Bindings(BTreeMap<String, f64>);

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol to a value, replacing any previous binding.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
}

impl Expr {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    #[must_use]
    pub fn pi() -> Self {
        Self::Constant(Const::Pi)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        Self::Sin(Box::new(self))
    }

    #[must_use]
    pub fn cos(self) -> Self {
        Self::Cos(Box::new(self))
    }

    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        Self::Pow(Box::new(self), Box::new(exponent))
    }

    #[must_use]
    pub fn powi(self, exponent: i32) -> Self {
        self.pow(Self::Number(f64::from(exponent)))
    }

    /// Whether `symbol` occurs free anywhere in the expression.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        match self {
            Self::Number(_) | Self::Constant(_) => false,
            Self::Symbol(name) => name == symbol,
            Self::Add(terms) | Self::Mul(terms) => terms.iter().any(|t| t.contains(symbol)),
            Self::Pow(base, exponent) => base.contains(symbol) || exponent.contains(symbol),
            Self::Sin(arg) | Self::Cos(arg) => arg.contains(symbol),
            Self::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                // The integration variable is bound inside the integrand.
                (var != symbol && integrand.contains(symbol))
                    || lower.contains(symbol)
                    || upper.contains(symbol)
            }
        }
    }

    /// Whether the expression is free of symbols (and of unevaluated
    /// integrals, whose value may still depend on sampling).
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Number(_) | Self::Constant(_) => true,
            Self::Symbol(_) | Self::Integral { .. } => false,
            Self::Add(terms) | Self::Mul(terms) => terms.iter().all(Expr::is_constant),
            Self::Pow(base, exponent) => base.is_constant() && exponent.is_constant(),
            Self::Sin(arg) | Self::Cos(arg) => arg.is_constant(),
        }
    }

    /// Replace every free occurrence of `symbol` with `replacement`.
    #[must_use]
    pub fn substitute(&self, symbol: &str, replacement: &Expr) -> Self {
        match self {
            Self::Number(_) | Self::Constant(_) => self.clone(),
            Self::Symbol(name) => {
                if name == symbol {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            Self::Add(terms) => Self::Add(
                terms
                    .iter()
                    .map(|t| t.substitute(symbol, replacement))
                    .collect(),
            ),
            Self::Mul(factors) => Self::Mul(
                factors
                    .iter()
                    .map(|f| f.substitute(symbol, replacement))
                    .collect(),
            ),
            Self::Pow(base, exponent) => Self::Pow(
                Box::new(base.substitute(symbol, replacement)),
                Box::new(exponent.substitute(symbol, replacement)),
            ),
            Self::Sin(arg) => Self::Sin(Box::new(arg.substitute(symbol, replacement))),
            Self::Cos(arg) => Self::Cos(Box::new(arg.substitute(symbol, replacement))),
            Self::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let integrand = if var == symbol {
                    integrand.clone()
                } else {
                    Box::new(integrand.substitute(symbol, replacement))
                };
                Self::Integral {
                    integrand,
                    var: var.clone(),
                    lower: Box::new(lower.substitute(symbol, replacement)),
                    upper: Box::new(upper.substitute(symbol, replacement)),
                }
            }
        }
    }

    /// Evaluate numerically under `bindings`.
    ///
    /// Unevaluated integral nodes are evaluated by quadrature with the default
    /// sample count.
    ///
    /// # Errors
    /// [`SymbolicError::UnboundSymbol`] for symbols missing from `bindings`,
    /// and quadrature errors from embedded integral nodes.
    pub fn eval(&self, bindings: &Bindings) -> Result<f64, SymbolicError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Constant(constant) => Ok(constant.value()),
            Self::Symbol(name) => bindings
                .get(name)
                .ok_or_else(|| SymbolicError::UnboundSymbol { name: name.clone() }),
            Self::Add(terms) => {
                let mut sum = 0.0;
                for term in terms {
                    sum += term.eval(bindings)?;
                }
                Ok(sum)
            }
            Self::Mul(factors) => {
                let mut product = 1.0;
                for factor in factors {
                    product *= factor.eval(bindings)?;
                }
                Ok(product)
            }
            Self::Pow(base, exponent) => {
                Ok(base.eval(bindings)?.powf(exponent.eval(bindings)?))
            }
            Self::Sin(arg) => Ok(arg.eval(bindings)?.sin()),
            Self::Cos(arg) => Ok(arg.eval(bindings)?.cos()),
            Self::Integral {
                integrand,
                var,
                lower,
                upper,
            } => super::integrate::integrate_numeric(
                integrand,
                var,
                lower.eval(bindings)?,
                upper.eval(bindings)?,
                bindings,
                super::integrate::DEFAULT_QUADRATURE_SAMPLES,
            ),
        }
    }

    /// Numeric value of a symbol-free expression, if it has one.
    #[must_use]
    pub fn const_value(&self) -> Option<f64> {
        if self.is_constant() {
            self.eval(&Bindings::new()).ok()
        } else {
            None
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::Add(vec![self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::Add(vec![self, Self::Mul(vec![Self::Number(-1.0), rhs])])
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::Mul(vec![self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        Self::Mul(vec![self, Self::Pow(Box::new(rhs), Box::new(Self::Number(-1.0)))])
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::Mul(vec![Self::Number(-1.0), self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_resolves_bindings() {
        let expr = Expr::symbol("x") * Expr::number(3.0) + Expr::number(1.0);
        let value = expr.eval(&Bindings::new().bind("x", 2.0)).unwrap();
        assert!((value - 7.0).abs() < 1e-12);
    }

    #[test]
    fn eval_reports_unbound_symbol() {
        let expr = Expr::symbol("theta").sin();
        let err = expr.eval(&Bindings::new()).unwrap_err();
        assert_eq!(err, SymbolicError::UnboundSymbol { name: "theta".into() });
    }

    #[test]
    fn division_builds_reciprocal_power() {
        let expr = Expr::number(1.0) / Expr::symbol("x");
        let value = expr.eval(&Bindings::new().bind("x", 4.0)).unwrap();
        assert!((value - 0.25).abs() < 1e-12);
    }

    #[test]
    fn substitute_respects_bound_integration_variable() {
        let integral = Expr::Integral {
            integrand: Box::new(Expr::symbol("x").cos()),
            var: "x".into(),
            lower: Box::new(Expr::number(0.0)),
            upper: Box::new(Expr::symbol("t")),
        };
        let substituted = integral.substitute("x", &Expr::number(5.0));
        // The integrand's x is bound; only free occurrences may change.
        match &substituted {
            Expr::Integral { integrand, .. } => {
                assert_eq!(**integrand, Expr::symbol("x").cos());
            }
            other => panic!("expected integral, got {other:?}"),
        }
        let substituted = integral.substitute("t", &Expr::pi());
        match &substituted {
            Expr::Integral { upper, .. } => assert_eq!(**upper, Expr::pi()),
            other => panic!("expected integral, got {other:?}"),
        }
    }

    #[test]
    fn contains_sees_through_operators() {
        let x = Expr::symbol("x");
        let expr = (x.clone().sin() + Expr::number(1.0)) * Expr::symbol("a");
        assert!(expr.contains("x"));
        assert!(expr.contains("a"));
        assert!(!expr.contains("y"));
    }

    #[test]
    fn const_value_folds_pi() {
        let expr = Expr::pi() * Expr::number(0.5);
        let value = expr.const_value().unwrap();
        assert!((value - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
