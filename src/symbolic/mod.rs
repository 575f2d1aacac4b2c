//! A small symbolic-math toolkit for the derivation tools.
//!
//! There is no full computer-algebra system here — just the term language,
//! simplifier and integrator the reflectance derivations need. See
//! [`crate::reflectance`] for the consumer this was built around.

mod display;
mod expr;
mod integrate;
mod simplify;

pub use expr::{Bindings, Const, Expr};
pub use integrate::{
    DEFAULT_QUADRATURE_SAMPLES, IntegralResult, definite_integral, integrate_numeric,
};
pub use simplify::simplify;

/// Errors from numeric evaluation and quadrature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolicError {
    #[error("symbol `{name}` has no binding")]
    UnboundSymbol { name: String },
    #[error("invalid quadrature request: {reason}")]
    InvalidQuadrature { reason: String },
}
