//! Hemisphere response of the reflectance lobe.
//!
//! The probe prefilter weighs incoming radiance with a lobe whose shape is
//! controlled by a roughness-like parameter `a` and the geometry angles
//! `theta` (view) and `phi_n` (normal offset). This module builds the lobe
//! integrand symbolically, in the exact form used by the derivation script:
//!
//! ```text
//! D(x) = cos(x) / (1 + K·(cos(x)·cos(θ)·cos(φ_n) + (sin(x)+1)·sin(φ_n))²)²
//! K    = (a² − 1) / (2 + 2·sin(x))
//! ```
//!
//! and integrates it over the hemisphere angle `x ∈ [0, π/2]`. With symbolic
//! parameters the integral has no closed form in our rule table; the
//! unevaluated result is the expected outcome and can still be evaluated
//! numerically for concrete parameters. At `a = 1` the lobe degenerates to
//! `cos(x)` and the response is exactly 1.

use std::f64::consts::FRAC_PI_2;

use crate::symbolic::{
    Bindings, Expr, IntegralResult, SymbolicError, definite_integral, integrate_numeric, simplify,
};

/// Integration variable: the hemisphere angle.
pub const LOBE_VAR: &str = "x";

/// Quadrature resolution for [`lobe_response`].
const RESPONSE_SAMPLES: usize = 512;

/// The symbolic hemisphere integral of the lobe.
#[derive(Debug, Clone)]
pub struct HemisphereIntegral {
    /// The simplified integrand `D(x)`.
    pub integrand: Expr,
    /// The integral over `x ∈ [0, π/2]`, closed-form or unevaluated.
    pub result: IntegralResult,
}

/// Build the lobe integrand with `x`, `theta`, `phi_n` and `a` symbolic.
#[must_use]
pub fn lobe_integrand() -> Expr {
    let x = Expr::symbol(LOBE_VAR);
    let theta = Expr::symbol("theta");
    let phi_n = Expr::symbol("phi_n");
    let a = Expr::symbol("a");

    let k = (a.powi(2) - Expr::number(1.0))
        / (Expr::number(2.0) + Expr::number(2.0) * x.clone().sin());
    let lobe = x.clone().cos() * theta.cos() * phi_n.clone().cos()
        + (x.clone().sin() + Expr::number(1.0)) * phi_n.sin();
    x.cos() / (Expr::number(1.0) + k * lobe.powi(2)).powi(2)
}

/// Simplify the lobe integrand and integrate it over the hemisphere angle.
#[must_use]
pub fn hemisphere_integral() -> HemisphereIntegral {
    let integrand = simplify(&lobe_integrand());
    let result = definite_integral(
        &integrand,
        LOBE_VAR,
        &Expr::number(0.0),
        &(Expr::pi() * Expr::number(0.5)),
    );
    HemisphereIntegral { integrand, result }
}

/// Numeric hemisphere response for concrete parameters.
///
/// # Errors
/// Propagates quadrature errors; with finite parameters this does not fail.
pub fn lobe_response(theta: f64, phi_n: f64, a: f64) -> Result<f64, SymbolicError> {
    let bindings = Bindings::new()
        .bind("theta", theta)
        .bind("phi_n", phi_n)
        .bind("a", a);
    integrate_numeric(
        &lobe_integrand(),
        LOBE_VAR,
        0.0,
        FRAC_PI_2,
        &bindings,
        RESPONSE_SAMPLES,
    )
}
