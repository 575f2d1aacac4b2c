//! Plane sampling and recovery.
//!
//! Validation tooling for the renderer's depth-plane reconstruction: generate
//! a synthetic grid of points on a known plane with optional Gaussian noise
//! ([`sample_plane_grid`]), recover the plane with a normal-equations least
//! squares fit ([`fit_plane`]), and measure how far the points sit from a
//! candidate plane ([`sum_squared_residuals`]).

mod regression;
mod sample;

use serde::{Deserialize, Serialize};

use crate::geom::Vec3;

pub use regression::{
    DEFAULT_PIVOT_TOLERANCE, FitError, FitReport, Mat3, fit_plane, fit_with_report,
    sum_squared_residuals,
};
pub use sample::{SampleError, SampleOptions, sample_plane_grid};

/// Coefficients of a plane in the form `Ax + By + Cz = 1`.
///
/// The fit recovers coefficients in this same scale convention; no
/// normalization is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl PlaneCoefficients {
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Left-hand side of the plane equation at `point`.
    #[must_use]
    pub fn dot(&self, point: Vec3) -> f64 {
        self.a * point.x + self.b * point.y + self.c * point.z
    }

    /// The (unnormalized) plane normal.
    #[must_use]
    pub const fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }
}

impl From<Vec3> for PlaneCoefficients {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
