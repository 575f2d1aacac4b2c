//! Least-squares plane recovery via the normal equations.

use serde::Serialize;

use crate::geom::Vec3;

use super::PlaneCoefficients;

/// Pivot magnitudes at or below this are treated as zero during inversion.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// Errors that can occur during the plane fit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    #[error("insufficient points: {provided} provided, {required} required")]
    InsufficientPoints { provided: usize, required: usize },
    #[error("points must be finite")]
    NonFiniteInput,
    #[error("normal equations are singular; the points do not determine a plane")]
    SingularGramMatrix,
}

// ============================================================================
// Mat3
// ============================================================================

/// Row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub values: [[f64; 3]; 3],
}

impl Mat3 {
    #[must_use]
    pub const fn new(values: [[f64; 3]; 3]) -> Self {
        Self { values }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[must_use]
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        let m = &self.values;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Invert with Gauss–Jordan elimination and partial pivoting. Returns
    /// `None` when a pivot falls at or below `tolerance`.
    #[must_use]
    pub fn invert(&self, tolerance: f64) -> Option<Self> {
        let mut augmented = [[0.0_f64; 6]; 3];
        for r in 0..3 {
            for c in 0..3 {
                augmented[r][c] = self.values[r][c];
            }
            augmented[r][3 + r] = 1.0;
        }

        for col in 0..3 {
            let mut pivot_row = col;
            let mut pivot_value = augmented[pivot_row][col].abs();
            for r in (col + 1)..3 {
                let value = augmented[r][col].abs();
                if value > pivot_value {
                    pivot_value = value;
                    pivot_row = r;
                }
            }
            if pivot_value <= tolerance {
                return None;
            }
            if pivot_row != col {
                augmented.swap(col, pivot_row);
            }
            let pivot = augmented[col][col];
            for c in 0..6 {
                augmented[col][c] /= pivot;
            }
            for r in 0..3 {
                if r == col {
                    continue;
                }
                let factor = augmented[r][col];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..6 {
                    augmented[r][c] -= factor * augmented[col][c];
                }
                augmented[r][col] = 0.0;
            }
        }

        let mut inverse = [[0.0_f64; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                inverse[r][c] = augmented[r][3 + c];
            }
        }
        Some(Self::new(inverse))
    }
}

// ============================================================================
// Fit
// ============================================================================

/// Fit `Ax + By + Cz = 1` to `points` by solving the normal equations.
///
/// The Gram matrix accumulates the pairwise products of the coordinate
/// columns; the right-hand side is the vector of column sums.
///
/// # Errors
/// [`FitError::InsufficientPoints`] below three points,
/// [`FitError::NonFiniteInput`] for NaN or infinite coordinates, and
/// [`FitError::SingularGramMatrix`] for degenerate configurations
/// (collinear or coincident points).
pub fn fit_plane(points: &[Vec3]) -> Result<PlaneCoefficients, FitError> {
    if points.len() < 3 {
        return Err(FitError::InsufficientPoints {
            provided: points.len(),
            required: 3,
        });
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FitError::NonFiniteInput);
    }

    let (mut xx, mut yy, mut zz) = (0.0, 0.0, 0.0);
    let (mut xy, mut xz, mut yz) = (0.0, 0.0, 0.0);
    let mut sums = Vec3::ZERO;
    for p in points {
        xx += p.x * p.x;
        yy += p.y * p.y;
        zz += p.z * p.z;
        xy += p.x * p.y;
        xz += p.x * p.z;
        yz += p.y * p.z;
        sums = sums + *p;
    }

    let gram = Mat3::new([[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]]);
    let inverse = gram
        .invert(DEFAULT_PIVOT_TOLERANCE)
        .ok_or(FitError::SingularGramMatrix)?;
    Ok(PlaneCoefficients::from(inverse.mul_vec3(sums)))
}

/// Sum of squared residuals of the plane equation over `points`.
#[must_use]
pub fn sum_squared_residuals(points: &[Vec3], plane: &PlaneCoefficients) -> f64 {
    points
        .iter()
        .map(|p| {
            let d = plane.dot(*p) - 1.0;
            d * d
        })
        .sum()
}

/// Summary of a completed fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub coefficients: PlaneCoefficients,
    pub point_count: usize,
    /// Sum of squared residuals against the fitted plane.
    pub sse: f64,
    pub max_abs_residual: f64,
}

/// Fit a plane and collect residual statistics.
///
/// # Errors
/// Same conditions as [`fit_plane`].
pub fn fit_with_report(points: &[Vec3]) -> Result<FitReport, FitError> {
    let coefficients = fit_plane(points)?;
    let sse = sum_squared_residuals(points, &coefficients);
    let max_abs_residual = points
        .iter()
        .map(|p| (coefficients.dot(*p) - 1.0).abs())
        .fold(0.0, f64::max);
    Ok(FitReport {
        coefficients,
        point_count: points.len(),
        sse,
        max_abs_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn identity_inverts_to_identity() {
        let inverse = Mat3::identity().invert(DEFAULT_PIVOT_TOLERANCE).unwrap();
        assert_eq!(inverse, Mat3::identity());
    }

    #[test]
    fn known_inverse_matches() {
        let m = Mat3::new([[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 8.0]]);
        let inverse = m.invert(DEFAULT_PIVOT_TOLERANCE).unwrap();
        assert!(approx_eq(inverse.values[0][0], 0.5, 1e-12));
        assert!(approx_eq(inverse.values[1][1], 0.25, 1e-12));
        assert!(approx_eq(inverse.values[2][2], 0.125, 1e-12));
    }

    #[test]
    fn inversion_round_trips_through_mul() {
        let m = Mat3::new([[3.0, 1.0, 0.5], [1.0, 4.0, 1.5], [0.5, 1.5, 5.0]]);
        let inverse = m.invert(DEFAULT_PIVOT_TOLERANCE).unwrap();
        let v = Vec3::new(1.0, -2.0, 3.0);
        let round_trip = inverse.mul_vec3(m.mul_vec3(v));
        assert!(approx_eq(round_trip.x, v.x, 1e-9));
        assert!(approx_eq(round_trip.y, v.y, 1e-9));
        assert!(approx_eq(round_trip.z, v.z, 1e-9));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let m = Mat3::new([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert!(m.invert(DEFAULT_PIVOT_TOLERANCE).is_none());
    }

    #[test]
    fn fit_requires_three_points() {
        let points = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        assert_eq!(
            fit_plane(&points).unwrap_err(),
            FitError::InsufficientPoints {
                provided: 2,
                required: 3
            }
        );
    }

    #[test]
    fn fit_rejects_non_finite_points() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, f64::NAN, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(fit_plane(&points).unwrap_err(), FitError::NonFiniteInput);
    }

    #[test]
    fn coincident_points_are_singular() {
        let points = [Vec3::new(1.0, 1.0, 1.0); 5];
        assert_eq!(fit_plane(&points).unwrap_err(), FitError::SingularGramMatrix);
    }

    #[test]
    fn exact_fit_recovers_axis_intercepts() {
        // x/2 + y/4 + z/8 = 1 through its three intercepts and a midpoint.
        let plane = PlaneCoefficients::new(0.5, 0.25, 0.125);
        let points = [
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(1.0, 2.0, 0.0),
        ];
        let fitted = fit_plane(&points).unwrap();
        assert!(approx_eq(fitted.a, plane.a, 1e-9));
        assert!(approx_eq(fitted.b, plane.b, 1e-9));
        assert!(approx_eq(fitted.c, plane.c, 1e-9));
        assert!(sum_squared_residuals(&points, &fitted) < 1e-18);
    }

    #[test]
    fn report_collects_residual_statistics() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.5, 0.5, 0.0),
        ];
        let report = fit_with_report(&points).unwrap();
        assert_eq!(report.point_count, 4);
        assert!(report.sse >= 0.0);
        assert!(report.max_abs_residual >= 0.0);
        assert!(report.max_abs_residual * report.max_abs_residual <= report.sse + 1e-15);
    }
}
