//! Synthetic plane-point generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::geom::Vec3;

use super::PlaneCoefficients;

/// A coefficient at or below this magnitude is treated as zero when picking
/// which coordinate to solve the plane equation for.
const COEFFICIENT_THRESHOLD: f64 = 0.001;

/// Errors that can occur while generating sample points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("all plane coefficients are within 0.001 of zero")]
    DegenerateCoefficients,
    #[error("grid resolution must be at least 1")]
    ZeroResolution,
    #[error("noise mean and sigma must be finite, with sigma >= 0")]
    InvalidNoise,
}

/// Options for [`sample_plane_grid`].
#[derive(Debug, Clone, Copy)]
pub struct SampleOptions {
    /// Grid resolution `N`; the generator emits `N²` points.
    pub resolution: usize,
    /// Mean of the Gaussian noise added to the solved coordinate.
    pub noise_mean: f64,
    /// Standard deviation of the noise. Zero produces exact plane points.
    pub noise_sigma: f64,
    /// Seed for the noise stream; `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            resolution: 5,
            noise_mean: 0.0,
            noise_sigma: 0.0,
            seed: None,
        }
    }
}

impl SampleOptions {
    /// Noise-free sampling at the given resolution.
    #[must_use]
    pub fn exact(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Seeded Gaussian noise with zero mean.
    #[must_use]
    pub fn noisy(resolution: usize, sigma: f64, seed: u64) -> Self {
        Self {
            resolution,
            noise_sigma: sigma,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Which coordinate the plane equation is solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolveAxis {
    X,
    Y,
    Z,
}

/// Pick the solve axis by fixed priority: `A`, then `B`, then `C` — the first
/// coefficient past the threshold wins, regardless of magnitude.
fn solve_axis(plane: &PlaneCoefficients) -> Result<SolveAxis, SampleError> {
    if plane.a.abs() > COEFFICIENT_THRESHOLD {
        Ok(SolveAxis::X)
    } else if plane.b.abs() > COEFFICIENT_THRESHOLD {
        Ok(SolveAxis::Y)
    } else if plane.c.abs() > COEFFICIENT_THRESHOLD {
        Ok(SolveAxis::Z)
    } else {
        Err(SampleError::DegenerateCoefficients)
    }
}

/// Generate an `N × N` grid of points approximately on `plane`.
///
/// Grid parameters run over `(u, v) = (i/N, j/N)` for `i, j` in `0..N`; the
/// remaining coordinate is solved from `Ax + By + Cz = 1` and Gaussian noise
/// is added to that solved coordinate only.
///
/// # Errors
/// [`SampleError::DegenerateCoefficients`] when every coefficient is within
/// the threshold of zero, [`SampleError::ZeroResolution`] for an empty grid,
/// and [`SampleError::InvalidNoise`] for a non-finite mean or a negative or
/// non-finite sigma.
pub fn sample_plane_grid(
    plane: &PlaneCoefficients,
    options: &SampleOptions,
) -> Result<Vec<Vec3>, SampleError> {
    if options.resolution == 0 {
        return Err(SampleError::ZeroResolution);
    }
    let axis = solve_axis(plane)?;
    log::debug!("sampling plane grid: solving for {axis:?}");

    if !options.noise_mean.is_finite() {
        return Err(SampleError::InvalidNoise);
    }
    let noise_dist = Normal::new(options.noise_mean, options.noise_sigma)
        .map_err(|_| SampleError::InvalidNoise)?;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::rng().random()),
    };

    let n = options.resolution;
    let scale = n as f64;
    let (a, b, c) = (plane.a, plane.b, plane.c);

    let mut points = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let u = i as f64 / scale;
            let v = j as f64 / scale;
            let noise = rng.sample(noise_dist);
            let point = match axis {
                SolveAxis::X => Vec3::new(noise + (1.0 - b * u - c * v) / a, u, v),
                SolveAxis::Y => Vec3::new(u, noise + (1.0 - a * u - c * v) / b, v),
                SolveAxis::Z => Vec3::new(u, v, noise + (1.0 - a * u - b * v) / c),
            };
            points.push(point);
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_points_satisfy_plane_equation() {
        let plane = PlaneCoefficients::new(1.0, 1.0, 1.0);
        let points = sample_plane_grid(&plane, &SampleOptions::exact(5)).unwrap();
        assert_eq!(points.len(), 25);
        for p in points {
            assert!((p.x + p.y + p.z - 1.0).abs() < 1e-12, "off-plane point {p:?}");
        }
    }

    #[test]
    fn axis_priority_is_a_then_b_then_c() {
        // A below threshold, B dominant: y is solved, u and v fill x and z.
        let plane = PlaneCoefficients::new(0.0005, 2.0, 3.0);
        let points = sample_plane_grid(&plane, &SampleOptions::exact(3)).unwrap();
        for p in points {
            assert!((plane.dot(p) - 1.0).abs() < 1e-12);
        }

        // Only C survives the threshold.
        let plane = PlaneCoefficients::new(0.0, 0.0, 4.0);
        let points = sample_plane_grid(&plane, &SampleOptions::exact(3)).unwrap();
        for p in points {
            assert!((p.z - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_coefficients_are_rejected() {
        let plane = PlaneCoefficients::new(0.0, 0.001, -0.0002);
        let err = sample_plane_grid(&plane, &SampleOptions::exact(3)).unwrap_err();
        assert_eq!(err, SampleError::DegenerateCoefficients);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let plane = PlaneCoefficients::new(1.0, 1.0, 1.0);
        let err = sample_plane_grid(&plane, &SampleOptions::exact(0)).unwrap_err();
        assert_eq!(err, SampleError::ZeroResolution);
    }

    #[test]
    fn invalid_noise_is_rejected() {
        let plane = PlaneCoefficients::new(1.0, 1.0, 1.0);
        let mut options = SampleOptions::exact(3);
        options.noise_sigma = -1.0;
        assert_eq!(
            sample_plane_grid(&plane, &options).unwrap_err(),
            SampleError::InvalidNoise
        );
        options.noise_sigma = f64::NAN;
        assert!(sample_plane_grid(&plane, &options).is_err());
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let plane = PlaneCoefficients::new(1.0, 1.0, 1.0);
        let options = SampleOptions::noisy(4, 0.1, 42);
        let first = sample_plane_grid(&plane, &options).unwrap();
        let second = sample_plane_grid(&plane, &options).unwrap();
        assert_eq!(first, second);
    }
}
