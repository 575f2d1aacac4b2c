//! Generates noisy grids on the plane x + y + z = 1, recovers the plane with
//! the normal-equations fit, and prints the recovery error per noise level.

use std::error::Error;

use probe_math::fit::{PlaneCoefficients, SampleOptions, fit_with_report, sample_plane_grid};

const SEED: u64 = 0x5eed;

fn main() -> Result<(), Box<dyn Error>> {
    let plane = PlaneCoefficients::new(1.0, 1.0, 1.0);
    println!(
        "generating 5x5 grids on {:.1}x + {:.1}y + {:.1}z = 1",
        plane.a, plane.b, plane.c
    );
    println!();

    for sigma in [0.0, 0.01, 0.05, 0.1] {
        let options = SampleOptions::noisy(5, sigma, SEED);
        let points = sample_plane_grid(&plane, &options)?;
        probe_math::debug_log!("sampled points: {points:?}");
        let report = fit_with_report(&points)?;
        let c = report.coefficients;
        println!("sigma = {sigma:.2}");
        println!("  recovered: A = {:+.6}, B = {:+.6}, C = {:+.6}", c.a, c.b, c.c);
        println!(
            "  points = {}, sse = {:.6e}, max |residual| = {:.6e}",
            report.point_count, report.sse, report.max_abs_residual
        );
    }
    Ok(())
}
