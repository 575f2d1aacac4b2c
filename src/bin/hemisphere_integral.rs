//! Prints the reflectance lobe integrand and its hemisphere integral, plus
//! numeric responses for a few parameter choices.

use std::error::Error;

use probe_math::reflectance::{hemisphere_integral, lobe_response};
use probe_math::symbolic::IntegralResult;

fn main() -> Result<(), Box<dyn Error>> {
    let integral = hemisphere_integral();
    println!("integrand:");
    println!("  {}", integral.integrand);
    match &integral.result {
        IntegralResult::Closed(expr) => {
            println!("closed form:");
            println!("  {expr}");
        }
        IntegralResult::Unevaluated(expr) => {
            println!("no elementary closed form; unevaluated integral:");
            println!("  {expr}");
        }
    }

    println!();
    println!("numeric responses (theta, phi_n, a) -> value:");
    for (theta, phi_n, a) in [
        (0.0, 0.0, 1.0),
        (0.4, 0.2, 1.0),
        (0.0, 0.0, 2.0),
        (0.4, 0.2, 2.0),
        (0.8, -0.3, 4.0),
    ] {
        let response = lobe_response(theta, phi_n, a)?;
        println!("  ({theta:.2}, {phi_n:.2}, {a:.2}) -> {response:.6}");
    }
    Ok(())
}
