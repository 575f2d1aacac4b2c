//! Prints octahedral encodings for the axis directions and a coarse sweep of
//! unit vectors, with round-trip errors for the upper hemisphere.

use std::error::Error;

use probe_math::geom::{Vec3, octahedral_decode, octahedral_encode};

fn main() -> Result<(), Box<dyn Error>> {
    println!("axis directions:");
    let axes = [
        ("+x", Vec3::X),
        ("-x", -Vec3::X),
        ("+y", Vec3::Y),
        ("-y", -Vec3::Y),
        ("+z", Vec3::Z),
        ("-z", -Vec3::Z),
    ];
    for (label, v) in axes {
        let uv = octahedral_encode(v)?;
        println!("  {label} -> ({:.4}, {:.4})", uv.x, uv.y);
    }

    println!();
    println!("upper-hemisphere sweep (u, v, round-trip error):");
    let steps = 4;
    for i in 0..=steps {
        for j in 0..=steps {
            let x = f64::from(i) / f64::from(steps) * 2.0 - 1.0;
            let y = f64::from(j) / f64::from(steps) * 2.0 - 1.0;
            let Some(dir) = Vec3::new(x, y, 1.0).normalized() else {
                continue;
            };
            let uv = octahedral_encode(dir)?;
            let decoded = octahedral_decode(uv);
            let error = (decoded - dir).length();
            println!("  ({:.4}, {:.4})  err = {error:.3e}", uv.x, uv.y);
        }
    }
    Ok(())
}
