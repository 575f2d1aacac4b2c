//! Octahedral mapping of unit direction vectors.
//!
//! Probe atlases store one direction per texel; the octahedral mapping packs a
//! 3D direction into a 2D coordinate in `[0,1]²` by projecting onto the unit
//! octahedron and folding the lower hemisphere into the corners of the upper
//! hemisphere's square.
//!
//! The encoder here matches the renderer's packing shader exactly, including
//! two conventions that look like bugs but are load-bearing:
//!
//! - [`sign_nonzero`] maps `0.0` to `+1.0`, so directions on the axis planes
//!   fold toward the positive corner. `encode(0,0,-1)` is `(1.0, 0.5)`.
//! - The lower-hemisphere fold updates the components in sequence: the second
//!   component reads the already-folded first component. Only the upper
//!   hemisphere round-trips through [`octahedral_decode`].

use super::core::{Vec2, Vec3};

/// Errors that can occur while encoding a direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OctahedralError {
    #[error("cannot encode the zero vector")]
    ZeroVector,
    #[error("direction components must be finite")]
    NonFiniteInput,
}

/// Sign function with an inclusive zero: returns `1.0` for any `v >= 0.0`,
/// else `-1.0`.
#[must_use]
pub fn sign_nonzero(v: f64) -> f64 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Encode a direction as a 2D coordinate in `[0,1]²`.
///
/// The input does not need to be normalized; the projection divides by the L1
/// norm. Encoding is invariant under positive rescaling of the input.
///
/// # Errors
/// [`OctahedralError::ZeroVector`] when all components are zero, and
/// [`OctahedralError::NonFiniteInput`] for NaN or infinite components.
pub fn octahedral_encode(v: Vec3) -> Result<Vec2, OctahedralError> {
    if !v.is_finite() {
        return Err(OctahedralError::NonFiniteInput);
    }
    let l1 = v.l1_norm();
    if l1 == 0.0 {
        return Err(OctahedralError::ZeroVector);
    }

    let mut nx = v.x / l1;
    let mut ny = v.y / l1;
    if v.z < 0.0 {
        // Sequential fold: ny reads the folded nx, not the projected one.
        nx = (1.0 - ny.abs()) * sign_nonzero(nx);
        ny = (1.0 - nx.abs()) * sign_nonzero(ny);
    }

    Ok(Vec2::new(0.5 * nx + 0.5, 0.5 * ny + 0.5))
}

/// Decode a coordinate in `[0,1]²` back to a unit direction.
///
/// This is the standard simultaneous unfold. For directions in the upper
/// hemisphere (`z >= 0`) it inverts [`octahedral_encode`]; the encoder's
/// sequential fold makes the lower hemisphere lossy.
#[must_use]
pub fn octahedral_decode(uv: Vec2) -> Vec3 {
    let u = uv.x * 2.0 - 1.0;
    let v = uv.y * 2.0 - 1.0;
    let z = 1.0 - u.abs() - v.abs();
    let (x, y) = if z < 0.0 {
        (
            (1.0 - v.abs()) * sign_nonzero(u),
            (1.0 - u.abs()) * sign_nonzero(v),
        )
    } else {
        (u, v)
    };
    Vec3::new(x, y, z)
        .normalized()
        .unwrap_or(Vec3::Z)
}
