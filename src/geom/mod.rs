mod core;
mod octahedral;

pub use core::{Vec2, Vec3};
pub use octahedral::{OctahedralError, octahedral_decode, octahedral_encode, sign_nonzero};
