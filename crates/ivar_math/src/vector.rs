//! Vector helpers that glam does not provide.

use crate::Vec3;

/// Per-component magnitude below which a vector counts as degenerate.
pub const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// Degenerate-vector test.
pub trait NearZero {
    /// True if every component is within `NEAR_ZERO_EPSILON` of zero.
    fn near_zero(&self) -> bool;
}

impl NearZero for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.abs().cmplt(Vec3::splat(NEAR_ZERO_EPSILON)).all()
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the boundary.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
