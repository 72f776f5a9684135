//! Exact 3-vector primitives shared by every other module.
//!
//! Vectors are plain `nalgebra` values; these free functions exist so the
//! numeric kernels read the same way regardless of which operator syntax a
//! call site prefers.

use nalgebra::{Vector2, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Vec2 = Vector2<f64>;

pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    a + b
}

pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    a - b
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    a.cross(b)
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a.dot(b)
}

/// Euclidean length. The zero vector has norm 0; callers that normalize must
/// guard against it themselves.
pub fn norm(a: &Vec3) -> f64 {
    a.norm()
}

/// Divides by the norm without any zero guard, so a zero vector yields NaN
/// components. Used where a degenerate input is a documented edge case.
pub(crate) fn unguarded_unit(a: &Vec3) -> Vec3 {
    a / norm(a)
}

/// Builds a vector from a flat `[x, y, z]` slice.
pub fn from_slice(xyz: &[f64]) -> Vec3 {
    Vec3::new(xyz[0], xyz[1], xyz[2])
}

/// Flattens points into row-major `x0, y0, z0, x1, ...` storage.
pub fn flatten(points: &[Vec3]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        out.extend_from_slice(&[p.x, p.y, p.z]);
    }
    out
}

/// Inverse of [`flatten`]. Trailing values that do not form a full triple are
/// ignored.
pub fn unflatten(flat: &[f64]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(from_slice).collect()
}
