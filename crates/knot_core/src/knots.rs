//! Parametric closed curves used as filament centerlines.
//!
//! Every generator samples `s_i = 2π i / n` for `i in 0..n`, so the last
//! vertex does not repeat the first; the closing segment is implied.

use crate::vector::Vec3;
use std::f64::consts::TAU;

fn samples(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| TAU * i as f64 / n as f64)
}

/// `((2 + cos 3s) cos 2s, (2 + cos 3s) sin 2s, sin 3s)`, a (2,3) torus knot.
pub fn trefoil(n: usize) -> Vec<Vec3> {
    samples(n)
        .map(|s| {
            let r = 2.0 + (3.0 * s).cos();
            Vec3::new(r * (2.0 * s).cos(), r * (2.0 * s).sin(), (3.0 * s).sin())
        })
        .collect()
}

/// `((2 + cos 2s) cos 3s, (2 + cos 2s) sin 3s, sin 4s)`.
pub fn figure_eight(n: usize) -> Vec<Vec3> {
    samples(n)
        .map(|s| {
            let r = 2.0 + (2.0 * s).cos();
            Vec3::new(r * (3.0 * s).cos(), r * (3.0 * s).sin(), (4.0 * s).sin())
        })
        .collect()
}

/// Counter-clockwise circle of `radius` in the plane `z = center.z`.
pub fn circle(radius: f64, center: Vec3, n: usize) -> Vec<Vec3> {
    samples(n)
        .map(|s| center + Vec3::new(radius * s.cos(), radius * s.sin(), 0.0))
        .collect()
}
