//! Biot–Savart induction from a closed filament and differential operators on
//! periodic sampling grids.
//!
//! Two regularizations coexist on purpose: [`velocity_at_point`] drops any
//! source sample closer than [`POINT_SINGULARITY_EPS`], while
//! [`velocity_on_grid`] keeps every segment and pads the cubed distance with
//! [`GRID_REGULARIZATION_EPS`]. They serve different callers and are not
//! interchangeable.
//!
//! Grid fields are flattened row-major with x outermost and z innermost.
//! Neighbor access wraps on every axis, so the difference operators are exact
//! only for genuinely periodic fields.

use crate::vector::{cross, dot, norm, sub, Vec3};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Source samples closer than this to the evaluation point are skipped.
pub const POINT_SINGULARITY_EPS: f64 = 1e-6;

/// Added to `|R|^3` in the segment kernel used on grids.
pub const GRID_REGULARIZATION_EPS: f64 = 1e-12;

const INV_FOUR_PI: f64 = 1.0 / (4.0 * PI);

/// Lattice dimensions of a flattened grid field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridShape {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.ny + j) * self.nz + k
    }

    /// Flat index of `(i + di, j + dj, k + dk)` with periodic wraparound.
    fn wrapped_index(
        &self,
        i: usize,
        j: usize,
        k: usize,
        di: isize,
        dj: isize,
        dk: isize,
    ) -> usize {
        self.index(wrap(i, di, self.nx), wrap(j, dj, self.ny), wrap(k, dk, self.nz))
    }
}

fn wrap(i: usize, offset: isize, n: usize) -> usize {
    (i as isize + offset).rem_euclid(n as isize) as usize
}

/// Velocity induced at `r` by a filament sampled at `points` with tangents
/// `tangents`:
/// `Γ/(4π) Σ t_i × (r − x_i) / |r − x_i|³`.
///
/// Terms with `|r − x_i| < 1e-6` are omitted silently, so evaluating on the
/// filament itself stays finite. The sum runs over the shorter of the two
/// slices.
pub fn velocity_at_point(r: &Vec3, points: &[Vec3], tangents: &[Vec3], circulation: f64) -> Vec3 {
    let mut v = Vec3::zeros();
    for (x, t) in points.iter().zip(tangents) {
        let dr = sub(r, x);
        let dist = norm(&dr);
        if dist < POINT_SINGULARITY_EPS {
            continue;
        }
        v += cross(t, &dr) * (circulation / (dist * dist * dist));
    }
    v * INV_FOUR_PI
}

/// Velocity on arbitrary points from the closed polyline `curve` using the
/// midpoint rule. One segment per consecutive vertex pair, including the
/// closing pair `N−1 → 0`; unit circulation.
///
/// Cost is O(segments × points). Curves with fewer than two vertices induce
/// no velocity.
pub fn velocity_on_grid(curve: &[Vec3], grid_points: &[Vec3]) -> Vec<Vec3> {
    let mut field = vec![Vec3::zeros(); grid_points.len()];
    let n = curve.len();
    if n < 2 {
        return field;
    }

    let segments: Vec<(Vec3, Vec3)> = (0..n)
        .map(|i| {
            let p0 = curve[i];
            let p1 = curve[(i + 1) % n];
            ((p0 + p1) * 0.5, p1 - p0)
        })
        .collect();

    for (out, g) in field.iter_mut().zip(grid_points) {
        let mut acc = Vec3::zeros();
        for (mid, dl) in &segments {
            let r = sub(g, mid);
            let dist = norm(&r);
            acc += cross(dl, &r) / (dist * dist * dist + GRID_REGULARIZATION_EPS);
        }
        *out = acc * INV_FOUR_PI;
    }
    field
}

/// Curl of a velocity field sampled on the lattice `shape` with uniform
/// `spacing`, by second-order central differences with periodic wraparound.
pub fn vorticity_on_grid(velocity: &[Vec3], shape: GridShape, spacing: f64) -> Result<Vec<Vec3>> {
    if velocity.len() != shape.len() {
        bail!(
            "Grid shape ({}, {}, {}) does not match field length ({}).",
            shape.nx,
            shape.ny,
            shape.nz,
            velocity.len()
        );
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        bail!("Grid spacing must be positive and finite.");
    }

    let inv_2h = 1.0 / (2.0 * spacing);
    let mut omega = vec![Vec3::zeros(); velocity.len()];
    for i in 0..shape.nx {
        for j in 0..shape.ny {
            for k in 0..shape.nz {
                let d_dx = (velocity[shape.wrapped_index(i, j, k, 1, 0, 0)]
                    - velocity[shape.wrapped_index(i, j, k, -1, 0, 0)])
                    * inv_2h;
                let d_dy = (velocity[shape.wrapped_index(i, j, k, 0, 1, 0)]
                    - velocity[shape.wrapped_index(i, j, k, 0, -1, 0)])
                    * inv_2h;
                let d_dz = (velocity[shape.wrapped_index(i, j, k, 0, 0, 1)]
                    - velocity[shape.wrapped_index(i, j, k, 0, 0, -1)])
                    * inv_2h;

                omega[shape.index(i, j, k)] = Vec3::new(
                    d_dy.z - d_dz.y,
                    d_dz.x - d_dx.z,
                    d_dx.y - d_dy.x,
                );
            }
        }
    }
    Ok(omega)
}

/// Sub-lattice with `margin` layers stripped from every face, in the same
/// row-major order as the input. Empty when the margin consumes an axis.
pub fn extract_interior<T: Copy>(field: &[T], shape: GridShape, margin: usize) -> Result<Vec<T>> {
    if field.len() != shape.len() {
        bail!(
            "Grid shape ({}, {}, {}) does not match field length ({}).",
            shape.nx,
            shape.ny,
            shape.nz,
            field.len()
        );
    }
    if 2 * margin >= shape.nx || 2 * margin >= shape.ny || 2 * margin >= shape.nz {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(
        (shape.nx - 2 * margin) * (shape.ny - 2 * margin) * (shape.nz - 2 * margin),
    );
    for i in margin..shape.nx - margin {
        for j in margin..shape.ny - margin {
            for k in margin..shape.nz - margin {
                out.push(field[shape.index(i, j, k)]);
            }
        }
    }
    Ok(out)
}

/// Aggregate helicity-type invariants of a sampled field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldInvariants {
    /// `Σ v·ω`
    pub h_charge: f64,
    /// `Σ |ω|² r²`
    pub h_mass: f64,
    /// `(h_charge / h_mass − 1) / 2`
    pub a_mu: f64,
}

impl FieldInvariants {
    /// False when `h_mass` vanished and the ratio propagated NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.h_charge.is_finite() && self.h_mass.is_finite() && self.a_mu.is_finite()
    }
}

/// Computes [`FieldInvariants`] from paired velocity, vorticity and squared
/// radius samples. No guard is applied to the final ratio: a zero `h_mass`
/// yields a non-finite `a_mu`, which callers detect with
/// [`FieldInvariants::is_finite`].
pub fn compute_invariants(v_sub: &[Vec3], w_sub: &[Vec3], r_sq: &[f64]) -> Result<FieldInvariants> {
    if v_sub.len() != w_sub.len() || v_sub.len() != r_sq.len() {
        bail!(
            "Invariant inputs must have equal lengths (velocity {}, vorticity {}, r_sq {}).",
            v_sub.len(),
            w_sub.len(),
            r_sq.len()
        );
    }

    let mut h_charge = 0.0;
    let mut h_mass = 0.0;
    for ((v, w), r2) in v_sub.iter().zip(w_sub).zip(r_sq) {
        h_charge += dot(v, w);
        h_mass += w.norm_squared() * r2;
    }
    Ok(FieldInvariants {
        h_charge,
        h_mass,
        a_mu: 0.5 * (h_charge / h_mass - 1.0),
    })
}

/// Mean of `v·ω` over paired samples; 0 for empty input.
pub fn filament_helicity(velocity: &[Vec3], vorticity: &[Vec3]) -> f64 {
    let n = velocity.len().min(vorticity.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = velocity.iter().zip(vorticity).map(|(v, w)| dot(v, w)).sum();
    sum / n as f64
}

/// Lattice points of `shape` centered on the origin with uniform `spacing`,
/// in the flattened order used by the grid operators.
pub fn regular_grid(shape: GridShape, spacing: f64) -> Vec<Vec3> {
    let axis = |n: usize| -> Vec<f64> {
        let center = (n as f64 - 1.0) * 0.5;
        (0..n).map(|i| (i as f64 - center) * spacing).collect()
    };
    let xs = axis(shape.nx);
    let ys = axis(shape.ny);
    let zs = axis(shape.nz);

    let mut points = Vec::with_capacity(shape.len());
    for &x in &xs {
        for &y in &ys {
            for &z in &zs {
                points.push(Vec3::new(x, y, z));
            }
        }
    }
    points
}

/// `|p|²` per point, for pairing with interior fields in
/// [`compute_invariants`].
pub fn squared_radii(points: &[Vec3]) -> Vec<f64> {
    points.iter().map(|p| p.norm_squared()).collect()
}
