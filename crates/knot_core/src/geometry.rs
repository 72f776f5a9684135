//! Discrete differential geometry of sampled curves.
//!
//! Two independent curvature estimators live here and are kept separate:
//! [`curvature_torsion`] differentiates a Frenet frame with open-ended
//! central differences, while [`curvature_from_points`] works on raw vertices
//! with fully periodic stencils. They answer different questions for
//! different callers and give different numbers on the same input.

use crate::vector::{cross, dot, norm, sub, unguarded_unit, Vec3};
use serde::{Deserialize, Serialize};

/// Default regularization added to `|r'|³` in [`curvature_from_points`].
pub const DEFAULT_CURVATURE_EPS: f64 = 1e-8;

/// Per-vertex unit tangent, normal and binormal.
///
/// Frames are computed at interior vertices only. Vertex 0 copies vertex 1
/// and vertex N−1 copies vertex N−2 instead of using one-sided differences;
/// this replication is the boundary policy, not an approximation error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrenetFrames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

impl FrenetFrames {
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvatureTorsion {
    pub curvature: Vec<f64>,
    pub torsion: Vec<f64>,
}

/// Frenet frames from vertex positions.
///
/// Interior tangent ∝ `X[i+1] − X[i−1]`, proxy normal ∝
/// `(X[i+1] − X[i]) − (X[i] − X[i−1])`, binormal = `T × N`. Each vector is
/// normalized without a zero guard: a straight stretch (vanishing second
/// difference) or repeated vertex produces NaN components.
///
/// Curves with fewer than three vertices have no interior and yield empty
/// frames.
pub fn frenet_frames(points: &[Vec3]) -> FrenetFrames {
    let n = points.len();
    if n < 3 {
        return FrenetFrames::default();
    }

    let mut tangents = vec![Vec3::zeros(); n];
    let mut normals = vec![Vec3::zeros(); n];
    let mut binormals = vec![Vec3::zeros(); n];

    for i in 1..n - 1 {
        let d1 = sub(&points[i + 1], &points[i - 1]);
        let d2 = sub(&points[i + 1], &points[i]) - sub(&points[i], &points[i - 1]);
        let t = unguarded_unit(&d1);
        let nrm = unguarded_unit(&d2);
        tangents[i] = t;
        normals[i] = nrm;
        binormals[i] = cross(&t, &nrm);
    }

    for v in [&mut tangents, &mut normals, &mut binormals] {
        v[0] = v[1];
        v[n - 1] = v[n - 2];
    }

    FrenetFrames {
        tangents,
        normals,
        binormals,
    }
}

/// Curvature `½|T[i+1] − T[i−1]|` and torsion
/// `½ (N[i+1] − N[i−1]) · (T[i] × N[i])` at interior vertices, with the same
/// boundary copy policy as [`frenet_frames`].
///
/// Runs over the shorter of the two inputs; fewer than three samples yields
/// empty output.
pub fn curvature_torsion(tangents: &[Vec3], normals: &[Vec3]) -> CurvatureTorsion {
    let n = tangents.len().min(normals.len());
    if n < 3 {
        return CurvatureTorsion::default();
    }

    let mut curvature = vec![0.0; n];
    let mut torsion = vec![0.0; n];
    for i in 1..n - 1 {
        let d_t = sub(&tangents[i + 1], &tangents[i - 1]);
        let d_n = sub(&normals[i + 1], &normals[i - 1]);
        let b = cross(&tangents[i], &normals[i]);
        curvature[i] = 0.5 * norm(&d_t);
        torsion[i] = 0.5 * dot(&d_n, &b);
    }
    for v in [&mut curvature, &mut torsion] {
        v[0] = v[1];
        v[n - 1] = v[n - 2];
    }

    CurvatureTorsion { curvature, torsion }
}

/// Discrete curvature `|r' × r''| / (|r'|³ + eps)` with periodic central
/// differences at every vertex, including the first and last:
/// `r' ≈ (p[i+1] − p[i−1]) / 2`, `r'' ≈ p[i+1] − 2p[i] + p[i−1]`.
///
/// Fewer than three points yields zeros.
pub fn curvature_from_points(points: &[Vec3], eps: f64) -> Vec<f64> {
    let n = points.len();
    if n < 3 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|i| {
            let prev = &points[(i + n - 1) % n];
            let here = &points[i];
            let next = &points[(i + 1) % n];
            let r1 = sub(next, prev) * 0.5;
            let r2 = next - here * 2.0 + prev;
            let speed = norm(&r1);
            norm(&cross(&r1, &r2)) / (speed * speed * speed + eps)
        })
        .collect()
}

/// Translates points so their centroid sits at the origin. Empty input is
/// returned unchanged.
pub fn center_points(points: &[Vec3]) -> Vec<Vec3> {
    if points.is_empty() {
        return Vec::new();
    }
    let centroid = points.iter().fold(Vec3::zeros(), |acc, p| acc + p) / points.len() as f64;
    points.iter().map(|p| p - centroid).collect()
}

/// Unnormalized periodic tangents `(p[i+1] − p[i−1]) / 2` with wraparound at
/// both ends.
pub fn periodic_tangents(points: &[Vec3]) -> Vec<Vec3> {
    let n = points.len();
    (0..n)
        .map(|i| sub(&points[(i + 1) % n], &points[(i + n - 1) % n]) * 0.5)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::{circle, trefoil};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{PI, TAU};

    fn helix(n: usize, radius: f64, pitch: f64) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let s = 0.05 * i as f64;
                Vec3::new(radius * s.cos(), radius * s.sin(), pitch * s)
            })
            .collect()
    }

    #[test]
    fn frames_are_orthonormal_at_interior_points() {
        let curve = trefoil(200);
        let frames = frenet_frames(&curve);
        assert_eq!(frames.len(), curve.len());
        for i in 1..curve.len() - 1 {
            let t = frames.tangents[i];
            let b = frames.binormals[i];
            assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(frames.normals[i].norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(t.dot(&b), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(frames.normals[i].dot(&b), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn frame_boundaries_copy_nearest_interior_vertex() {
        let curve = helix(30, 1.0, 0.2);
        let frames = frenet_frames(&curve);
        let last = curve.len() - 1;
        assert_eq!(frames.tangents[0], frames.tangents[1]);
        assert_eq!(frames.normals[0], frames.normals[1]);
        assert_eq!(frames.binormals[0], frames.binormals[1]);
        assert_eq!(frames.tangents[last], frames.tangents[last - 1]);
        assert_eq!(frames.normals[last], frames.normals[last - 1]);
        assert_eq!(frames.binormals[last], frames.binormals[last - 1]);
    }

    #[test]
    fn straight_line_frames_are_nan() {
        let line: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
        let frames = frenet_frames(&line);
        assert_abs_diff_eq!(frames.tangents[2], Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
        assert!(frames.normals[2].x.is_nan());
        assert!(frames.binormals[2].iter().any(|c| c.is_nan()));
    }

    #[test]
    fn short_curves_have_no_frames() {
        let frames = frenet_frames(&[Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)]);
        assert!(frames.is_empty());
        assert!(curvature_torsion(&frames.tangents, &frames.normals).curvature.is_empty());
    }

    #[test]
    fn circle_frame_curvature_matches_turning_angle() {
        // Tangents of an N-gon turn by 2π/N per vertex, so ½|T[i+1]−T[i−1]| = sin(2π/N).
        let n = 100;
        let curve = circle(3.0, Vec3::zeros(), n);
        let frames = frenet_frames(&curve);
        let kt = curvature_torsion(&frames.tangents, &frames.normals);
        let expected = (TAU / n as f64).sin();
        for i in 2..n - 2 {
            assert_abs_diff_eq!(kt.curvature[i], expected, epsilon = 1e-12);
            assert_abs_diff_eq!(kt.torsion[i], 0.0, epsilon = 1e-12);
        }
        assert_eq!(kt.curvature[0], kt.curvature[1]);
        assert_eq!(kt.torsion[n - 1], kt.torsion[n - 2]);
    }

    #[test]
    fn helix_torsion_has_constant_sign() {
        let kt = {
            let frames = frenet_frames(&helix(80, 1.0, 0.5));
            curvature_torsion(&frames.tangents, &frames.normals)
        };
        let first = kt.torsion[10];
        assert!(first.abs() > 1e-6);
        for i in 2..78 {
            assert!(kt.torsion[i].signum() == first.signum());
            assert_abs_diff_eq!(kt.torsion[i], first, epsilon = 1e-9);
        }
    }

    #[test]
    fn point_curvature_of_circle_is_inverse_radius() {
        let radius = 2.0;
        let k = curvature_from_points(&circle(radius, Vec3::zeros(), 400), DEFAULT_CURVATURE_EPS);
        for value in k {
            assert_abs_diff_eq!(value, 1.0 / radius, epsilon = 1e-3);
        }
    }

    #[test]
    fn point_curvature_wraps_at_endpoints() {
        let curve = circle(1.0, Vec3::zeros(), 64);
        let k = curvature_from_points(&curve, DEFAULT_CURVATURE_EPS);
        assert_abs_diff_eq!(k[0], k[32], epsilon = 1e-12);
        assert_abs_diff_eq!(k[63], k[32], epsilon = 1e-12);
    }

    #[test]
    fn point_curvature_eps_bounds_degenerate_input() {
        let pts = vec![Vec3::zeros(); 4];
        let k = curvature_from_points(&pts, DEFAULT_CURVATURE_EPS);
        assert_eq!(k, vec![0.0; 4]);
        assert_eq!(curvature_from_points(&pts[..2], DEFAULT_CURVATURE_EPS), vec![0.0, 0.0]);
    }

    #[test]
    fn centering_is_idempotent() {
        let curve: Vec<Vec3> = trefoil(97)
            .into_iter()
            .map(|p| p + Vec3::new(5.0, -3.0, PI))
            .collect();
        let once = center_points(&curve);
        let twice = center_points(&once);
        let centroid = once.iter().fold(Vec3::zeros(), |acc, p| acc + p) / once.len() as f64;
        assert_abs_diff_eq!(centroid, Vec3::zeros(), epsilon = 1e-12);
        for (a, b) in once.iter().zip(&twice) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert!(center_points(&[]).is_empty());
    }

    #[test]
    fn periodic_tangents_wrap() {
        let square = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let t = periodic_tangents(&square);
        assert_eq!(t[0], Vec3::new(0.5, -0.5, 0.0));
        assert_eq!(t[3], Vec3::new(-0.5, -0.5, 0.0));
    }
}
