//! Random planar projections of space curves and 2D segment tests.

use crate::vector::{cross, dot, Vec2, Vec3};
use rand::Rng;
use std::f64::consts::TAU;

/// A curve projected onto the plane orthogonal to `direction`.
#[derive(Debug, Clone)]
pub struct Projection {
    pub direction: Vec3,
    /// `(p·u, p·v)` per vertex.
    pub points: Vec<Vec2>,
    /// `p·direction` per vertex; larger is nearer the viewer.
    pub depths: Vec<f64>,
}

/// Standard normal sample by the Box–Muller transform.
fn gauss_random(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Uniformly distributed unit vector from three Gaussian components.
pub fn random_unit_direction(rng: &mut impl Rng) -> Vec3 {
    let v = Vec3::new(gauss_random(rng), gauss_random(rng), gauss_random(rng));
    v / (v.norm() + 1e-18)
}

/// Two unit vectors `(u, v)` completing `n` to a right-handed frame. The
/// helper axis switches from x to y when `n` is nearly parallel to x.
pub fn orthonormal_basis(n: &Vec3) -> (Vec3, Vec3) {
    let helper = if n.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    let u = cross(n, &helper);
    let u = u / (u.norm() + 1e-18);
    let v = cross(n, &u);
    (u, v)
}

pub fn project_curve(curve: &[Vec3], direction: &Vec3) -> Projection {
    let (u, v) = orthonormal_basis(direction);
    let points = curve.iter().map(|p| Vec2::new(dot(p, &u), dot(p, &v))).collect();
    let depths = curve.iter().map(|p| dot(p, direction)).collect();
    Projection {
        direction: *direction,
        points,
        depths,
    }
}

/// Twice the signed area of triangle `abc`; positive when counter-clockwise.
pub fn orientation(a: &Vec2, b: &Vec2, c: &Vec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Strict crossing of segments `p1p2` and `q1q2`: each segment's endpoints
/// lie strictly on opposite sides of the other. Touching and collinear
/// overlaps do not count.
pub fn segments_cross(p1: &Vec2, p2: &Vec2, q1: &Vec2, q2: &Vec2) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Solves `p1 + λ(p2 − p1) = q1 + μ(q2 − q1)` by Cramer's rule.
///
/// Returns `(λ, μ)` only when both parameters lie strictly inside
/// `(eps, 1 − eps)`; near-parallel segments (`|det| < eps`) and
/// endpoint contacts yield `None`.
pub fn segment_intersection(
    p1: &Vec2,
    p2: &Vec2,
    q1: &Vec2,
    q2: &Vec2,
    eps: f64,
) -> Option<(f64, f64)> {
    let den = (p1.x - p2.x) * (q1.y - q2.y) - (p1.y - p2.y) * (q1.x - q2.x);
    if den.abs() < eps {
        return None;
    }
    let lam = ((p1.x - q1.x) * (q1.y - q2.y) - (p1.y - q1.y) * (q1.x - q2.x)) / den;
    let mu = ((p1.x - q1.x) * (p1.y - p2.y) - (p1.y - q1.y) * (p1.x - p2.x)) / den;

    let inside = |t: f64| t > eps && t < 1.0 - eps;
    if inside(lam) && inside(mu) {
        Some((lam, mu))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_directions_are_unit_and_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let da = random_unit_direction(&mut a);
            let db = random_unit_direction(&mut b);
            assert_eq!(da, db);
            assert_abs_diff_eq!(da.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn basis_is_orthonormal_for_any_axis() {
        for n in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let (u, v) = orthonormal_basis(&n);
            assert_abs_diff_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u.dot(&n), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.dot(&n), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn projection_records_depth_along_direction() {
        let curve = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.5)];
        let proj = project_curve(&curve, &Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(proj.depths, vec![3.0, 0.5]);
        assert_abs_diff_eq!(proj.points[0].norm(), 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn crossing_tests_exclude_touching_segments() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(2.0, 2.0);
        let c = Vec2::new(0.0, 2.0);
        let d = Vec2::new(2.0, 0.0);
        assert!(segments_cross(&a, &b, &c, &d));
        let (lam, mu) = segment_intersection(&a, &b, &c, &d, 1e-12).expect("crossing");
        assert_abs_diff_eq!(lam, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(mu, 0.5, epsilon = 1e-12);

        let e = Vec2::new(1.0, 1.0);
        assert!(!segments_cross(&a, &b, &e, &d));
        assert!(segment_intersection(&a, &b, &e, &d, 1e-12).is_none());

        let f = Vec2::new(0.0, 1.0);
        let g = Vec2::new(2.0, 3.0);
        assert!(!segments_cross(&a, &b, &f, &g));
        assert!(segment_intersection(&a, &b, &f, &g, 1e-12).is_none());
    }
}
