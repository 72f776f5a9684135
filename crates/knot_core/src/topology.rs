//! Writhe, twist, linking and crossing estimates for closed filaments.
//!
//! Every routine here is an all-pairs sum over segments or vertices and costs
//! O(N²) (O(directions · N²) for the crossing estimate). No spatial index is
//! used, so these are the scalability ceiling of the library.

use crate::error::KnotError;
use crate::projection::{project_curve, random_unit_direction, segments_cross};
use crate::vector::{cross, dot, norm, sub, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pairs of samples closer than this are left out of the double sums.
pub const PAIR_SINGULARITY_EPS: f64 = 1e-6;

/// Vertex pairs closer than this many indices apart are never reported as
/// reconnection candidates.
pub const RECONNECTION_INDEX_GAP: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrossingSettings {
    pub directions: usize,
    pub seed: u64,
}

impl Default for CrossingSettings {
    fn default() -> Self {
        Self {
            directions: 24,
            seed: 12345,
        }
    }
}

/// Discrete self-linking writhe
/// `1/(2π) Σ_{i<j} (t_i × t_j)·(X_i − X_j) / |X_i − X_j|³`
/// with `t_i = X[i+1] − X[i]` over segments `0..N−1` (the closing segment is
/// not part of this sum).
pub fn writhe(points: &[Vec3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut w = 0.0;
    for i in 0..n - 1 {
        let t1 = sub(&points[i + 1], &points[i]);
        for j in i + 1..n - 1 {
            let r = sub(&points[i], &points[j]);
            let dist = norm(&r);
            if dist < PAIR_SINGULARITY_EPS {
                continue;
            }
            let t2 = sub(&points[j + 1], &points[j]);
            w += dot(&cross(&t1, &t2), &r) / (dist * dist * dist);
        }
    }
    w / (2.0 * PI)
}

/// Gauss-integral writhe from positions and parametric tangents sampled at
/// `M` uniform parameters over `[0, 2π)`:
/// `dt²/(4π) Σ_{i≠j} (T_i × T_j)·(r_i − r_j) / |r_i − r_j|³`, `dt = 2π/M`.
///
/// All ordered pairs are visited, which is why the normalization is `4π`
/// rather than the `2π` of [`writhe`].
pub fn writhe_gauss(positions: &[Vec3], tangents: &[Vec3]) -> f64 {
    let m = positions.len().min(tangents.len());
    if m < 2 {
        return 0.0;
    }
    let dt = 2.0 * PI / m as f64;
    let mut sum = 0.0;
    for i in 0..m {
        for j in 0..m {
            if i == j {
                continue;
            }
            let dr = sub(&positions[i], &positions[j]);
            let dist = norm(&dr);
            if dist < PAIR_SINGULARITY_EPS {
                continue;
            }
            sum += dot(&cross(&tangents[i], &tangents[j]), &dr) / (dist * dist * dist);
        }
    }
    dt * dt * sum / (4.0 * PI)
}

/// Unrounded Gauss linking integral
/// `1/(4π) Σ_i Σ_j (dx_i × dy_j)·(x_i − y_j) / |x_i − y_j|³`.
/// Both curves are closed with their wrap-around segment.
pub fn linking_integral(first: &[Vec3], second: &[Vec3]) -> f64 {
    let n = first.len();
    let m = second.len();
    if n < 2 || m < 2 {
        return 0.0;
    }
    let mut lk = 0.0;
    for i in 0..n {
        let xi = &first[i];
        let dx = sub(&first[(i + 1) % n], xi);
        for j in 0..m {
            let yj = &second[j];
            let dy = sub(&second[(j + 1) % m], yj);
            let r = sub(xi, yj);
            let dist = norm(&r);
            if dist < PAIR_SINGULARITY_EPS {
                continue;
            }
            lk += dot(&cross(&dx, &dy), &r) / (dist * dist * dist);
        }
    }
    lk / (4.0 * PI)
}

/// Gauss linking number of two disjoint closed curves, the
/// [`linking_integral`] rounded to the nearest integer.
pub fn linking_number(first: &[Vec3], second: &[Vec3]) -> i64 {
    linking_integral(first, second).round() as i64
}

/// Twist `1/(2π) Σ (T_i × dB/ds_i)·B_i` over interior samples with
/// `dB/ds_i ≈ (B[i+1] − B[i−1]) / 2`.
pub fn twist(tangents: &[Vec3], binormals: &[Vec3]) -> f64 {
    let n = tangents.len().min(binormals.len());
    if n < 3 {
        return 0.0;
    }
    let tw: f64 = (1..n - 1)
        .map(|i| {
            let db_ds = sub(&binormals[i + 1], &binormals[i - 1]) * 0.5;
            dot(&cross(&tangents[i], &db_ds), &binormals[i])
        })
        .sum();
    tw / (2.0 * PI)
}

/// Centerline helicity of a single closed loop.
///
/// Călugăreanu–White gives `Lk = Wr + Tw` for a framed curve; this collapses
/// it to the writhe alone, i.e. assumes a zero-twist framing. The tangent
/// argument is accepted for interface symmetry and is not read.
pub fn centerline_helicity(curve: &[Vec3], _tangents: &[Vec3]) -> f64 {
    writhe(curve)
}

/// All vertex pairs `(i, j)` with `j ≥ i + 5` closer than `threshold`.
pub fn reconnection_candidates(curve: &[Vec3], threshold: f64) -> Vec<(usize, usize)> {
    let n = curve.len();
    let mut candidates = Vec::new();
    for i in 0..n {
        for j in i + RECONNECTION_INDEX_GAP..n {
            if norm(&sub(&curve[i], &curve[j])) < threshold {
                candidates.push((i, j));
            }
        }
    }
    candidates
}

/// Number of strict segment crossings in the projection of `curve` along
/// `direction`, skipping adjacent and wrap-adjacent segment pairs.
pub fn projected_crossings(curve: &[Vec3], direction: &Vec3) -> usize {
    let m = curve.len();
    if m < 4 {
        return 0;
    }
    let proj = project_curve(curve, direction).points;
    let mut count = 0;
    for i in 0..m {
        let p1 = &proj[i];
        let p2 = &proj[(i + 1) % m];
        for j in i + 2..m {
            if i == 0 && j == m - 1 {
                continue;
            }
            if segments_cross(p1, p2, &proj[j], &proj[(j + 1) % m]) {
                count += 1;
            }
        }
    }
    count
}

/// Minimum crossing count over `settings.directions` seeded random
/// projections (at least one direction is always tried). The minimum is an
/// upper bound on the crossing number of the knot type.
pub fn estimate_crossing_number(
    curve: &[Vec3],
    settings: &CrossingSettings,
) -> Result<usize, KnotError> {
    if curve.len() < 4 {
        return Err(KnotError::TooFewPoints {
            required: 4,
            actual: curve.len(),
        });
    }
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut best = usize::MAX;
    for _ in 0..settings.directions.max(1) {
        let direction = random_unit_direction(&mut rng);
        best = best.min(projected_crossings(curve, &direction));
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::{circle, trefoil};
    use approx::assert_abs_diff_eq;
    use nalgebra::{Rotation3, Vector3};
    use std::f64::consts::TAU;

    fn trefoil_tangents(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let s = TAU * i as f64 / n as f64;
                let r = 2.0 + (3.0 * s).cos();
                Vec3::new(
                    -3.0 * (3.0 * s).sin() * (2.0 * s).cos() - 2.0 * r * (2.0 * s).sin(),
                    -3.0 * (3.0 * s).sin() * (2.0 * s).sin() + 2.0 * r * (2.0 * s).cos(),
                    3.0 * (3.0 * s).cos(),
                )
            })
            .collect()
    }

    fn hopf_link(n: usize) -> (Vec<Vec3>, Vec<Vec3>) {
        let a = circle(1.0, Vec3::zeros(), n);
        let b = (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                Vec3::new(1.0 + t.cos(), 0.0, t.sin())
            })
            .collect();
        (a, b)
    }

    #[test]
    fn planar_curve_has_zero_writhe() {
        let c = circle(2.0, Vec3::zeros(), 120);
        assert_abs_diff_eq!(writhe(&c), 0.0, epsilon = 1e-12);
        let tangents = crate::geometry::periodic_tangents(&c);
        assert_abs_diff_eq!(writhe_gauss(&c, &tangents), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn writhe_is_rotation_invariant() {
        let curve = trefoil(300);
        let rot = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.7)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -1.3);
        let rotated: Vec<Vec3> = curve.iter().map(|p| rot * p).collect();
        assert_abs_diff_eq!(writhe(&curve), writhe(&rotated), epsilon = 1e-9);
    }

    #[test]
    fn writhe_flips_under_mirror_and_survives_reversal() {
        let curve = trefoil(400);
        let w = writhe(&curve);
        assert!(w.abs() > 1.0, "trefoil writhe should be substantial, got {w}");

        let mirrored: Vec<Vec3> = curve.iter().map(|p| Vec3::new(p.x, p.y, -p.z)).collect();
        assert_abs_diff_eq!(writhe(&mirrored), -w, epsilon = 1e-9);

        let reversed: Vec<Vec3> = curve.iter().rev().copied().collect();
        assert_abs_diff_eq!(writhe(&reversed), w, epsilon = 1e-2);
    }

    #[test]
    fn gauss_writhe_agrees_with_segment_writhe() {
        let n = 400;
        let curve = trefoil(n);
        let w = writhe(&curve);
        let wg = writhe_gauss(&curve, &trefoil_tangents(n));
        assert_abs_diff_eq!(wg, w, epsilon = 0.1);
    }

    #[test]
    fn distant_circles_are_unlinked() {
        let a = circle(1.0, Vec3::zeros(), 100);
        let b = circle(1.0, Vec3::new(0.0, 0.0, 50.0), 100);
        assert_eq!(linking_number(&a, &b), 0);
    }

    #[test]
    fn hopf_link_has_unit_linking_number() {
        let (a, b) = hopf_link(200);
        let lk = linking_number(&a, &b);
        assert_eq!(lk.abs(), 1);

        let b_rev: Vec<Vec3> = b.iter().rev().copied().collect();
        assert_eq!(linking_number(&a, &b_rev), -lk);
        assert_eq!(linking_number(&b, &a), lk);
    }

    #[test]
    fn repeated_vertex_leaves_writhe_unchanged() {
        let curve = trefoil(60);
        let mut repeated = curve.clone();
        repeated.insert(11, curve[10]);
        let w = writhe(&repeated);
        assert!(w.is_finite());
        assert_abs_diff_eq!(w, writhe(&curve), epsilon = 1e-12);
    }

    #[test]
    fn gauss_writhe_skips_coincident_samples() {
        let positions = vec![Vec3::zeros(), Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let tangents = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        // Ordered pairs (0,2), (2,0), (1,2), (2,1) contribute -1, -1, 2, 2.
        let dt = TAU / 3.0;
        let expected = dt * dt * 2.0 / (4.0 * PI);
        let w = writhe_gauss(&positions, &tangents);
        assert!(w.is_finite());
        assert_abs_diff_eq!(w, expected, epsilon = 1e-14);
    }

    #[test]
    fn touching_curves_skip_the_shared_vertex() {
        let n = 40;
        let a = circle(1.0, Vec3::zeros(), n);
        let mut b = circle(1.0, Vec3::new(2.0, 0.0, 0.0), n);
        b[n / 2] = a[0];
        let lk = linking_integral(&a, &b);
        assert!(lk.is_finite());
        assert_eq!(lk, 0.0);
        assert_eq!(linking_number(&a, &b), 0);
    }

    #[test]
    fn hopf_link_integral_is_close_to_an_integer() {
        let (a, b) = hopf_link(200);
        let lk = linking_integral(&a, &b);
        assert_abs_diff_eq!(lk.abs(), 1.0, epsilon = 0.1);
        assert_eq!(lk.round() as i64, linking_number(&a, &b));
    }

    #[test]
    fn planar_frame_has_zero_twist() {
        let c = circle(1.0, Vec3::zeros(), 64);
        let frames = crate::geometry::frenet_frames(&c);
        assert_abs_diff_eq!(twist(&frames.tangents, &frames.binormals), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn centerline_helicity_equals_writhe() {
        let curve = trefoil(150);
        let tangents = crate::geometry::periodic_tangents(&curve);
        assert_eq!(centerline_helicity(&curve, &tangents), writhe(&curve));
    }

    #[test]
    fn reconnection_candidates_skip_near_neighbours() {
        // Points 0.1 apart along a line: neighbours within 5 indices are never reported.
        let line: Vec<Vec3> = (0..10).map(|i| Vec3::new(0.1 * i as f64, 0.0, 0.0)).collect();
        assert!(reconnection_candidates(&line, 0.45).is_empty());
        let pairs = reconnection_candidates(&line, 0.55);
        assert_eq!(pairs, vec![(0, 5), (1, 6), (2, 7), (3, 8), (4, 9)]);
    }

    #[test]
    fn reconnection_candidates_find_close_approach() {
        let mut curve = circle(1.0, Vec3::zeros(), 40);
        curve[20] = curve[0] + Vec3::new(0.0, 0.0, 0.01);
        let pairs = reconnection_candidates(&curve, 0.05);
        assert_eq!(pairs, vec![(0, 20)]);
    }

    #[test]
    fn convex_planar_polygon_has_no_crossings() {
        let c = circle(1.0, Vec3::new(0.3, -0.2, 0.0), 50);
        assert_eq!(projected_crossings(&c, &Vec3::new(0.0, 0.0, 1.0)), 0);
        assert_eq!(estimate_crossing_number(&c, &CrossingSettings::default()), Ok(0));
    }

    #[test]
    fn trefoil_needs_at_least_three_crossings() {
        // 201 samples keep the three axial crossings off the vertices.
        let curve = trefoil(201);
        let settings = CrossingSettings {
            directions: 12,
            seed: 99,
        };
        let estimate = estimate_crossing_number(&curve, &settings).unwrap();
        assert!(estimate >= 3, "trefoil projection with {estimate} crossings");
        // The view down the torus axis shows the standard three-crossing diagram.
        assert_eq!(projected_crossings(&curve, &Vec3::new(0.0, 0.0, 1.0)), 3);
    }

    #[test]
    fn crossing_estimate_is_seed_deterministic() {
        let curve = trefoil(120);
        let settings = CrossingSettings {
            directions: 5,
            seed: 4,
        };
        assert_eq!(
            estimate_crossing_number(&curve, &settings),
            estimate_crossing_number(&curve, &settings)
        );
    }

    #[test]
    fn crossing_estimate_rejects_short_curves() {
        let tri = circle(1.0, Vec3::zeros(), 3);
        assert_eq!(
            estimate_crossing_number(&tri, &CrossingSettings::default()),
            Err(KnotError::TooFewPoints {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn zero_directions_still_tries_one_projection() {
        let curve = trefoil(201);
        let settings = CrossingSettings {
            directions: 0,
            seed: 1,
        };
        assert!(estimate_crossing_number(&curve, &settings).unwrap() >= 3);
    }
}
