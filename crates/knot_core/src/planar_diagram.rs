//! Planar-diagram (PD) codes from sampled closed curves.
//!
//! A random generic projection of the curve is scanned for strict segment
//! crossings. Each crossing yields two arc events along the curve (one over,
//! one under); walking the events in curve order assigns arc labels, and each
//! crossing is then written as `[a, b, c, d]` = (under-in, over-in,
//! under-out, over-out). Several seeded projections are tried and the one
//! with the most crossings is kept.

use crate::error::KnotError;
use crate::projection::{project_curve, random_unit_direction, segment_intersection, Projection};
use crate::vector::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Labels of the four arcs meeting at a crossing: under-in, over-in,
/// under-out, over-out.
pub type Crossing = [usize; 4];

pub type PlanarDiagram = Vec<Crossing>;

/// Cramer's-rule tolerance for the determinant and the open parameter range.
pub const INTERSECTION_EPS: f64 = 1e-12;

/// Arc events closer than this along the curve are separated by
/// [`EVENT_TIE_NUDGE`].
pub const EVENT_TIE_EPS: f64 = 1e-12;
pub const EVENT_TIE_NUDGE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PdSettings {
    /// Number of random projections to try.
    pub tries: usize,
    pub seed: u64,
    /// Crossings whose projected segments meet at a shallower angle are
    /// dropped.
    pub min_angle_deg: f64,
    /// Crossings where the two strands are closer than this in depth are
    /// dropped, since over/under cannot be decided.
    pub depth_tol: f64,
}

impl Default for PdSettings {
    fn default() -> Self {
        Self {
            tries: 40,
            seed: 12345,
            min_angle_deg: 1.0,
            depth_tol: 1e-6,
        }
    }
}

struct CrossingGeometry {
    i: usize,
    j: usize,
    lam: f64,
    mu: f64,
    over_i: bool,
}

struct ArcEvent {
    s: f64,
    crossing: usize,
    over: bool,
}

/// Extracts a PD code from the best of `settings.tries` seeded projections.
///
/// The winner is the diagram with the most crossings; among equals the
/// first one found is kept. Rejected projections are logged and skipped.
pub fn pd_from_curve(curve: &[Vec3], settings: &PdSettings) -> Result<PlanarDiagram, KnotError> {
    if curve.len() < 4 {
        return Err(KnotError::TooFewPoints {
            required: 4,
            actual: curve.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut best: Option<PlanarDiagram> = None;

    for attempt in 0..settings.tries {
        let direction = random_unit_direction(&mut rng);
        let projection = project_curve(curve, &direction);
        match extract_from_projection(&projection, settings) {
            Ok(pd) => {
                let crossings = pd.len();
                if keep_if_better(&mut best, pd) {
                    debug!(attempt, crossings, "new best planar diagram");
                }
            }
            Err(err) => debug!(attempt, error = %err, "projection rejected"),
        }
    }

    best.ok_or_else(|| {
        warn!(tries = settings.tries, "no projection produced a planar diagram");
        KnotError::NoValidDiagram {
            tries: settings.tries,
        }
    })
}

/// Replaces `best` only when `candidate` has strictly more crossings, so the
/// earliest of several equally large diagrams is kept.
fn keep_if_better(best: &mut Option<PlanarDiagram>, candidate: PlanarDiagram) -> bool {
    if best.as_ref().is_none_or(|b| candidate.len() > b.len()) {
        *best = Some(candidate);
        true
    } else {
        false
    }
}

/// Builds a PD code from one projection.
///
/// Segment pairs `(i, j)` with `j ≥ i + 2` are tested, skipping the pair of
/// the first and the closing segment. A crossing survives only when its
/// strands are separated in depth by at least `depth_tol` and meet at an
/// angle of at least `min_angle_deg`.
pub fn extract_from_projection(
    projection: &Projection,
    settings: &PdSettings,
) -> Result<PlanarDiagram, KnotError> {
    let points = &projection.points;
    let depths = &projection.depths;
    let n = points.len();

    let mut crossings = Vec::new();
    for i in 0..n {
        let p1 = &points[i];
        let p2 = &points[(i + 1) % n];
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let q1 = &points[j];
            let q2 = &points[(j + 1) % n];
            let Some((lam, mu)) = segment_intersection(p1, p2, q1, q2, INTERSECTION_EPS) else {
                continue;
            };

            let di = depths[i] + lam * (depths[(i + 1) % n] - depths[i]);
            let dj = depths[j] + mu * (depths[(j + 1) % n] - depths[j]);
            if (di - dj).abs() < settings.depth_tol {
                continue;
            }

            let u = p2 - p1;
            let v = q2 - q1;
            let cos = (u.dot(&v) / ((u.norm() + 1e-18) * (v.norm() + 1e-18))).clamp(-1.0, 1.0);
            if cos.abs().acos().to_degrees() < settings.min_angle_deg {
                continue;
            }

            crossings.push(CrossingGeometry {
                i,
                j,
                lam,
                mu,
                over_i: di > dj,
            });
        }
    }
    if crossings.is_empty() {
        return Err(KnotError::NoCrossings);
    }

    let mut events: Vec<ArcEvent> = crossings
        .iter()
        .enumerate()
        .flat_map(|(id, c)| {
            [
                ArcEvent {
                    s: (c.i as f64 + c.lam) / n as f64,
                    crossing: id,
                    over: c.over_i,
                },
                ArcEvent {
                    s: (c.j as f64 + c.mu) / n as f64,
                    crossing: id,
                    over: !c.over_i,
                },
            ]
        })
        .collect();
    events.sort_by(|a, b| a.s.total_cmp(&b.s));
    for k in 1..events.len() {
        if (events[k].s - events[k - 1].s).abs() < EVENT_TIE_EPS {
            events[k].s += EVENT_TIE_NUDGE;
        }
    }

    // Event k sits between arc k (entering) and arc k + 1 (leaving); the
    // first event enters on the last arc since the curve is closed.
    let arcs = events.len();
    let mut pd = vec![[0usize; 4]; crossings.len()];
    for (idx, event) in events.iter().enumerate() {
        let incoming = if idx > 0 { idx } else { arcs };
        let outgoing = idx + 1;
        let entry = &mut pd[event.crossing];
        if event.over {
            entry[1] = incoming;
            entry[3] = outgoing;
        } else {
            entry[0] = incoming;
            entry[2] = outgoing;
        }
    }
    pd.retain(|c| c.iter().all(|&label| label > 0));

    validate_pd(&pd)?;
    Ok(pd)
}

/// Checks that every arc label `1..=2·pd.len()` appears exactly twice.
pub fn validate_pd(pd: &[Crossing]) -> Result<(), KnotError> {
    let arcs = 2 * pd.len();
    let mut counts = vec![0usize; arcs + 1];
    for &label in pd.iter().flatten() {
        if label == 0 || label > arcs {
            return Err(KnotError::LabelDegree { label, count: 1 });
        }
        counts[label] += 1;
    }
    for (label, &count) in counts.iter().enumerate().skip(1) {
        if count != 2 {
            return Err(KnotError::LabelDegree { label, count });
        }
    }
    Ok(())
}
