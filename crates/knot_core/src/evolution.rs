//! Self-induced motion of a single filament.
//!
//! Each vertex moves with the Biot–Savart velocity induced by the whole
//! filament at that vertex. A step never mutates its input: [`advance`]
//! takes a [`FilamentState`] snapshot and returns the next one, with tangents
//! re-derived from the moved positions.

use crate::biot_savart::velocity_at_point;
use crate::geometry::{frenet_frames, periodic_tangents};
use crate::solvers::{Euler, RK4};
use crate::traits::{DynamicalSystem, Steppable};
use crate::vector::{flatten, unflatten, Vec3};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    #[default]
    Euler,
    Rk4,
}

/// How tangents are recomputed from positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TangentRule {
    /// Unit Frenet tangents, with the first and last vertex copying their
    /// interior neighbour.
    #[default]
    Frenet,
    /// Unnormalized `(p[i+1] − p[i−1]) / 2` with wraparound.
    Periodic,
}

impl TangentRule {
    pub fn tangents(&self, positions: &[Vec3]) -> Vec<Vec3> {
        match self {
            TangentRule::Frenet => frenet_frames(positions).tangents,
            TangentRule::Periodic => periodic_tangents(positions),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvolutionSettings {
    pub dt: f64,
    pub steps: usize,
    pub circulation: f64,
    pub integrator: Integrator,
    pub tangent_rule: TangentRule,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 1,
            circulation: 1.0,
            integrator: Integrator::Euler,
            tangent_rule: TangentRule::Frenet,
        }
    }
}

/// Positions and tangents of a filament at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentState {
    pub positions: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub time: f64,
}

impl FilamentState {
    /// Snapshot at `t = 0` with tangents derived from `positions`.
    pub fn new(positions: Vec<Vec3>, rule: TangentRule) -> Self {
        let tangents = rule.tangents(&positions);
        Self {
            positions,
            tangents,
            time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The filament's self-induced velocity field over the flat `3N` state.
///
/// At the state the step starts from, the snapshot's own tangents are used.
/// Any other state (an intermediate Runge–Kutta stage) gets tangents
/// re-derived with `rule`.
pub struct SelfInducedFlow<'a> {
    start: &'a [f64],
    start_tangents: &'a [Vec3],
    circulation: f64,
    rule: TangentRule,
}

impl<'a> SelfInducedFlow<'a> {
    pub fn new(
        start: &'a [f64],
        start_tangents: &'a [Vec3],
        circulation: f64,
        rule: TangentRule,
    ) -> Self {
        Self {
            start,
            start_tangents,
            circulation,
            rule,
        }
    }
}

impl DynamicalSystem<f64> for SelfInducedFlow<'_> {
    fn dimension(&self) -> usize {
        self.start.len()
    }

    fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        let positions = unflatten(x);
        let derived;
        let tangents: &[Vec3] = if x == self.start {
            self.start_tangents
        } else {
            derived = self.rule.tangents(&positions);
            &derived
        };
        for (p, v) in positions.iter().zip(out.chunks_exact_mut(3)) {
            let u = velocity_at_point(p, &positions, tangents, self.circulation);
            v.copy_from_slice(&[u.x, u.y, u.z]);
        }
    }
}

fn check(state: &FilamentState, settings: &EvolutionSettings) -> Result<()> {
    if !settings.dt.is_finite() || settings.dt <= 0.0 {
        bail!("Time step must be positive and finite, got {}.", settings.dt);
    }
    if state.positions.len() < 3 {
        bail!("Filament needs at least 3 points, got {}.", state.positions.len());
    }
    if state.tangents.len() != state.positions.len() {
        bail!(
            "Tangent count ({}) does not match point count ({}).",
            state.tangents.len(),
            state.positions.len()
        );
    }
    Ok(())
}

fn step_once(state: &FilamentState, settings: &EvolutionSettings) -> FilamentState {
    let start = flatten(&state.positions);
    let flow = SelfInducedFlow::new(
        &start,
        &state.tangents,
        settings.circulation,
        settings.tangent_rule,
    );
    let mut x = start.clone();
    let mut t = state.time;
    match settings.integrator {
        Integrator::Euler => Euler::new(flow.dimension()).step(&flow, &mut t, &mut x, settings.dt),
        Integrator::Rk4 => RK4::new(flow.dimension()).step(&flow, &mut t, &mut x, settings.dt),
    }

    let positions = unflatten(&x);
    let tangents = settings.tangent_rule.tangents(&positions);
    FilamentState {
        positions,
        tangents,
        time: t,
    }
}

fn max_speed(before: &FilamentState, after: &FilamentState, dt: f64) -> f64 {
    before
        .positions
        .iter()
        .zip(&after.positions)
        .map(|(a, b)| (b - a).norm() / dt)
        .fold(0.0, f64::max)
}

/// One step of size `settings.dt`; `settings.steps` is ignored.
pub fn advance(state: &FilamentState, settings: &EvolutionSettings) -> Result<FilamentState> {
    check(state, settings)?;
    Ok(step_once(state, settings))
}

/// Runs `settings.steps` steps and returns every resulting snapshot, oldest
/// first. The initial state is not included.
pub fn evolve(state: &FilamentState, settings: &EvolutionSettings) -> Result<Vec<FilamentState>> {
    check(state, settings)?;
    let mut trajectory = Vec::with_capacity(settings.steps);
    let mut current = state.clone();
    for step in 0..settings.steps {
        let next = step_once(&current, settings);
        debug!(
            step,
            time = next.time,
            max_speed = max_speed(&current, &next, settings.dt),
            "filament step"
        );
        trajectory.push(next.clone());
        current = next;
    }
    Ok(trajectory)
}
