//! Stateful filament handle that steps self-induced motion.

use crate::shared::{flat_from_points, points_from_flat, to_js_error};
use anyhow::{bail, Result};
use knot_core::evolution::{advance, EvolutionSettings, FilamentState, Integrator, TangentRule};
use wasm_bindgen::prelude::*;

pub(crate) fn parse_integrator(name: &str) -> Result<Integrator> {
    match name {
        "euler" => Ok(Integrator::Euler),
        "rk4" => Ok(Integrator::Rk4),
        other => bail!("Unknown integrator '{}'.", other),
    }
}

pub(crate) fn parse_tangent_rule(name: &str) -> Result<TangentRule> {
    match name {
        "frenet" => Ok(TangentRule::Frenet),
        "periodic" => Ok(TangentRule::Periodic),
        other => bail!("Unknown tangent rule '{}'.", other),
    }
}

#[wasm_bindgen]
pub struct WasmFilament {
    state: FilamentState,
    settings: EvolutionSettings,
}

impl WasmFilament {
    pub(crate) fn build(
        positions: &[f64],
        circulation: f64,
        integrator: &str,
        tangent_rule: &str,
    ) -> Result<Self> {
        let points = points_from_flat(positions, "positions")?;
        let tangent_rule = parse_tangent_rule(tangent_rule)?;
        let settings = EvolutionSettings {
            circulation,
            integrator: parse_integrator(integrator)?,
            tangent_rule,
            ..EvolutionSettings::default()
        };
        Ok(Self {
            state: FilamentState::new(points, tangent_rule),
            settings,
        })
    }

    pub(crate) fn advance_by(&mut self, dt: f64) -> Result<()> {
        let settings = EvolutionSettings { dt, ..self.settings };
        self.state = advance(&self.state, &settings)?;
        Ok(())
    }
}

#[wasm_bindgen]
impl WasmFilament {
    #[wasm_bindgen(constructor)]
    pub fn new(
        positions: Vec<f64>,
        circulation: f64,
        integrator: &str,
        tangent_rule: &str,
    ) -> Result<WasmFilament, JsValue> {
        console_error_panic_hook::set_once();
        Self::build(&positions, circulation, integrator, tangent_rule)
            .map_err(|e| to_js_error("Invalid filament", e))
    }

    pub fn step(&mut self, dt: f64) -> Result<(), JsValue> {
        self.advance_by(dt).map_err(|e| to_js_error("Step failed", e))
    }

    /// Runs `steps` steps; stops at the first failure.
    pub fn run(&mut self, steps: u32, dt: f64) -> Result<(), JsValue> {
        for _ in 0..steps {
            self.step(dt)?;
        }
        Ok(())
    }

    pub fn positions(&self) -> Vec<f64> {
        flat_from_points(&self.state.positions)
    }

    pub fn tangents(&self) -> Vec<f64> {
        flat_from_points(&self.state.tangents)
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knot_core::knots::circle;
    use knot_core::vector::{flatten, Vec3};

    #[test]
    fn ring_handle_moves_along_axis() {
        let ring = flatten(&circle(1.0, Vec3::zeros(), 48));
        let mut filament = WasmFilament::build(&ring, 1.0, "rk4", "periodic").expect("filament");
        filament.advance_by(0.1).expect("step");
        filament.advance_by(0.1).expect("step");
        assert!((filament.time() - 0.2).abs() < 1e-12);
        let positions = filament.positions();
        assert!(positions[2] > 0.0);
        assert_eq!(filament.tangents().len(), positions.len());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let ring = flatten(&circle(1.0, Vec3::zeros(), 8));
        assert!(WasmFilament::build(&ring, 1.0, "tsit5", "frenet").is_err());
        assert!(WasmFilament::build(&ring, 1.0, "euler", "bishop").is_err());
        assert!(parse_integrator("euler").is_ok());
    }

    #[test]
    fn bad_time_step_leaves_state_untouched() {
        let ring = flatten(&circle(1.0, Vec3::zeros(), 16));
        let mut filament = WasmFilament::build(&ring, 1.0, "euler", "frenet").expect("filament");
        let before = filament.positions();
        assert!(filament.advance_by(-1.0).is_err());
        assert_eq!(filament.positions(), before);
        assert_eq!(filament.time(), 0.0);
    }
}
