//! Planar-diagram extraction for JS callers.

use crate::shared::{points_from_flat, to_js_error};
use anyhow::Result;
use knot_core::planar_diagram::{pd_from_curve as core_pd_from_curve, PdSettings, PlanarDiagram};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) fn pd_inner(curve: &[f64], settings: &PdSettings) -> Result<PlanarDiagram> {
    let points = points_from_flat(curve, "curve")?;
    Ok(core_pd_from_curve(&points, settings)?)
}

/// PD code as an array of `[a, b, c, d]` crossings.
#[wasm_bindgen]
pub fn pd_from_curve(
    curve: Vec<f64>,
    tries: u32,
    seed: u32,
    min_angle_deg: f64,
    depth_tol: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let settings = PdSettings {
        tries: tries as usize,
        seed: seed as u64,
        min_angle_deg,
        depth_tol,
    };
    let pd = pd_inner(&curve, &settings).map_err(|e| to_js_error("PD extraction failed", e))?;
    to_value(&pd).map_err(|e| to_js_error("Serialization error", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use knot_core::knots::trefoil;
    use knot_core::vector::flatten;
    use knot_core::KnotError;

    #[test]
    fn trefoil_curve_produces_diagram() {
        let pd = pd_inner(&flatten(&trefoil(300)), &PdSettings::default()).expect("pd");
        assert!(pd.len() >= 3);
    }

    #[test]
    fn core_errors_survive_conversion() {
        let err = pd_inner(&[0.0; 9], &PdSettings::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<KnotError>(),
            Some(&KnotError::TooFewPoints {
                required: 4,
                actual: 3
            })
        );
    }
}
