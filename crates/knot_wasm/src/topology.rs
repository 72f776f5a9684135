//! Writhe, twist, linking and crossing estimates over flat xyz arrays.

use crate::shared::{points_from_flat, to_js_error};
use anyhow::Result;
use knot_core::topology::{self, CrossingSettings};
use wasm_bindgen::prelude::*;

fn curve(flat: &[f64]) -> Result<Vec<knot_core::vector::Vec3>, JsValue> {
    points_from_flat(flat, "curve").map_err(|e| to_js_error("Invalid curve", e))
}

pub(crate) fn reconnection_pairs_inner(flat: &[f64], threshold: f64) -> Result<Vec<u32>> {
    let points = points_from_flat(flat, "curve")?;
    Ok(topology::reconnection_candidates(&points, threshold)
        .into_iter()
        .flat_map(|(i, j)| [i as u32, j as u32])
        .collect())
}

pub(crate) fn crossing_number_inner(flat: &[f64], directions: u32, seed: u32) -> Result<u32> {
    let points = points_from_flat(flat, "curve")?;
    let settings = CrossingSettings {
        directions: directions as usize,
        seed: seed as u64,
    };
    Ok(topology::estimate_crossing_number(&points, &settings)? as u32)
}

#[wasm_bindgen]
pub fn writhe(points: Vec<f64>) -> Result<f64, JsValue> {
    Ok(topology::writhe(&curve(&points)?))
}

#[wasm_bindgen]
pub fn writhe_gauss(positions: Vec<f64>, tangents: Vec<f64>) -> Result<f64, JsValue> {
    Ok(topology::writhe_gauss(&curve(&positions)?, &curve(&tangents)?))
}

#[wasm_bindgen]
pub fn linking_number(first: Vec<f64>, second: Vec<f64>) -> Result<i32, JsValue> {
    Ok(topology::linking_number(&curve(&first)?, &curve(&second)?) as i32)
}

#[wasm_bindgen]
pub fn twist(tangents: Vec<f64>, binormals: Vec<f64>) -> Result<f64, JsValue> {
    Ok(topology::twist(&curve(&tangents)?, &curve(&binormals)?))
}

#[wasm_bindgen]
pub fn centerline_helicity(points: Vec<f64>, tangents: Vec<f64>) -> Result<f64, JsValue> {
    Ok(topology::centerline_helicity(&curve(&points)?, &curve(&tangents)?))
}

/// Candidate pairs flattened as `[i0, j0, i1, j1, ...]`.
#[wasm_bindgen]
pub fn reconnection_candidates(points: Vec<f64>, threshold: f64) -> Result<Vec<u32>, JsValue> {
    reconnection_pairs_inner(&points, threshold)
        .map_err(|e| to_js_error("Reconnection scan failed", e))
}

#[wasm_bindgen]
pub fn estimate_crossing_number(
    points: Vec<f64>,
    directions: u32,
    seed: u32,
) -> Result<u32, JsValue> {
    crossing_number_inner(&points, directions, seed)
        .map_err(|e| to_js_error("Crossing estimate failed", e))
}
