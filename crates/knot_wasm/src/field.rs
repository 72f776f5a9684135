//! Biot–Savart velocity, grid vorticity and field invariants.

use crate::shared::{flat_from_points, points_from_flat, to_js_error};
use anyhow::{bail, Result};
use js_sys::Float64Array;
use knot_core::biot_savart::{self, FieldInvariants, GridShape};
use knot_core::vector::from_slice;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) fn velocity_at_point_inner(
    point: &[f64],
    positions: &[f64],
    tangents: &[f64],
    circulation: f64,
) -> Result<Vec<f64>> {
    if point.len() != 3 {
        bail!("Point must have exactly 3 components, got {}.", point.len());
    }
    let positions = points_from_flat(positions, "positions")?;
    let tangents = points_from_flat(tangents, "tangents")?;
    if tangents.len() != positions.len() {
        bail!(
            "Tangent count ({}) does not match point count ({}).",
            tangents.len(),
            positions.len()
        );
    }
    let r = from_slice(point);
    let v = biot_savart::velocity_at_point(&r, &positions, &tangents, circulation);
    Ok(vec![v.x, v.y, v.z])
}

pub(crate) fn velocity_on_grid_inner(curve: &[f64], grid_points: &[f64]) -> Result<Vec<f64>> {
    let curve = points_from_flat(curve, "curve")?;
    let grid = points_from_flat(grid_points, "grid points")?;
    Ok(flat_from_points(&biot_savart::velocity_on_grid(&curve, &grid)))
}

pub(crate) fn vorticity_on_grid_inner(
    velocity: &[f64],
    shape: GridShape,
    spacing: f64,
) -> Result<Vec<f64>> {
    let velocity = points_from_flat(velocity, "velocity")?;
    let vorticity = biot_savart::vorticity_on_grid(&velocity, shape, spacing)?;
    Ok(flat_from_points(&vorticity))
}

pub(crate) fn invariants_inner(
    velocity: &[f64],
    vorticity: &[f64],
    r_sq: &[f64],
) -> Result<FieldInvariants> {
    let v = points_from_flat(velocity, "velocity")?;
    let w = points_from_flat(vorticity, "vorticity")?;
    biot_savart::compute_invariants(&v, &w, r_sq)
}

/// Velocity at one point `[x, y, z]` induced by sampled filament vertices,
/// with one tangent per vertex.
#[wasm_bindgen]
pub fn velocity_at_point(
    point: Vec<f64>,
    positions: Vec<f64>,
    tangents: Vec<f64>,
    circulation: f64,
) -> Result<Vec<f64>, JsValue> {
    velocity_at_point_inner(&point, &positions, &tangents, circulation)
        .map_err(|e| to_js_error("Velocity evaluation failed", e))
}

/// Unit-circulation velocity of the closed polyline `curve` at every grid
/// point, as one flat xyz array.
#[wasm_bindgen]
pub fn velocity_on_grid(curve: Vec<f64>, grid_points: Vec<f64>) -> Result<Float64Array, JsValue> {
    let field = velocity_on_grid_inner(&curve, &grid_points)
        .map_err(|e| to_js_error("Grid velocity failed", e))?;
    Ok(Float64Array::from(field.as_slice()))
}

#[wasm_bindgen]
pub fn regular_grid(nx: u32, ny: u32, nz: u32, spacing: f64) -> Vec<f64> {
    let shape = GridShape::new(nx as usize, ny as usize, nz as usize);
    flat_from_points(&biot_savart::regular_grid(shape, spacing))
}

#[wasm_bindgen]
pub fn vorticity_on_grid(
    velocity: Vec<f64>,
    nx: u32,
    ny: u32,
    nz: u32,
    spacing: f64,
) -> Result<Vec<f64>, JsValue> {
    let shape = GridShape::new(nx as usize, ny as usize, nz as usize);
    vorticity_on_grid_inner(&velocity, shape, spacing)
        .map_err(|e| to_js_error("Vorticity failed", e))
}

/// Interior of a flat xyz grid field, dropping `margin` cells per face.
#[wasm_bindgen]
pub fn extract_interior(
    field: Vec<f64>,
    nx: u32,
    ny: u32,
    nz: u32,
    margin: u32,
) -> Result<Vec<f64>, JsValue> {
    let shape = GridShape::new(nx as usize, ny as usize, nz as usize);
    points_from_flat(&field, "field")
        .and_then(|f| biot_savart::extract_interior(&f, shape, margin as usize))
        .map(|f| flat_from_points(&f))
        .map_err(|e| to_js_error("Interior extraction failed", e))
}

/// `{ h_charge, h_mass, a_mu }` for matching velocity, vorticity and `r²`
/// samples.
#[wasm_bindgen]
pub fn compute_invariants(
    velocity: Vec<f64>,
    vorticity: Vec<f64>,
    r_sq: Vec<f64>,
) -> Result<JsValue, JsValue> {
    let invariants = invariants_inner(&velocity, &vorticity, &r_sq)
        .map_err(|e| to_js_error("Invariant computation failed", e))?;
    to_value(&invariants).map_err(|e| to_js_error("Serialization error", e))
}
