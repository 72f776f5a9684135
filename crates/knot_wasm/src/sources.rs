//! Curve generators and curve geometry exposed to JS.

use crate::shared::{flat_from_points, points_from_flat, to_js_error};
use anyhow::{bail, Result};
use knot_core::fourier::{self, knot_from_text, FourierSeries};
use knot_core::geometry::{self, DEFAULT_CURVATURE_EPS};
use knot_core::knots;
use knot_core::vector::Vec3;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct FramesPayload {
    tangents: Vec<f64>,
    normals: Vec<f64>,
    binormals: Vec<f64>,
}

#[derive(Serialize)]
struct CurvatureTorsionPayload {
    curvature: Vec<f64>,
    torsion: Vec<f64>,
}

#[derive(Serialize)]
struct KnotPayload {
    points: Vec<f64>,
    curvature: Vec<f64>,
}

#[derive(Serialize)]
struct SeriesPayload {
    positions: Vec<f64>,
    tangents: Vec<f64>,
}

pub(crate) fn series_inner(coeffs: &[f64], t: &[f64]) -> Result<FourierSeries> {
    if coeffs.len() % 6 != 0 {
        bail!("Coefficients must hold rows of 6 values, got {} values.", coeffs.len());
    }
    let rows: Vec<[f64; 6]> = coeffs
        .chunks_exact(6)
        .map(|c| [c[0], c[1], c[2], c[3], c[4], c[5]])
        .collect();
    Ok(fourier::evaluate_series(&rows, t))
}

#[wasm_bindgen]
pub fn trefoil(n: u32) -> Vec<f64> {
    flat_from_points(&knots::trefoil(n as usize))
}

#[wasm_bindgen]
pub fn figure_eight(n: u32) -> Vec<f64> {
    flat_from_points(&knots::figure_eight(n as usize))
}

#[wasm_bindgen]
pub fn circle(radius: f64, cx: f64, cy: f64, cz: f64, n: u32) -> Vec<f64> {
    flat_from_points(&knots::circle(radius, Vec3::new(cx, cy, cz), n as usize))
}

/// Largest block of a Fourier series text, centered, as
/// `{ points, curvature }`.
#[wasm_bindgen]
pub fn knot_from_fseries(text: &str, nsamples: u32) -> Result<JsValue, JsValue> {
    let (points, curvature) =
        knot_from_text(text, nsamples as usize).map_err(|e| to_js_error("Fourier knot failed", e))?;
    let payload = KnotPayload {
        points: flat_from_points(&points),
        curvature,
    };
    to_value(&payload).map_err(|e| to_js_error("Serialization error", e))
}

/// Positions and analytic `dr/dt` of the series with flat coefficient rows
/// `[a_x, b_x, a_y, b_y, a_z, b_z]` (row `n` is harmonic `n`) at parameters
/// `t`, as `{ positions, tangents }`. The tangents are the ones `writhe_gauss`
/// expects.
#[wasm_bindgen]
pub fn evaluate_series(coeffs: Vec<f64>, t: Vec<f64>) -> Result<JsValue, JsValue> {
    let series =
        series_inner(&coeffs, &t).map_err(|e| to_js_error("Series evaluation failed", e))?;
    let payload = SeriesPayload {
        positions: flat_from_points(&series.positions),
        tangents: flat_from_points(&series.tangents),
    };
    to_value(&payload).map_err(|e| to_js_error("Serialization error", e))
}

#[wasm_bindgen]
pub fn frenet_frames(points: Vec<f64>) -> Result<JsValue, JsValue> {
    let points = points_from_flat(&points, "points").map_err(|e| to_js_error("Invalid curve", e))?;
    let frames = geometry::frenet_frames(&points);
    let payload = FramesPayload {
        tangents: flat_from_points(&frames.tangents),
        normals: flat_from_points(&frames.normals),
        binormals: flat_from_points(&frames.binormals),
    };
    to_value(&payload).map_err(|e| to_js_error("Serialization error", e))
}

#[wasm_bindgen]
pub fn curvature_torsion(tangents: Vec<f64>, normals: Vec<f64>) -> Result<JsValue, JsValue> {
    let tangents =
        points_from_flat(&tangents, "tangents").map_err(|e| to_js_error("Invalid frame", e))?;
    let normals =
        points_from_flat(&normals, "normals").map_err(|e| to_js_error("Invalid frame", e))?;
    let kt = geometry::curvature_torsion(&tangents, &normals);
    let payload = CurvatureTorsionPayload {
        curvature: kt.curvature,
        torsion: kt.torsion,
    };
    to_value(&payload).map_err(|e| to_js_error("Serialization error", e))
}

/// Periodic point curvature; a non-positive or missing `eps` falls back to
/// the library default.
#[wasm_bindgen]
pub fn curvature_from_points(points: Vec<f64>, eps: Option<f64>) -> Result<Vec<f64>, JsValue> {
    let points = points_from_flat(&points, "points").map_err(|e| to_js_error("Invalid curve", e))?;
    let eps = eps.filter(|e| *e > 0.0).unwrap_or(DEFAULT_CURVATURE_EPS);
    Ok(geometry::curvature_from_points(&points, eps))
}

#[wasm_bindgen]
pub fn center_points(points: Vec<f64>) -> Result<Vec<f64>, JsValue> {
    let points = points_from_flat(&points, "points").map_err(|e| to_js_error("Invalid curve", e))?;
    Ok(flat_from_points(&geometry::center_points(&points)))
}
