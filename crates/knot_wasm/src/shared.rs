//! Conversions between flat JS arrays and core types.

use anyhow::{bail, Result};
use knot_core::vector::{flatten, unflatten, Vec3};
use wasm_bindgen::prelude::*;

/// Reads `x0, y0, z0, x1, ...` into points.
pub(crate) fn points_from_flat(flat: &[f64], what: &str) -> Result<Vec<Vec3>> {
    if flat.len() % 3 != 0 {
        bail!(
            "{} must hold xyz triples, got {} values.",
            what,
            flat.len()
        );
    }
    Ok(unflatten(flat))
}

pub(crate) fn flat_from_points(points: &[Vec3]) -> Vec<f64> {
    flatten(points)
}

pub(crate) fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}
