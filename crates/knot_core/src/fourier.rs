//! Knot centerlines given as truncated Fourier series.
//!
//! The text format holds one or more coefficient blocks. Each data line
//! carries six reals `a_x b_x a_y b_y a_z b_z` for the next harmonic, a line
//! starting with `%` opens a new block and names it, and a blank line closes
//! the current block.

use crate::error::KnotError;
use crate::geometry::{center_points, curvature_from_points, DEFAULT_CURVATURE_EPS};
use crate::vector::Vec3;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use tracing::debug;

/// Coefficients of one curve; entry `k` of each vector is harmonic `k + 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FourierBlock {
    pub header: String,
    pub a_x: Vec<f64>,
    pub b_x: Vec<f64>,
    pub a_y: Vec<f64>,
    pub b_y: Vec<f64>,
    pub a_z: Vec<f64>,
    pub b_z: Vec<f64>,
}

impl FourierBlock {
    /// Number of harmonics.
    pub fn len(&self) -> usize {
        self.a_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a_x.is_empty()
    }

    fn push(&mut self, c: [f64; 6]) {
        self.a_x.push(c[0]);
        self.b_x.push(c[1]);
        self.a_y.push(c[2]);
        self.b_y.push(c[3]);
        self.a_z.push(c[4]);
        self.b_z.push(c[5]);
    }
}

/// First six whitespace-separated reals of `line`; trailing tokens are
/// ignored.
fn parse_coefficients(line: &str) -> Option<[f64; 6]> {
    let mut tokens = line.split_whitespace();
    let mut c = [0.0; 6];
    for slot in &mut c {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(c)
}

/// Splits `text` into coefficient blocks.
///
/// A `%` line closes the block in progress and sets the header of the next
/// one (leading whitespace trimmed). Blank lines close the block in
/// progress; a closed block's successor starts with an empty header. Blocks
/// without any data line are dropped, as are lines that do not start with six
/// reals.
pub fn parse_fseries(text: &str) -> Vec<FourierBlock> {
    let mut blocks = Vec::new();
    let mut current = FourierBlock::default();
    let mut skipped = 0usize;

    let flush = |current: &mut FourierBlock, blocks: &mut Vec<FourierBlock>| {
        if !current.is_empty() {
            blocks.push(std::mem::take(current));
        }
    };

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            flush(&mut current, &mut blocks);
            continue;
        }
        if let Some(header) = line.strip_prefix('%') {
            flush(&mut current, &mut blocks);
            current.header = header.trim_start().to_string();
            continue;
        }
        match parse_coefficients(line) {
            Some(c) => current.push(c),
            None => skipped += 1,
        }
    }
    flush(&mut current, &mut blocks);

    debug!(blocks = blocks.len(), skipped, "parsed Fourier series");
    blocks
}

/// Index of the block with the most harmonics; the first one wins ties.
pub fn index_of_largest_block(blocks: &[FourierBlock]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, block) in blocks.iter().enumerate() {
        if best.is_none_or(|(_, n)| block.len() > n) {
            best = Some((i, block.len()));
        }
    }
    best.map(|(i, _)| i)
}

/// `r(s) = Σ_k a_k cos(k s) + b_k sin(k s)` per axis, harmonics `k ≥ 1`.
pub fn evaluate(block: &FourierBlock, s: &[f64]) -> Vec<Vec3> {
    s.iter()
        .map(|&si| {
            let mut r = Vec3::zeros();
            for j in 0..block.len() {
                let k = (j + 1) as f64;
                let (sn, cn) = (k * si).sin_cos();
                r.x += block.a_x[j] * cn + block.b_x[j] * sn;
                r.y += block.a_y[j] * cn + block.b_y[j] * sn;
                r.z += block.a_z[j] * cn + block.b_z[j] * sn;
            }
            r
        })
        .collect()
}

/// Positions and analytic parameter derivatives of a series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FourierSeries {
    pub positions: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

/// Evaluates rows `[a_x, b_x, a_y, b_y, a_z, b_z]` where row `n` is harmonic
/// `n`, so row 0 is the constant offset. Tangents are `dr/dt`.
pub fn evaluate_series(coeffs: &[[f64; 6]], t: &[f64]) -> FourierSeries {
    let mut positions = Vec::with_capacity(t.len());
    let mut tangents = Vec::with_capacity(t.len());
    for &ti in t {
        let mut r = Vec3::zeros();
        let mut r_t = Vec3::zeros();
        for (n, c) in coeffs.iter().enumerate() {
            let nf = n as f64;
            let (sn, cn) = (nf * ti).sin_cos();
            r += Vec3::new(c[0] * cn + c[1] * sn, c[2] * cn + c[3] * sn, c[4] * cn + c[5] * sn);
            if n > 0 {
                r_t += Vec3::new(
                    nf * (-c[0] * sn + c[1] * cn),
                    nf * (-c[2] * sn + c[3] * cn),
                    nf * (-c[4] * sn + c[5] * cn),
                );
            }
        }
        positions.push(r);
        tangents.push(r_t);
    }
    FourierSeries { positions, tangents }
}

/// `n` uniform parameters `2π i / n`; the closing point is not repeated.
pub fn sample_parameters(n: usize) -> Vec<f64> {
    (0..n).map(|i| TAU * i as f64 / n as f64).collect()
}

/// Evaluates the largest block of `text` on `nsamples` parameters and
/// returns the centered points with their curvature.
pub fn knot_from_text(text: &str, nsamples: usize) -> Result<(Vec<Vec3>, Vec<f64>)> {
    let blocks = parse_fseries(text);
    let Some(idx) = index_of_largest_block(&blocks) else {
        bail!("Fourier series text contains no coefficient blocks.");
    };
    let points = center_points(&evaluate(&blocks[idx], &sample_parameters(nsamples)));
    let curvature = curvature_from_points(&points, DEFAULT_CURVATURE_EPS);
    Ok((points, curvature))
}

/// Read-only map from knot names to Fourier series text.
///
/// Nothing is registered implicitly; callers insert the files they ship.
#[derive(Debug, Clone, Default)]
pub struct KnotRegistry {
    entries: BTreeMap<String, String>,
}

impl KnotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `text` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), text.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Looks up `name` and evaluates it like [`knot_from_text`].
pub fn load_knot(
    registry: &KnotRegistry,
    name: &str,
    nsamples: usize,
) -> Result<(Vec<Vec3>, Vec<f64>)> {
    let text = registry
        .get(name)
        .ok_or_else(|| KnotError::UnknownKnot(name.to_string()))?;
    knot_from_text(text, nsamples)
}
