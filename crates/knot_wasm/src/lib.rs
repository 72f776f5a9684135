//! WASM bindings for `knot_core`. Curves cross the boundary as flat
//! `[x0, y0, z0, x1, ...]` arrays; structured results go through
//! `serde-wasm-bindgen`.

mod diagram;
mod field;
mod filament;
mod shared;
mod sources;
mod topology;

pub use diagram::pd_from_curve;
pub use field::{
    compute_invariants, extract_interior, regular_grid, velocity_at_point, velocity_on_grid,
    vorticity_on_grid,
};
pub use filament::WasmFilament;
pub use sources::{
    center_points, circle, curvature_from_points, curvature_torsion, evaluate_series, figure_eight,
    frenet_frames, knot_from_fseries, trefoil,
};
pub use topology::{
    centerline_helicity, estimate_crossing_number, linking_number, reconnection_candidates, twist,
    writhe, writhe_gauss,
};
