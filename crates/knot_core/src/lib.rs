/// The `knot_core` crate models closed vortex filaments as sampled space curves.
///
/// Key components:
/// - **Geometry**: vector helpers, Frenet frames, curvature and torsion of sampled curves.
/// - **Biot–Savart**: induced velocity at points and on periodic grids, grid
///   vorticity and field invariants.
/// - **Topology**: writhe, twist, linking number, reconnection candidates and
///   crossing-number estimates.
/// - **Planar diagrams**: PD codes extracted from random generic projections.
/// - **Evolution**: self-induced filament motion on top of the
///   `DynamicalSystem`/`Steppable` traits.
/// - **Sources**: parametric knots and Fourier-series centerlines.
pub mod biot_savart;
pub mod error;
pub mod evolution;
pub mod fourier;
pub mod geometry;
pub mod knots;
pub mod planar_diagram;
pub mod projection;
pub mod solvers;
pub mod topology;
pub mod traits;
pub mod vector;

pub use error::KnotError;
