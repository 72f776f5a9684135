use thiserror::Error;

/// Failures callers of the topology and diagram routines are expected to
/// match on. Numerical degeneracies never surface here; they are skipped at
/// fixed epsilons inside the kernels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnotError {
    #[error("curve needs at least {required} points, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("no crossings detected (projection not generic)")]
    NoCrossings,

    #[error("label {label} appears {count} times; every label must appear exactly twice")]
    LabelDegree { label: usize, count: usize },

    #[error("failed to extract a planar diagram from any of {tries} projections")]
    NoValidDiagram { tries: usize },

    #[error("unknown knot '{0}'")]
    UnknownKnot(String),
}
