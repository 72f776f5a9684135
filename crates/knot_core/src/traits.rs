use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Floating-point types the integrators can work in.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// An autonomous or time-dependent flow `dx/dt = f(t, x)` over a flat state.
pub trait DynamicalSystem<T: Scalar> {
    /// Length of the flat state vector.
    fn dimension(&self) -> usize;

    /// Writes `f(t, x)` into `out`, which has the same length as `x`.
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A fixed-step integrator.
pub trait Steppable<T: Scalar> {
    /// Advances `state` from `t` to `t + dt` in place and updates `t`.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}
