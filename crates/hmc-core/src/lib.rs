#![deny(missing_docs)]
#![doc = "Core traits and data types for Hamiltonian trajectory integration: errors, seeding, phase states and the energy-model contract."]

pub mod errors;
pub mod phase;
pub mod rng;
pub mod validity;

pub use errors::{ErrorInfo, HmcError};
pub use phase::PhaseState;
pub use rng::{chain_seed, derive_substream_seed, RngHandle};
pub use validity::{is_valid, Termination};

/// Gradient oracle of a separable Hamiltonian `H(θ, r)`.
///
/// Implementations are consumed, never owned, by the integrator. Either
/// gradient may contain NaN or infinite components to signal that the
/// trajectory left the numerically valid region (for example the boundary
/// of a constrained parameter space). This is an expected condition and is
/// reported through the integrator's success flag.
///
/// Returned vectors must have the same length as the input vector.
pub trait EnergyModel {
    /// Gradient `∂H/∂θ` evaluated at `position`.
    fn grad_position(&self, position: &[f64]) -> Vec<f64>;

    /// Gradient `∂H/∂r` evaluated at `momentum`.
    fn grad_momentum(&self, momentum: &[f64]) -> Vec<f64>;
}
