#![deny(missing_docs)]
#![doc = include_str!("../docs/integrator-api.md")]

//! Leapfrog trajectory integration and step-size adaptation for HMC samplers.

/// YAML configuration schema and defaults.
pub mod config;
/// Dual-averaging step-size adaptation.
pub mod dual_averaging;
/// Reference energy models and energy-error helpers.
pub mod energy;
/// Leapfrog integrator with divergence detection and rollback.
pub mod leapfrog;
/// Step-size adaptation contract and the fixed/manual adapters.
pub mod stepsize;

pub use config::{AdaptationConfig, IntegratorConfig, SamplerConfig, SamplerParts};
pub use dual_averaging::{DualAveraging, DualAveragingState};
pub use energy::{energy_error, harmonic_oscillator, DiagonalGaussian, Hamiltonian};
pub use leapfrog::{Leapfrog, LeapfrogOutcome};
pub use stepsize::{FixedStepSize, ManualStepSize, StepSizeAdaptation, StepSizeAdaptor};
