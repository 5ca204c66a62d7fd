use hmc_core::{EnergyModel, PhaseState};
use serde::{Deserialize, Serialize};

/// Energy model that can also evaluate the Hamiltonian itself.
///
/// The integrator only needs gradients; energy values are used to measure
/// integration error and by outer accept/reject steps.
pub trait Hamiltonian: EnergyModel {
    /// Potential energy `U(θ)`.
    fn potential_energy(&self, position: &[f64]) -> f64;

    /// Kinetic energy `K(r)`.
    fn kinetic_energy(&self, momentum: &[f64]) -> f64;

    /// Total energy `H(θ, r) = U(θ) + K(r)`.
    fn energy(&self, state: &PhaseState) -> f64 {
        self.potential_energy(&state.position) + self.kinetic_energy(&state.momentum)
    }
}

/// Separable quadratic Hamiltonian with a diagonal precision and unit mass.
///
/// `U(θ) = ½ Σ pᵢ θᵢ²`, `K(r) = ½ Σ rᵢ²`. This is the energy of a
/// zero-mean Gaussian target with variances `1/pᵢ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalGaussian {
    precision: Vec<f64>,
}

impl DiagonalGaussian {
    /// Creates a model with per-coordinate precisions `precision`.
    pub fn new(precision: Vec<f64>) -> Self {
        Self { precision }
    }

    /// Standard normal target of dimension `dim`.
    pub fn standard(dim: usize) -> Self {
        Self::new(vec![1.0; dim])
    }

    /// Precision of each coordinate.
    pub fn precision(&self) -> &[f64] {
        &self.precision
    }

    /// Dimension of the model.
    pub fn dimension(&self) -> usize {
        self.precision.len()
    }
}

impl EnergyModel for DiagonalGaussian {
    fn grad_position(&self, position: &[f64]) -> Vec<f64> {
        position
            .iter()
            .zip(&self.precision)
            .map(|(q, p)| p * q)
            .collect()
    }

    fn grad_momentum(&self, momentum: &[f64]) -> Vec<f64> {
        momentum.to_vec()
    }
}

impl Hamiltonian for DiagonalGaussian {
    fn potential_energy(&self, position: &[f64]) -> f64 {
        0.5 * position
            .iter()
            .zip(&self.precision)
            .map(|(q, p)| p * q * q)
            .sum::<f64>()
    }

    fn kinetic_energy(&self, momentum: &[f64]) -> f64 {
        0.5 * momentum.iter().map(|r| r * r).sum::<f64>()
    }
}

/// One-dimensional harmonic oscillator `H = ½θ² + ½r²`.
pub fn harmonic_oscillator() -> DiagonalGaussian {
    DiagonalGaussian::standard(1)
}

/// Energy error `H(end) - H(start)` of a trajectory.
pub fn energy_error<H: Hamiltonian + ?Sized>(model: &H, start: &PhaseState, end: &PhaseState) -> f64 {
    model.energy(end) - model.energy(start)
}
