//! Position/momentum pairs advanced by the integrator.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::errors::HmcError;

/// Phase-space point `(θ, r)` of a single trajectory.
///
/// Both vectors share the same dimension for the lifetime of the trajectory.
/// The state is owned by the caller; the integrator consumes a borrowed state
/// and hands back a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    /// Position θ.
    pub position: Vec<f64>,
    /// Momentum r.
    pub momentum: Vec<f64>,
}

impl PhaseState {
    /// Pairs a position with a momentum of the same length.
    pub fn new(position: Vec<f64>, momentum: Vec<f64>) -> Result<Self, HmcError> {
        if position.len() != momentum.len() {
            return Err(HmcError::dimension_mismatch(
                "momentum",
                position.len(),
                momentum.len(),
            ));
        }
        Ok(Self { position, momentum })
    }

    /// Starts a trajectory at `position` with momentum drawn from `N(0, I)`.
    pub fn with_standard_momentum<R: Rng + ?Sized>(position: Vec<f64>, rng: &mut R) -> Self {
        let momentum = (0..position.len())
            .map(|_| -> f64 { StandardNormal.sample(rng) })
            .collect();
        Self { position, momentum }
    }

    /// Dimension `D` shared by position and momentum.
    pub fn dimension(&self) -> usize {
        self.position.len()
    }
}
