//! Nesterov dual averaging of the log step size (Hoffman & Gelman 2014).

use serde::{Deserialize, Serialize};

use crate::stepsize::StepSizeAdaptation;

/// Default shrinkage rate `γ`.
pub const DEFAULT_GAMMA: f64 = 0.05;
/// Default stabilisation offset `t₀`.
pub const DEFAULT_T0: f64 = 10.0;
/// Default forgetting exponent `κ`.
pub const DEFAULT_KAPPA: f64 = 0.75;

/// Mutable recursion state of a [`DualAveraging`] adapter.
///
/// `step_size` is finite and strictly positive after every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAveragingState {
    /// Number of acceptance samples consumed since the last reset.
    pub iteration: u64,
    /// Current step size `ϵ`.
    pub step_size: f64,
    /// Shrinkage target `μ = log(10·ϵ₀)`.
    pub mu: f64,
    /// Running average of the log step size.
    pub x_bar: f64,
    /// Running average of the acceptance error `δ - α`.
    pub h_bar: f64,
}

impl DualAveragingState {
    /// Fresh state centred on `step_size`.
    pub fn new(step_size: f64) -> Self {
        Self {
            iteration: 0,
            step_size,
            mu: shrinkage_target(step_size),
            x_bar: 0.0,
            h_bar: 0.0,
        }
    }
}

fn shrinkage_target(step_size: f64) -> f64 {
    (10.0 * step_size).ln()
}

/// Dual-averaging step-size adapter.
///
/// Tunes `ϵ` so that the average acceptance probability approaches
/// `target_accept`. Updates require exclusive access; adapters shared
/// between chains must serialise their calls to [`DualAveraging::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAveraging {
    gamma: f64,
    t0: f64,
    kappa: f64,
    target_accept: f64,
    state: DualAveragingState,
}

impl DualAveraging {
    /// Adapter targeting `target_accept` with the default `γ`, `t₀` and `κ`.
    pub fn new(target_accept: f64, initial_step_size: f64) -> Self {
        Self::with_hyperparameters(
            DEFAULT_GAMMA,
            DEFAULT_T0,
            DEFAULT_KAPPA,
            target_accept,
            initial_step_size,
        )
    }

    /// Adapter with explicit hyperparameters.
    pub fn with_hyperparameters(
        gamma: f64,
        t0: f64,
        kappa: f64,
        target_accept: f64,
        initial_step_size: f64,
    ) -> Self {
        Self {
            gamma,
            t0,
            kappa,
            target_accept,
            state: DualAveragingState::new(initial_step_size),
        }
    }

    /// Shrinkage rate `γ`.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Stabilisation offset `t₀`.
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// Forgetting exponent `κ`.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Target acceptance probability `δ`.
    pub fn target_accept(&self) -> f64 {
        self.target_accept
    }

    /// Read-only view of the recursion state.
    pub fn state(&self) -> &DualAveragingState {
        &self.state
    }

    /// Current step size `ϵ`.
    pub fn step_size(&self) -> f64 {
        self.state.step_size
    }

    /// Consumes one acceptance probability `acceptance`.
    ///
    /// Values above one are clipped to one. If the updated step size would be
    /// NaN, infinite or zero, the new `ϵ`, `x_bar` and `H_bar` are discarded
    /// and a warning is logged; the iteration counter still advances.
    pub fn update(&mut self, acceptance: f64) {
        // NaN must reach the guard below, so no f64::min here.
        let alpha = if acceptance > 1.0 { 1.0 } else { acceptance };

        let state = &mut self.state;
        state.iteration += 1;
        let m = state.iteration as f64;

        let eta_h = 1.0 / (m + self.t0);
        let h_bar = (1.0 - eta_h) * state.h_bar + eta_h * (self.target_accept - alpha);
        let x = state.mu - (m.sqrt() / self.gamma) * h_bar;
        let eta_x = m.powf(-self.kappa);
        let x_bar = (1.0 - eta_x) * state.x_bar + eta_x * x;
        let step_size = x.exp();

        if !step_size.is_finite() || step_size <= 0.0 {
            log::warn!(
                "dual averaging produced invalid step size {step_size} at iteration {} (acceptance {acceptance}); keeping {}",
                state.iteration,
                state.step_size
            );
            return;
        }

        state.step_size = step_size;
        state.x_bar = x_bar;
        state.h_bar = h_bar;
    }

    /// Restarts the recursion around the current step size.
    ///
    /// The iteration counter and both running averages return to zero and
    /// `μ` is recomputed as `log(10·ϵ)` from this adapter's own `ϵ`.
    pub fn reset(&mut self) {
        let state = &mut self.state;
        state.iteration = 0;
        state.x_bar = 0.0;
        state.h_bar = 0.0;
        state.mu = shrinkage_target(state.step_size);
    }

    /// Smoothed step size `exp(x_bar)` recommended once warmup ends.
    ///
    /// Returns `None` before the first update or when the average is not
    /// representable as a positive finite step size.
    pub fn adapted_step_size(&self) -> Option<f64> {
        if self.state.iteration == 0 {
            return None;
        }
        let step_size = self.state.x_bar.exp();
        (step_size.is_finite() && step_size > 0.0).then_some(step_size)
    }

    /// Freezes `ϵ` at the smoothed value [`DualAveraging::adapted_step_size`].
    ///
    /// Leaves the step size untouched when no smoothed value is available.
    pub fn finalize(&mut self) {
        if let Some(step_size) = self.adapted_step_size() {
            self.state.step_size = step_size;
        }
    }
}

impl StepSizeAdaptation for DualAveraging {
    fn current_step_size(&self) -> f64 {
        self.step_size()
    }

    fn consume_acceptance(&mut self, _position: &[f64], acceptance: f64) {
        self.update(acceptance);
    }
}
