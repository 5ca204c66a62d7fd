use hmc_core::errors::ErrorInfo;
use hmc_core::{EnergyModel, HmcError, PhaseState, Termination};
use serde::{Deserialize, Serialize};

/// Leapfrog (Störmer–Verlet) integrator configuration.
///
/// Holds the step size `ϵ`. Its magnitude sets the discretisation; the sign
/// applied during integration is decided by the direction of each call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leapfrog {
    step_size: f64,
}

/// Result of one [`Leapfrog::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapfrogOutcome {
    /// Last committed phase state. Always finite.
    pub state: PhaseState,
    /// `false` when the trajectory diverged before completing every step.
    pub success: bool,
    /// Number of full leapfrog iterations committed into `state`.
    pub committed_steps: usize,
}

impl Leapfrog {
    /// Creates an integrator with step size `step_size`.
    pub fn new(step_size: f64) -> Self {
        Self { step_size }
    }

    /// Step size `ϵ` used by this configuration.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns a copy of this configuration using `step_size` instead.
    pub fn with_step_size(&self, step_size: f64) -> Self {
        Self { step_size }
    }

    /// Advances `state` by `n_steps` leapfrog iterations.
    ///
    /// A negative `n_steps` integrates backward in time with `-ϵ`. Internal
    /// momentum half steps are merged into full kicks; the last iteration
    /// closes with a half kick.
    ///
    /// Numerical divergence never produces an error. Integration stops at the
    /// first non-finite vector, and the last committed state is returned with
    /// `success == false`. When the divergence happens strictly between the
    /// first and the last iteration, the leading half kick merged into the
    /// last committed momentum is undone so that the returned state matches a
    /// complete trajectory of `committed_steps` iterations.
    ///
    /// # Errors
    ///
    /// [`HmcError::Integrator`] for `n_steps == 0` or a step count that does
    /// not fit in `usize`, [`HmcError::Dimension`]
    /// when the state or a gradient has inconsistent length.
    pub fn step<M>(
        &self,
        model: &M,
        state: &PhaseState,
        n_steps: i64,
    ) -> Result<LeapfrogOutcome, HmcError>
    where
        M: EnergyModel + ?Sized,
    {
        if n_steps == 0 {
            return Err(HmcError::Integrator(
                ErrorInfo::new("zero-steps", "leapfrog requires a non-zero step count")
                    .with_hint("use a positive count to integrate forward, negative for backward"),
            ));
        }
        if state.position.len() != state.momentum.len() {
            return Err(HmcError::dimension_mismatch(
                "momentum",
                state.position.len(),
                state.momentum.len(),
            ));
        }

        let total = step_count(n_steps)?;
        let eps = if n_steps > 0 {
            self.step_size
        } else {
            -self.step_size
        };

        let mut position = state.position.clone();
        let mut committed = 0usize;

        // Between iterations this holds the committed momentum with the next
        // leading half kick already merged in.
        let (mut drift_momentum, mut termination) = momentum_update(
            model,
            &position,
            &state.momentum,
            0.5 * eps,
            Termination::CONTINUE,
        )?;

        for iteration in 1..=total {
            let (position_next, t) =
                position_update(model, &position, &drift_momentum, eps, termination)?;
            termination = termination.combine(t);

            let kick = if iteration == total { 0.5 * eps } else { eps };
            let (momentum_next, t) =
                momentum_update(model, &position_next, &drift_momentum, kick, termination)?;
            termination = termination.combine(t);

            if termination.is_terminated() {
                let rollback = iteration > 1 && iteration < total;
                if rollback {
                    // Undo the leading half kick merged into the committed momentum.
                    let (restored, _) = momentum_update(
                        model,
                        &position,
                        &drift_momentum,
                        -0.5 * eps,
                        Termination::CONTINUE,
                    )?;
                    drift_momentum = restored;
                }
                log::debug!(
                    "leapfrog diverged at iteration {iteration}/{total} (step size {eps}, rollback: {rollback})"
                );
                break;
            }

            position = position_next;
            drift_momentum = momentum_next;
            committed = iteration;
        }

        let momentum = if committed == 0 {
            state.momentum.clone()
        } else {
            drift_momentum
        };

        Ok(LeapfrogOutcome {
            state: PhaseState { position, momentum },
            success: !termination.is_terminated(),
            committed_steps: committed,
        })
    }
}

/// Converts a signed step count into the number of iterations to run.
fn step_count(n_steps: i64) -> Result<usize, HmcError> {
    usize::try_from(n_steps.unsigned_abs()).map_err(|_| {
        HmcError::Integrator(
            ErrorInfo::new(
                "step-count-overflow",
                "step count does not fit the platform's address width",
            )
            .with_context("n_steps", n_steps.to_string()),
        )
    })
}

/// Momentum update `r' = r - s·∂H/∂θ(θ)`, skipped once `termination` is set.
pub fn momentum_update<M>(
    model: &M,
    position: &[f64],
    momentum: &[f64],
    fraction: f64,
    termination: Termination,
) -> Result<(Vec<f64>, Termination), HmcError>
where
    M: EnergyModel + ?Sized,
{
    if termination.is_terminated() {
        return Ok((momentum.to_vec(), termination));
    }
    let gradient = model.grad_position(position);
    if gradient.len() != momentum.len() {
        return Err(HmcError::dimension_mismatch(
            "position gradient",
            momentum.len(),
            gradient.len(),
        ));
    }
    let updated: Vec<f64> = momentum
        .iter()
        .zip(&gradient)
        .map(|(r, g)| r - fraction * g)
        .collect();
    let termination = termination.combine(Termination::from_vector(&updated));
    Ok((updated, termination))
}

/// Position update `θ' = θ + s·∂H/∂r(r)`, skipped once `termination` is set.
pub fn position_update<M>(
    model: &M,
    position: &[f64],
    momentum: &[f64],
    fraction: f64,
    termination: Termination,
) -> Result<(Vec<f64>, Termination), HmcError>
where
    M: EnergyModel + ?Sized,
{
    if termination.is_terminated() {
        return Ok((position.to_vec(), termination));
    }
    let gradient = model.grad_momentum(momentum);
    if gradient.len() != position.len() {
        return Err(HmcError::dimension_mismatch(
            "momentum gradient",
            position.len(),
            gradient.len(),
        ));
    }
    let updated: Vec<f64> = position
        .iter()
        .zip(&gradient)
        .map(|(q, g)| q + fraction * g)
        .collect();
    let termination = termination.combine(Termination::from_vector(&updated));
    Ok((updated, termination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_is_the_magnitude() {
        assert_eq!(step_count(7).unwrap(), 7);
        assert_eq!(step_count(-7).unwrap(), 7);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn extreme_step_counts_fit_on_64_bit() {
        assert_eq!(step_count(i64::MAX).unwrap(), i64::MAX as usize);
        assert_eq!(step_count(i64::MIN).unwrap(), 1usize << 63);
    }

    #[cfg(not(target_pointer_width = "64"))]
    #[test]
    fn oversized_step_counts_are_rejected() {
        let err = step_count(i64::MIN).unwrap_err();
        assert!(matches!(err, HmcError::Integrator(_)));
        assert_eq!(err.info().code, "step-count-overflow");
        assert_eq!(err.info().context["n_steps"], i64::MIN.to_string());
    }
}
