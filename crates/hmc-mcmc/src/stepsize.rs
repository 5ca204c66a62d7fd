use serde::{Deserialize, Serialize};

use crate::dual_averaging::DualAveraging;

/// Step-size control consumed by an outer sampler.
///
/// Each sampling iteration the sampler reads [`current_step_size`], runs a
/// trajectory and reports the observed acceptance probability through
/// [`consume_acceptance`]. Freezing adaptation after warmup is the caller's
/// decision: it simply stops calling `consume_acceptance`.
///
/// [`current_step_size`]: StepSizeAdaptation::current_step_size
/// [`consume_acceptance`]: StepSizeAdaptation::consume_acceptance
pub trait StepSizeAdaptation {
    /// Step size to use for the next trajectory.
    fn current_step_size(&self) -> f64;

    /// Feeds back one acceptance probability.
    ///
    /// `position` is the sample the statistic was observed at. Step-size-only
    /// adapters ignore it.
    fn consume_acceptance(&mut self, position: &[f64], acceptance: f64);
}

/// Constant step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStepSize {
    step_size: f64,
}

impl FixedStepSize {
    /// Creates a constant step size.
    pub fn new(step_size: f64) -> Self {
        Self { step_size }
    }
}

impl StepSizeAdaptation for FixedStepSize {
    fn current_step_size(&self) -> f64 {
        self.step_size
    }

    fn consume_acceptance(&mut self, _position: &[f64], _acceptance: f64) {}
}

/// Step size set directly by the caller between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualStepSize {
    /// Step size returned by [`StepSizeAdaptation::current_step_size`].
    pub step_size: f64,
}

impl ManualStepSize {
    /// Creates a manually controlled step size.
    pub fn new(step_size: f64) -> Self {
        Self { step_size }
    }

    /// Overrides the step size used from the next trajectory on.
    pub fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
    }
}

impl StepSizeAdaptation for ManualStepSize {
    fn current_step_size(&self) -> f64 {
        self.step_size
    }

    fn consume_acceptance(&mut self, _position: &[f64], _acceptance: f64) {}
}

/// Closed set of step-size adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StepSizeAdaptor {
    /// See [`FixedStepSize`].
    Fixed(FixedStepSize),
    /// See [`ManualStepSize`].
    Manual(ManualStepSize),
    /// See [`DualAveraging`].
    DualAveraging(DualAveraging),
}

impl StepSizeAdaptation for StepSizeAdaptor {
    fn current_step_size(&self) -> f64 {
        match self {
            StepSizeAdaptor::Fixed(inner) => inner.current_step_size(),
            StepSizeAdaptor::Manual(inner) => inner.current_step_size(),
            StepSizeAdaptor::DualAveraging(inner) => inner.current_step_size(),
        }
    }

    fn consume_acceptance(&mut self, position: &[f64], acceptance: f64) {
        match self {
            StepSizeAdaptor::Fixed(inner) => inner.consume_acceptance(position, acceptance),
            StepSizeAdaptor::Manual(inner) => inner.consume_acceptance(position, acceptance),
            StepSizeAdaptor::DualAveraging(inner) => {
                inner.consume_acceptance(position, acceptance)
            }
        }
    }
}

impl From<FixedStepSize> for StepSizeAdaptor {
    fn from(inner: FixedStepSize) -> Self {
        StepSizeAdaptor::Fixed(inner)
    }
}

impl From<ManualStepSize> for StepSizeAdaptor {
    fn from(inner: ManualStepSize) -> Self {
        StepSizeAdaptor::Manual(inner)
    }
}

impl From<DualAveraging> for StepSizeAdaptor {
    fn from(inner: DualAveraging) -> Self {
        StepSizeAdaptor::DualAveraging(inner)
    }
}
