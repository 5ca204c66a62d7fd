use hmc_core::errors::ErrorInfo;
use hmc_core::HmcError;
use serde::{Deserialize, Serialize};

use crate::dual_averaging::{DualAveraging, DEFAULT_GAMMA, DEFAULT_KAPPA, DEFAULT_T0};
use crate::leapfrog::Leapfrog;
use crate::stepsize::{FixedStepSize, ManualStepSize, StepSizeAdaptation, StepSizeAdaptor};

/// YAML-configurable integrator and adaptation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Leapfrog settings.
    #[serde(default)]
    pub integrator: IntegratorConfig,
    /// Step-size adaptation strategy.
    #[serde(default)]
    pub adaptation: AdaptationConfig,
}

impl SamplerConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, HmcError> {
        let config: SamplerConfig = serde_yaml::from_str(yaml).map_err(|err| {
            HmcError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, HmcError> {
        serde_yaml::to_string(self)
            .map_err(|err| HmcError::Serde(ErrorInfo::new("config-serialize", err.to_string())))
    }

    /// Checks every section for values the sampler cannot use.
    pub fn validate(&self) -> Result<(), HmcError> {
        self.integrator.validate()?;
        self.adaptation.validate()
    }

    /// Builds the adaptor, a leapfrog configuration at its initial step size,
    /// and the per-trajectory step count.
    pub fn build(&self) -> Result<SamplerParts, HmcError> {
        self.integrator.validate()?;
        let adaptor = self.adaptation.build()?;
        let leapfrog = Leapfrog::new(adaptor.current_step_size());
        Ok(SamplerParts {
            leapfrog,
            adaptor,
            n_steps: self.integrator.n_steps,
        })
    }
}

/// Components produced by [`SamplerConfig::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerParts {
    /// Integrator at the adaptor's initial step size.
    pub leapfrog: Leapfrog,
    /// Step-size strategy.
    pub adaptor: StepSizeAdaptor,
    /// Signed step count to pass to [`Leapfrog::step`].
    pub n_steps: i64,
}

/// Leapfrog trajectory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Leapfrog iterations per trajectory; negative integrates backward.
    #[serde(default = "default_n_steps")]
    pub n_steps: i64,
}

fn default_step_size() -> f64 {
    0.1
}

fn default_n_steps() -> i64 {
    10
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
        }
    }
}

impl IntegratorConfig {
    fn validate(&self) -> Result<(), HmcError> {
        if self.n_steps == 0 {
            return Err(HmcError::Config(
                ErrorInfo::new("zero-steps", "integrator.n_steps must be non-zero")
                    .with_context("n_steps", "0"),
            ));
        }
        Ok(())
    }
}

/// Supported step-size strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdaptationConfig {
    /// Constant step size.
    Fixed {
        /// Step size used for every trajectory.
        step_size: f64,
    },
    /// Step size controlled by the caller.
    Manual {
        /// Initial step size.
        step_size: f64,
    },
    /// Dual averaging toward `target_accept`.
    DualAveraging {
        /// Target acceptance probability `δ`.
        #[serde(default = "default_target_accept")]
        target_accept: f64,
        /// Initial step size `ϵ₀`.
        #[serde(default = "default_step_size")]
        initial_step_size: f64,
        /// Shrinkage rate `γ`.
        #[serde(default = "default_gamma")]
        gamma: f64,
        /// Stabilisation offset `t₀`.
        #[serde(default = "default_t0")]
        t0: f64,
        /// Forgetting exponent `κ`.
        #[serde(default = "default_kappa")]
        kappa: f64,
    },
}

fn default_target_accept() -> f64 {
    0.8
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_t0() -> f64 {
    DEFAULT_T0
}

fn default_kappa() -> f64 {
    DEFAULT_KAPPA
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        AdaptationConfig::DualAveraging {
            target_accept: default_target_accept(),
            initial_step_size: default_step_size(),
            gamma: default_gamma(),
            t0: default_t0(),
            kappa: default_kappa(),
        }
    }
}

impl AdaptationConfig {
    /// Rejects non-positive step sizes and out-of-range hyperparameters.
    pub fn validate(&self) -> Result<(), HmcError> {
        match self {
            AdaptationConfig::Fixed { step_size } | AdaptationConfig::Manual { step_size } => {
                ensure_step_size("adaptation.step_size", *step_size)
            }
            AdaptationConfig::DualAveraging {
                target_accept,
                initial_step_size,
                gamma,
                t0,
                kappa,
            } => {
                ensure_step_size("adaptation.initial_step_size", *initial_step_size)?;
                ensure_range("adaptation.target_accept", *target_accept, |v| {
                    v > 0.0 && v < 1.0
                })?;
                ensure_range("adaptation.gamma", *gamma, |v| v > 0.0)?;
                ensure_range("adaptation.t0", *t0, |v| v >= 0.0)?;
                ensure_range("adaptation.kappa", *kappa, |v| v > 0.0 && v <= 1.0)
            }
        }
    }

    /// Builds the adaptor described by this configuration.
    pub fn build(&self) -> Result<StepSizeAdaptor, HmcError> {
        self.validate()?;
        let adaptor: StepSizeAdaptor = match *self {
            AdaptationConfig::Fixed { step_size } => FixedStepSize::new(step_size).into(),
            AdaptationConfig::Manual { step_size } => ManualStepSize::new(step_size).into(),
            AdaptationConfig::DualAveraging {
                target_accept,
                initial_step_size,
                gamma,
                t0,
                kappa,
            } => DualAveraging::with_hyperparameters(
                gamma,
                t0,
                kappa,
                target_accept,
                initial_step_size,
            )
            .into(),
        };
        Ok(adaptor)
    }
}

fn ensure_step_size(field: &str, value: f64) -> Result<(), HmcError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(HmcError::Config(
        ErrorInfo::new("invalid-step-size", format!("{field} must be finite and positive"))
            .with_context("value", value.to_string()),
    ))
}

fn ensure_range(field: &str, value: f64, accept: impl Fn(f64) -> bool) -> Result<(), HmcError> {
    if value.is_finite() && accept(value) {
        return Ok(());
    }
    Err(HmcError::Config(
        ErrorInfo::new("out-of-range", format!("{field} is out of range"))
            .with_context("value", value.to_string()),
    ))
}
