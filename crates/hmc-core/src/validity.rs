//! Numerical validity checks and the termination flag threaded through one
//! integrator call.

use serde::{Deserialize, Serialize};

/// Returns `true` when every component of `values` is finite.
///
/// A single NaN or infinite component marks the whole vector invalid.
pub fn is_valid(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

/// Divergence flag local to a single integrator call.
///
/// The flag is monotone: combining a terminated flag with anything yields a
/// terminated flag. Equivalently, the complementary "still valid" flags
/// combine with logical AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Termination {
    numerical: bool,
}

impl Termination {
    /// Flag for a call that has not diverged.
    pub const CONTINUE: Termination = Termination { numerical: false };
    /// Flag for a call that has observed a non-finite vector.
    pub const DIVERGED: Termination = Termination { numerical: true };

    /// Flag derived from the validity of a freshly computed vector.
    pub fn from_vector(values: &[f64]) -> Self {
        Termination {
            numerical: !is_valid(values),
        }
    }

    /// Whether divergence has been observed.
    pub fn is_terminated(&self) -> bool {
        self.numerical
    }

    /// Monotone combination of two flags.
    pub fn combine(self, other: Termination) -> Termination {
        Termination {
            numerical: self.numerical || other.numerical,
        }
    }
}
