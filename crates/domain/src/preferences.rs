//! Display preferences of the power meter and the max-power ratchet.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum power assumed before anything has been configured or measured.
pub const DEFAULT_MAX_POWER: f64 = 4000.0;

/// Persisted display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    /// Scale the arcs to [`max_power`](Self::max_power) instead of filling
    /// each half with the instantaneous total.
    pub relative_arc_mode: bool,
    /// Power in watts that a full arc represents in relative mode.
    pub max_power: f64,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            relative_arc_mode: false,
            max_power: DEFAULT_MAX_POWER,
        }
    }
}

impl DisplayPreferences {
    /// Check that `max_power` is usable as an arc total.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMaxPower`] for negative or
    /// non-finite values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_max_power(self.max_power)
    }

    /// Raise `max_power` to `total` when the total exceeds it.
    ///
    /// Returns `true` when the preferences changed and must be persisted.
    /// The bound never shrinks here.
    pub fn ratchet(&mut self, total: f64) -> bool {
        if total > self.max_power {
            self.max_power = total;
            true
        } else {
            false
        }
    }

    /// Filler power padding an arc up to `max_power`.
    #[must_use]
    pub fn filler(&self, total: f64) -> f64 {
        (self.max_power - total).max(0.0)
    }
}

/// Check a maximum power value.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMaxPower`] for negative or non-finite
/// values.
pub fn validate_max_power(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidMaxPower(value));
    }
    Ok(())
}
