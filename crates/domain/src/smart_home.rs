//! Smart-home device: a switchable consumer managed by the energy manager.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::theme::ColorToken;

/// A smart-home device slot.
///
/// Devices are addressed by their position in the full device list; the
/// control channel numbers them from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartHomeDevice {
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub is_on: bool,
    #[serde(default)]
    pub is_automatic: bool,
    pub name: String,
    /// Current power in watts.
    #[serde(default)]
    pub power: f64,
    /// Energy consumed today in kWh.
    #[serde(default)]
    pub energy: f64,
    /// Running time today in seconds.
    #[serde(default)]
    pub running_time: u64,
    pub color: ColorToken,
}

impl SmartHomeDevice {
    /// Check power and energy readings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPower`] or
    /// [`ValidationError::InvalidEnergy`] for negative or non-finite readings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(ValidationError::InvalidPower {
                category: self.name.clone(),
                value: self.power,
            });
        }
        if !self.energy.is_finite() || self.energy < 0.0 {
            return Err(ValidationError::InvalidEnergy {
                device: self.name.clone(),
                value: self.energy,
            });
        }
        Ok(())
    }
}

/// Channel number of the device at `index` in the full device list.
#[must_use]
pub fn device_number(index: usize) -> usize {
    index + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> SmartHomeDevice {
        SmartHomeDevice {
            configured: true,
            is_on: false,
            is_automatic: true,
            name: "Heizstab".to_string(),
            power: 0.0,
            energy: 1.5,
            running_time: 0,
            color: ColorToken::new("#ffa726"),
        }
    }

    #[test]
    fn should_accept_valid_readings() {
        assert!(device().validate().is_ok());
    }

    #[test]
    fn should_reject_negative_energy() {
        let mut dev = device();
        dev.energy = -0.1;
        assert!(matches!(
            dev.validate(),
            Err(ValidationError::InvalidEnergy { .. })
        ));
    }

    #[test]
    fn should_reject_negative_power() {
        let mut dev = device();
        dev.power = -1.0;
        assert!(matches!(
            dev.validate(),
            Err(ValidationError::InvalidPower { .. })
        ));
    }

    #[test]
    fn should_number_devices_from_one() {
        assert_eq!(device_number(0), 1);
        assert_eq!(device_number(8), 9);
    }

    #[test]
    fn should_default_unset_flags_to_false() {
        let dev: SmartHomeDevice =
            serde_json::from_str(r#"{"name": "Pool", "color": "white"}"#).unwrap();
        assert!(!dev.configured);
        assert!(!dev.is_on);
        assert!(!dev.is_automatic);
    }
}
