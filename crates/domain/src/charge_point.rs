//! Charge point: a wallbox whose vehicle state of charge may be known.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::theme::ColorToken;

/// A charge point as shown on the power meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargePoint {
    pub name: String,
    /// Vehicle state of charge in percent. Meaningless unless
    /// [`is_soc_configured`](Self::is_soc_configured) is set.
    #[serde(default)]
    pub soc: u8,
    #[serde(default)]
    pub is_soc_configured: bool,
    pub color: ColorToken,
}

impl ChargePoint {
    /// The state of charge, when a SoC module is configured.
    #[must_use]
    pub fn configured_soc(&self) -> Option<u8> {
        self.is_soc_configured.then_some(self.soc)
    }

    /// Check that the state of charge is a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StateOfChargeOutOfRange`] above 100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.soc > 100 {
            return Err(ValidationError::StateOfChargeOutOfRange {
                subject: self.name.clone(),
                value: self.soc,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge_point(soc: u8, configured: bool) -> ChargePoint {
        ChargePoint {
            name: "LP1".to_string(),
            soc,
            is_soc_configured: configured,
            color: ColorToken::new("#42a5f5"),
        }
    }

    #[test]
    fn should_hide_soc_when_not_configured() {
        assert_eq!(charge_point(80, false).configured_soc(), None);
        assert_eq!(charge_point(80, true).configured_soc(), Some(80));
    }

    #[test]
    fn should_reject_soc_above_one_hundred() {
        assert!(charge_point(101, true).validate().is_err());
        assert!(charge_point(100, true).validate().is_ok());
    }

    #[test]
    fn should_default_missing_soc_fields() {
        let cp: ChargePoint =
            serde_json::from_str(r#"{"name": "LP2", "color": "white"}"#).unwrap();
        assert_eq!(cp.soc, 0);
        assert!(!cp.is_soc_configured);
    }
}
