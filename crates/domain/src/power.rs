//! Power summaries: instantaneous supply and consumption per category.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::theme::ColorToken;

/// Power of one supply or consumption category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSummaryEntry {
    pub name: String,
    /// Instantaneous power in watts.
    pub power: f64,
    pub color: ColorToken,
}

impl PowerSummaryEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, power: f64, color: impl Into<ColorToken>) -> Self {
        Self {
            name: name.into(),
            power,
            color: color.into(),
        }
    }

    /// Whether the entry gets a text label on the power meter.
    #[must_use]
    pub fn is_labelled(&self) -> bool {
        self.power > 0.0
    }

    /// Check that the power is a finite, non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPower`] otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(ValidationError::InvalidPower {
                category: self.name.clone(),
                value: self.power,
            });
        }
        Ok(())
    }
}

/// Where the power currently comes from.
///
/// Field order is the order of the supply arc (source priority).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub pv: PowerSummaryEntry,
    pub evu_in: PowerSummaryEntry,
    pub bat_out: PowerSummaryEntry,
}

impl SourceSummary {
    /// Entries in arc order.
    #[must_use]
    pub fn entries(&self) -> [&PowerSummaryEntry; 3] {
        [&self.pv, &self.evu_in, &self.bat_out]
    }

    /// Total supplied power in watts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries().iter().map(|entry| entry.power).sum()
    }
}

/// Where the power currently goes.
///
/// Serialized as an ordered list of five entries:
/// export, charging, devices, battery in, house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PowerSummaryEntry>", into = "Vec<PowerSummaryEntry>")]
pub struct UsageSummary {
    pub export: PowerSummaryEntry,
    pub charging: PowerSummaryEntry,
    pub devices: PowerSummaryEntry,
    pub bat_in: PowerSummaryEntry,
    pub house: PowerSummaryEntry,
}

impl UsageSummary {
    /// Entries in arc order.
    #[must_use]
    pub fn entries(&self) -> [&PowerSummaryEntry; 5] {
        [
            &self.export,
            &self.charging,
            &self.devices,
            &self.bat_in,
            &self.house,
        ]
    }

    /// Power consumed on site: house, charge points, smart-home devices and
    /// battery charging. Export is not part of it.
    #[must_use]
    pub fn consumption(&self) -> f64 {
        self.house.power + self.charging.power + self.devices.power + self.bat_in.power
    }
}

/// The usage list did not have exactly five entries.
#[derive(Debug, thiserror::Error)]
#[error("usage summary needs 5 entries, got {0}")]
pub struct UsageSummaryLengthError(usize);

impl TryFrom<Vec<PowerSummaryEntry>> for UsageSummary {
    type Error = UsageSummaryLengthError;

    fn try_from(entries: Vec<PowerSummaryEntry>) -> Result<Self, Self::Error> {
        let len = entries.len();
        let [export, charging, devices, bat_in, house]: [PowerSummaryEntry; 5] = entries
            .try_into()
            .map_err(|_| UsageSummaryLengthError(len))?;
        Ok(Self {
            export,
            charging,
            devices,
            bat_in,
            house,
        })
    }
}

impl From<UsageSummary> for Vec<PowerSummaryEntry> {
    fn from(usage: UsageSummary) -> Self {
        vec![
            usage.export,
            usage.charging,
            usage.devices,
            usage.bat_in,
            usage.house,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, power: f64) -> PowerSummaryEntry {
        PowerSummaryEntry::new(name, power, "white")
    }

    fn usage() -> UsageSummary {
        UsageSummary {
            export: entry("Export", 300.0),
            charging: entry("Laden", 2000.0),
            devices: entry("Geräte", 150.0),
            bat_in: entry("> Speicher", 500.0),
            house: entry("Haus", 450.0),
        }
    }

    #[test]
    fn should_label_only_positive_entries() {
        assert!(entry("PV", 1.0).is_labelled());
        assert!(!entry("PV", 0.0).is_labelled());
    }

    #[test]
    fn should_reject_negative_power() {
        let err = entry("Netz", -10.0).validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPower { .. }));
    }

    #[test]
    fn should_reject_non_finite_power() {
        assert!(entry("Netz", f64::NAN).validate().is_err());
        assert!(entry("Netz", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn should_sum_source_total() {
        let source = SourceSummary {
            pv: entry("PV", 1500.0),
            evu_in: entry("Netz", 200.0),
            bat_out: entry("Speicher", 300.0),
        };
        assert!((source.total() - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_exclude_export_from_consumption() {
        assert!((usage().consumption() - 3100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_keep_usage_order_when_serialized() {
        let json = serde_json::to_value(usage()).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Export", "Laden", "Geräte", "> Speicher", "Haus"]);
    }

    #[test]
    fn should_reject_usage_list_with_wrong_length() {
        let json = serde_json::json!([{"name": "Export", "power": 0.0, "color": "white"}]);
        let result: Result<UsageSummary, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
