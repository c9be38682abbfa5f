//! Energy snapshot: everything the dashboard widgets read on an update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charge_point::ChargePoint;
use crate::error::ValidationError;
use crate::power::{PowerSummaryEntry, SourceSummary, UsageSummary};
use crate::preferences::DisplayPreferences;
use crate::smart_home::SmartHomeDevice;
use crate::theme::{ColorToken, Theme};

/// UTC timestamp of a snapshot.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Read-only view of the energy system at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySnapshot {
    pub source: SourceSummary,
    pub usage: UsageSummary,
    pub charge_points: [ChargePoint; 2],
    /// Home battery state of charge in percent, 0 when there is no battery.
    #[serde(default)]
    pub battery_soc: u8,
    #[serde(default)]
    pub devices: Vec<SmartHomeDevice>,
    #[serde(default)]
    pub preferences: DisplayPreferences,
    #[serde(default = "now")]
    pub updated_at: Timestamp,
}

impl EnergySnapshot {
    /// A snapshot with every reading at zero, coloured from `theme`.
    ///
    /// Used until the data layer delivers its first snapshot.
    #[must_use]
    pub fn empty(theme: &Theme) -> Self {
        let zero =
            |name: &str, color: &ColorToken| PowerSummaryEntry::new(name, 0.0, color.clone());
        let charge_point = |name: &str| ChargePoint {
            name: name.to_string(),
            soc: 0,
            is_soc_configured: false,
            color: theme.charging.clone(),
        };
        Self {
            source: SourceSummary {
                pv: zero("PV", &theme.pv),
                evu_in: zero("Netz", &theme.grid),
                bat_out: zero("Speicher", &theme.charging),
            },
            usage: UsageSummary {
                export: zero("Export", &theme.export),
                charging: zero("Laden", &theme.charging),
                devices: zero("Geräte", &theme.axis),
                bat_in: zero("> Speicher", &theme.charging),
                house: zero("Haus", &theme.house),
            },
            charge_points: [charge_point("LP1"), charge_point("LP2")],
            battery_soc: 0,
            devices: Vec::new(),
            preferences: DisplayPreferences::default(),
            updated_at: now(),
        }
    }

    /// Configured devices paired with their index in the full device list,
    /// in list order.
    pub fn configured_devices(&self) -> impl Iterator<Item = (usize, &SmartHomeDevice)> {
        self.devices
            .iter()
            .enumerate()
            .filter(|(_, device)| device.configured)
    }

    /// Check every reading of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for entry in self.source.entries() {
            entry.validate()?;
        }
        for entry in self.usage.entries() {
            entry.validate()?;
        }
        for charge_point in &self.charge_points {
            charge_point.validate()?;
        }
        if self.battery_soc > 100 {
            return Err(ValidationError::StateOfChargeOutOfRange {
                subject: "Speicher".to_string(),
                value: self.battery_soc,
            });
        }
        for device in &self.devices {
            device.validate()?;
        }
        self.preferences.validate()
    }
}
