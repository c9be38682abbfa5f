//! Virtual smart-home devices.
//!
//! Devices in automatic mode are switched by the simulated energy manager
//! according to the PV surplus; manual devices only follow commands.

use powerhub_domain::smart_home::SmartHomeDevice;
use powerhub_domain::theme::ColorToken;

/// A simulated switchable consumer.
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    name: &'static str,
    configured: bool,
    rated_power: f64,
    is_on: bool,
    is_automatic: bool,
    energy_wh: f64,
    running_time: u64,
    color: ColorToken,
}

impl VirtualDevice {
    /// Heating rod, run automatically on surplus.
    #[must_use]
    pub fn heater() -> Self {
        Self::new("Heizstab", true, 2000.0, true, "#ffa726")
    }

    /// Pool pump, switched by hand.
    #[must_use]
    pub fn pool_pump() -> Self {
        Self::new("Poolpumpe", true, 650.0, false, "#ab47bc")
    }

    /// Free slot without a device behind it.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::new("Gerät 3", false, 0.0, false, "#8d6e63")
    }

    fn new(
        name: &'static str,
        configured: bool,
        rated_power: f64,
        is_automatic: bool,
        color: &str,
    ) -> Self {
        Self {
            name,
            configured,
            rated_power,
            is_on: false,
            is_automatic,
            energy_wh: 0.0,
            running_time: 0,
            color: ColorToken::new(color),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Current draw in watts.
    #[must_use]
    pub fn power(&self) -> f64 {
        if self.is_on { self.rated_power } else { 0.0 }
    }

    /// Let the energy manager switch an automatic device.
    ///
    /// `surplus` is the PV power left over by every other consumer. A running
    /// device keeps going until the surplus drops below half its rating.
    pub fn regulate(&mut self, surplus: f64) {
        if !self.configured || !self.is_automatic {
            return;
        }
        let threshold = if self.is_on {
            self.rated_power / 2.0
        } else {
            self.rated_power
        };
        self.is_on = surplus >= threshold;
    }

    /// Switch a manual device. Returns `false` when the device is automatic
    /// and the request was ignored.
    pub fn switch(&mut self, on: bool) -> bool {
        if self.is_automatic {
            return false;
        }
        self.is_on = on;
        true
    }

    pub fn set_manual(&mut self, manual: bool) {
        self.is_automatic = !manual;
    }

    /// Account `secs` of operation at the current state.
    pub fn advance(&mut self, secs: u64) {
        if self.is_on {
            self.running_time += secs;
            self.energy_wh += self.rated_power * hours(secs);
        }
    }

    /// Start a new day: counters back to zero.
    pub fn reset_counters(&mut self) {
        self.energy_wh = 0.0;
        self.running_time = 0;
    }

    #[must_use]
    pub fn to_domain(&self) -> SmartHomeDevice {
        SmartHomeDevice {
            configured: self.configured,
            is_on: self.is_on,
            is_automatic: self.is_automatic,
            name: self.name.to_string(),
            power: self.power(),
            energy: self.energy_wh / 1000.0,
            running_time: self.running_time,
            color: self.color.clone(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn hours(secs: u64) -> f64 {
    secs as f64 / 3600.0
}
