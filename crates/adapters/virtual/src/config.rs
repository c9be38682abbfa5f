//! Simulation configuration.

use serde::Deserialize;

/// Configuration of the virtual energy system.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Run the simulation and feed its snapshots to the dashboard.
    pub enabled: bool,
    /// Wall-clock seconds between two snapshots.
    pub tick_secs: u64,
    /// Simulated seconds per wall-clock second.
    pub time_scale: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_secs: 2,
            time_scale: 60,
        }
    }
}

impl SimulationConfig {
    /// Simulated seconds covered by one tick.
    #[must_use]
    pub fn simulated_secs_per_tick(&self) -> u64 {
        self.tick_secs.saturating_mul(self.time_scale)
    }
}
