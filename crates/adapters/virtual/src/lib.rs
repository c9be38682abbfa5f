//! # powerhub-adapter-virtual
//!
//! Virtual/demo energy system that stands in for a real energy manager in
//! tests and demonstrations.
//!
//! ## Simulated installation
//!
//! | Component | Behaviour |
//! |-----------|-----------|
//! | PV | Peaks at 6 kW at simulated noon, nothing at night |
//! | House | Base load with a small deterministic swing |
//! | Battery | 10 kWh, charged from surplus, discharged on deficit |
//! | Charge point 1 | Charges an EV at 3.7 kW until full, SoC reported |
//! | Charge point 2 | Idle, no SoC |
//! | Smart-home devices | Heating rod (automatic), pool pump (manual), one free slot |
//!
//! Whatever the battery cannot absorb or deliver is exported to or imported
//! from the grid, so supply and usage always balance.
//!
//! Commands arrive through the [`CommandPublisher`] implementation and
//! become visible with the next published snapshot.
//!
//! ## Dependency rule
//!
//! Depends on `powerhub-app` (port traits) and `powerhub-domain` only.

pub mod config;
mod devices;

use std::f64::consts::PI;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use powerhub_app::ports::CommandPublisher;
use powerhub_app::snapshot_store::InProcessSnapshotStore;
use powerhub_domain::command::DeviceCommand;
use powerhub_domain::error::{NotFoundError, PowerHubError};
use powerhub_domain::snapshot::EnergySnapshot;
use powerhub_domain::theme::Theme;

pub use config::SimulationConfig;
use devices::{VirtualDevice, hours};

const PV_PEAK: f64 = 6000.0;
const BASE_LOAD: f64 = 350.0;
const LOAD_SWING: f64 = 40.0;
const CHARGE_POWER: f64 = 3700.0;
const EV_CAPACITY_WH: f64 = 40_000.0;
const EV_ARRIVAL_SOC: f64 = 20.0;
const BATTERY_POWER: f64 = 3000.0;
const BATTERY_CAPACITY_WH: f64 = 10_000.0;
/// Simulated seconds in a day.
const DAY_SECS: u64 = 24 * 3600;

/// Power flows of one instant, in watts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Flows {
    pv: f64,
    evu_in: f64,
    bat_out: f64,
    export: f64,
    charging: f64,
    devices: f64,
    bat_in: f64,
    house: f64,
}

#[derive(Debug)]
struct State {
    /// Simulated seconds since midnight.
    clock: u64,
    battery_soc: f64,
    ev_soc: f64,
    devices: Vec<VirtualDevice>,
}

impl State {
    #[allow(clippy::cast_precision_loss)]
    fn pv(&self) -> f64 {
        // Daylight from 06:00 to 18:00.
        let phase = (self.clock % DAY_SECS) as f64 / DAY_SECS as f64;
        PV_PEAK * (2.0 * PI * (phase - 0.25)).sin().max(0.0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn house(&self) -> f64 {
        let step = (self.clock / 60) % 7;
        BASE_LOAD + LOAD_SWING * step as f64
    }

    fn charging(&self) -> f64 {
        if self.ev_soc < 100.0 { CHARGE_POWER } else { 0.0 }
    }

    fn flows(&self) -> Flows {
        let pv = self.pv();
        let house = self.house();
        let charging = self.charging();
        let devices: f64 = self.devices.iter().map(VirtualDevice::power).sum();
        let surplus = pv - house - charging - devices;

        let mut flows = Flows {
            pv,
            house,
            charging,
            devices,
            ..Flows::default()
        };
        if surplus >= 0.0 {
            flows.bat_in = if self.battery_soc < 100.0 {
                surplus.min(BATTERY_POWER)
            } else {
                0.0
            };
            flows.export = surplus - flows.bat_in;
        } else {
            let deficit = -surplus;
            flows.bat_out = if self.battery_soc > 0.0 {
                deficit.min(BATTERY_POWER)
            } else {
                0.0
            };
            flows.evu_in = deficit - flows.bat_out;
        }
        flows
    }

    fn regulate(&mut self) {
        let pv = self.pv();
        let base = self.house() + self.charging();
        for index in 0..self.devices.len() {
            let others: f64 = self
                .devices
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, device)| device.power())
                .sum();
            self.devices[index].regulate(pv - base - others);
        }
    }

    fn advance(&mut self, secs: u64) {
        let day = self.clock / DAY_SECS;
        self.regulate();
        let flows = self.flows();
        let elapsed = hours(secs);

        self.battery_soc = (self.battery_soc
            + (flows.bat_in - flows.bat_out) * elapsed / BATTERY_CAPACITY_WH * 100.0)
            .clamp(0.0, 100.0);
        self.ev_soc =
            (self.ev_soc + flows.charging * elapsed / EV_CAPACITY_WH * 100.0).min(100.0);
        for device in &mut self.devices {
            device.advance(secs);
        }

        self.clock += secs;
        if self.clock / DAY_SECS != day {
            tracing::debug!("new simulated day");
            self.ev_soc = EV_ARRIVAL_SOC;
            for device in &mut self.devices {
                device.reset_counters();
            }
        }
    }
}

/// Simulated energy system.
///
/// Shared between the tick task and the dashboard's command path.
pub struct VirtualEnergySystem {
    theme: Theme,
    state: Mutex<State>,
}

impl VirtualEnergySystem {
    /// Start the simulation at 10:00 with a half-full battery.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            state: Mutex::new(State {
                clock: 10 * 3600,
                battery_soc: 50.0,
                ev_soc: EV_ARRIVAL_SOC,
                devices: vec![
                    VirtualDevice::heater(),
                    VirtualDevice::pool_pump(),
                    VirtualDevice::unconfigured(),
                ],
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // State stays consistent even if a holder panicked mid-update.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current readings as an [`EnergySnapshot`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn snapshot(&self) -> EnergySnapshot {
        let state = self.state();
        let flows = state.flows();
        let mut snapshot = EnergySnapshot::empty(&self.theme);

        snapshot.source.pv.power = flows.pv;
        snapshot.source.evu_in.power = flows.evu_in;
        snapshot.source.bat_out.power = flows.bat_out;
        snapshot.usage.export.power = flows.export;
        snapshot.usage.charging.power = flows.charging;
        snapshot.usage.devices.power = flows.devices;
        snapshot.usage.bat_in.power = flows.bat_in;
        snapshot.usage.house.power = flows.house;

        snapshot.charge_points[0].soc = state.ev_soc.round() as u8;
        snapshot.charge_points[0].is_soc_configured = true;
        snapshot.battery_soc = state.battery_soc.round() as u8;
        snapshot.devices = state.devices.iter().map(VirtualDevice::to_domain).collect();
        snapshot
    }

    /// Move the simulation forward by `secs` simulated seconds.
    pub fn advance(&self, secs: u64) {
        self.state().advance(secs);
    }

    /// Apply a smart-home command.
    ///
    /// Switching a device in automatic mode is accepted and ignored, as the
    /// energy manager keeps control of it.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] when the command addresses a
    /// missing or unconfigured device slot.
    #[tracing::instrument(skip(self))]
    pub fn apply(&self, command: DeviceCommand) -> Result<(), PowerHubError> {
        let mut state = self.state();
        let index = command.index();
        let device = state
            .devices
            .get_mut(index)
            .filter(|device| device.is_configured())
            .ok_or_else(|| NotFoundError {
                entity: "SmartHomeDevice",
                id: index.to_string(),
            })?;

        match command {
            DeviceCommand::ManualControl { on, .. } => {
                if !device.switch(on) {
                    tracing::debug!(index, "device in automatic mode, ignoring switch");
                }
            }
            DeviceCommand::Mode { manual, .. } => device.set_manual(manual),
        }
        Ok(())
    }

    /// Spawn the task publishing a fresh snapshot to `store` every tick.
    ///
    /// The first snapshot is published immediately.
    pub fn spawn(
        self: Arc<Self>,
        store: Arc<InProcessSnapshotStore>,
        config: &SimulationConfig,
    ) -> JoinHandle<()> {
        let period = Duration::from_secs(config.tick_secs.max(1));
        let step = config.simulated_secs_per_tick();
        tracing::info!(tick_secs = period.as_secs(), step, "starting virtual energy system");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            let mut first = true;
            loop {
                interval.tick().await;
                if !first {
                    self.advance(step);
                }
                first = false;
                if let Err(err) = store.publish(self.snapshot()) {
                    tracing::warn!(error = %err, "virtual snapshot rejected");
                }
            }
        })
    }
}

impl CommandPublisher for VirtualEnergySystem {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        let result = DeviceCommand::parse(topic, payload)
            .map_err(PowerHubError::from)
            .and_then(|command| self.apply(command));
        async move { result }
    }
}
