//! Device list view: table of configured smart-home devices.
//!
//! Clicking a row or a mode button publishes a command and locks the clicked
//! control until the data layer delivers a newer snapshot. There is no
//! timeout: if the energy manager never answers, the control stays locked
//! until the next refresh.

use std::collections::HashMap;

use serde::Serialize;

use powerhub_domain::command::DeviceCommand;
use powerhub_domain::error::{NotFoundError, PowerHubError};
use powerhub_domain::format::{format_time, format_watt, format_watt_h};
use powerhub_domain::smart_home::SmartHomeDevice;
use powerhub_domain::snapshot::{EnergySnapshot, Timestamp};
use powerhub_domain::theme::ColorToken;

use crate::ports::{CommandPublisher, DeviceTableCanvas, SnapshotSource};

/// Column headers of the device table.
pub const HEADERS: [&str; 4] = ["Gerät", "Verbrauch", "Laufzeit", "Modus"];

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    /// Position of the device in the full device list.
    pub index: usize,
    pub name: String,
    pub is_on: bool,
    pub is_automatic: bool,
    /// Power with today's energy in parentheses.
    pub consumption: String,
    pub running_time: String,
    /// `Automatik` or `Manuell`.
    pub mode: &'static str,
    pub color: ColorToken,
    /// The on/off control waits for confirmation.
    pub row_locked: bool,
    /// The mode button waits for confirmation.
    pub mode_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Control {
    Row(usize),
    Mode(usize),
}

/// The smart-home widget bound to its canvas.
pub struct DeviceListView<C, S, P> {
    canvas: C,
    source: S,
    publisher: P,
    /// Locked controls and the snapshot they were locked on.
    locks: HashMap<Control, Timestamp>,
}

impl<C, S, P> DeviceListView<C, S, P>
where
    C: DeviceTableCanvas,
    S: SnapshotSource,
    P: CommandPublisher,
{
    /// Bind the view to `canvas` and its collaborators.
    pub fn init(canvas: C, source: S, publisher: P) -> Self {
        Self {
            canvas,
            source,
            publisher,
            locks: HashMap::new(),
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Rows for the current snapshot, configured devices only, in list order.
    #[must_use]
    pub fn rows(&self) -> Vec<DeviceRow> {
        self.rows_for(&self.source.current())
    }

    /// Redraw the table, or hide the widget when no device is configured.
    ///
    /// Locks taken on an older snapshot are released.
    #[tracing::instrument(skip(self))]
    pub fn update(&mut self) {
        let snapshot = self.source.current();
        self.locks
            .retain(|_, locked_on| *locked_on == snapshot.updated_at);
        self.draw(&snapshot);
    }

    /// Toggle a manually controlled device on or off.
    ///
    /// Devices in automatic mode and locked rows ignore the click.
    /// Returns the published command, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] when `index` does not address a
    /// configured device, or the publisher's error; the row stays unlocked
    /// when publishing fails.
    #[tracing::instrument(skip(self))]
    pub async fn device_clicked(
        &mut self,
        index: usize,
    ) -> Result<Option<DeviceCommand>, PowerHubError> {
        let snapshot = self.source.current();
        let device = configured_device(&snapshot, index)?;
        if device.is_automatic {
            tracing::debug!(index, "device in automatic mode, ignoring click");
            return Ok(None);
        }
        let command = DeviceCommand::ManualControl {
            index,
            on: !device.is_on,
        };
        self.send(&snapshot, Control::Row(index), command).await
    }

    /// Switch a device between automatic and manual mode.
    ///
    /// A locked mode button ignores the click.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] when `index` does not address a
    /// configured device, or the publisher's error.
    #[tracing::instrument(skip(self))]
    pub async fn mode_clicked(
        &mut self,
        index: usize,
    ) -> Result<Option<DeviceCommand>, PowerHubError> {
        let snapshot = self.source.current();
        let device = configured_device(&snapshot, index)?;
        let command = DeviceCommand::Mode {
            index,
            manual: device.is_automatic,
        };
        self.send(&snapshot, Control::Mode(index), command).await
    }

    async fn send(
        &mut self,
        snapshot: &EnergySnapshot,
        control: Control,
        command: DeviceCommand,
    ) -> Result<Option<DeviceCommand>, PowerHubError> {
        if self.locks.contains_key(&control) {
            tracing::debug!(?control, "control locked, ignoring click");
            return Ok(None);
        }
        self.publisher
            .publish(&command.topic(), command.payload())
            .await
            .inspect_err(|err| tracing::warn!(error = %err, %command, "failed to publish"))?;
        tracing::info!(%command, "published device command");
        self.locks.insert(control, snapshot.updated_at);
        self.draw(snapshot);
        Ok(Some(command))
    }

    fn draw(&mut self, snapshot: &EnergySnapshot) {
        let rows = self.rows_for(snapshot);
        self.canvas.clear();
        if rows.is_empty() {
            self.canvas.set_visible(false);
            return;
        }
        self.canvas.set_visible(true);
        self.canvas.draw_header(&HEADERS);
        for row in &rows {
            self.canvas.draw_row(row);
        }
    }

    fn rows_for(&self, snapshot: &EnergySnapshot) -> Vec<DeviceRow> {
        snapshot
            .configured_devices()
            .map(|(index, device)| DeviceRow {
                index,
                name: device.name.clone(),
                is_on: device.is_on,
                is_automatic: device.is_automatic,
                consumption: format!(
                    "{} ({})",
                    format_watt(device.power),
                    format_watt_h(device.energy * 1000.0)
                ),
                running_time: format_time(device.running_time),
                mode: if device.is_automatic {
                    "Automatik"
                } else {
                    "Manuell"
                },
                color: device.color.clone(),
                row_locked: self.locks.contains_key(&Control::Row(index)),
                mode_locked: self.locks.contains_key(&Control::Mode(index)),
            })
            .collect()
    }
}

fn configured_device(
    snapshot: &EnergySnapshot,
    index: usize,
) -> Result<&SmartHomeDevice, NotFoundError> {
    snapshot
        .devices
        .get(index)
        .filter(|device| device.configured)
        .ok_or_else(|| NotFoundError {
            entity: "SmartHomeDevice",
            id: index.to_string(),
        })
}
