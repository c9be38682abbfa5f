//! # powerhub-app
//!
//! Application layer: dashboard views and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement (driven/outbound ports):
//!   - `SnapshotSource`: read the latest energy snapshot
//!   - `CommandPublisher`: send commands to the energy manager
//!   - `PreferenceStore`: persist display preferences
//!   - `PowerMeterCanvas` / `DeviceTableCanvas`: render targets
//! - Define the **views** driven by update ticks and user clicks:
//!   - `PowerMeterView`: supply/usage donut with relative scaling
//!   - `DeviceListView`: smart-home device table
//! - Provide **in-process infrastructure** (snapshot store) that doesn't need IO
//! - Combine both views behind the `Dashboard` facade for driving adapters
//!
//! ## Dependency rule
//! Depends on `powerhub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dashboard;
pub mod ports;
pub mod preferences;
pub mod snapshot_store;
pub mod views;
