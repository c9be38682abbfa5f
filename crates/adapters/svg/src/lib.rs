//! # powerhub-adapter-svg
//!
//! Render adapter producing markup for the server-side dashboard.
//!
//! ## Responsibilities
//! - `SvgPowerMeter` implements `PowerMeterCanvas` as an inline `<svg>` with
//!   one annular-sector `<path>` per arc segment
//! - `HtmlDeviceTable` implements `DeviceTableCanvas` as a `<table>` whose
//!   controls are plain HTML forms, so the page works without JavaScript
//!
//! Markup comes from the askama templates under `templates/`, which escape
//! every interpolated value.
//!
//! ## Dependency rule
//! Depends on `powerhub-app` (canvas ports) and `powerhub-domain` only.

pub mod power_meter;
pub mod table;

pub use power_meter::SvgPowerMeter;
pub use table::HtmlDeviceTable;
