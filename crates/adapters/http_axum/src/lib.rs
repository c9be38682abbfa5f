//! # powerhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **server-side-rendered energy dashboard** that works with
//!   **zero JavaScript**: the power meter as inline SVG, the device table as
//!   HTML forms, and `<meta http-equiv="refresh">` for live updates
//! - Map form posts onto dashboard interactions (driving adapter), then
//!   redirect back to the page (PRG pattern)
//! - Serve a **JSON API** for the snapshot feed, the laid-out power meter and
//!   the device rows, plus an SSE stream of snapshots
//!
//! ## Dependency rule
//! Depends on `powerhub-app` (views, ports, snapshot store),
//! `powerhub-adapter-svg` (render targets) and `powerhub-domain`. Never leaks
//! axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
