//! # powerhub-domain
//!
//! Pure domain model for the powerhub energy dashboard.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, theme colour tokens
//! - Define **power summaries** (supply and consumption categories)
//! - Define **charge points** and **smart-home devices**
//! - Define **display preferences** for the power meter and the max-power ratchet
//! - Define the **energy snapshot** and its validation rules
//! - Lay out the power meter **arcs** (pure geometry, no rendering)
//! - Build outbound **device commands** (topic + payload)
//! - Format watts, watt-hours and durations for display
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod format;
pub mod theme;

pub mod arc;
pub mod charge_point;
pub mod command;
pub mod power;
pub mod preferences;
pub mod smart_home;
pub mod snapshot;
