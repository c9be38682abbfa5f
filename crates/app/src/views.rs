//! Dashboard views: stateful widgets bound to a canvas.
//!
//! Each view is initialised once with its collaborators (constructor
//! injection) and then driven by `update` ticks and user clicks. Every call
//! runs to completion before the next one starts.

pub mod device_list;
pub mod power_meter;
