//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the view layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod command;
pub mod preferences;
pub mod render;
pub mod snapshot;

pub use command::CommandPublisher;
pub use preferences::PreferenceStore;
pub use render::{DeviceTableCanvas, PowerMeterCanvas};
pub use snapshot::SnapshotSource;
