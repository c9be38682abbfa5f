//! Snapshot port: read access to the externally maintained energy data.

use std::sync::Arc;

use powerhub_domain::snapshot::EnergySnapshot;

/// Provides the latest [`EnergySnapshot`].
///
/// Views pull the snapshot on every update and never mutate it.
pub trait SnapshotSource {
    fn current(&self) -> Arc<EnergySnapshot>;
}

impl<T: SnapshotSource> SnapshotSource for Arc<T> {
    fn current(&self) -> Arc<EnergySnapshot> {
        (**self).current()
    }
}
