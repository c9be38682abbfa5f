//! In-process snapshot store backed by a tokio watch channel.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use powerhub_domain::error::PowerHubError;
use powerhub_domain::preferences::DisplayPreferences;
use powerhub_domain::snapshot::EnergySnapshot;

use crate::ports::{PreferenceStore, SnapshotSource};

/// Holds the latest validated [`EnergySnapshot`].
///
/// The data feed replaces readings through [`publish`](Self::publish).
/// Display preferences belong to the dashboard: they survive every publish
/// and only change through the [`PreferenceStore`] implementation.
pub struct InProcessSnapshotStore {
    sender: watch::Sender<Arc<EnergySnapshot>>,
}

impl InProcessSnapshotStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: EnergySnapshot) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// Validate and publish a new snapshot.
    ///
    /// The snapshot is stamped with the publish time and keeps the current
    /// display preferences.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::Validation`] if a reading is invalid; the
    /// previous snapshot stays in place.
    #[tracing::instrument(skip_all)]
    pub fn publish(&self, mut snapshot: EnergySnapshot) -> Result<(), PowerHubError> {
        if let Err(err) = snapshot.validate() {
            tracing::warn!(error = %err, "rejected energy snapshot");
            return Err(err.into());
        }
        snapshot.updated_at = powerhub_domain::snapshot::now();
        self.sender.send_modify(|current| {
            snapshot.preferences = current.preferences;
            *current = Arc::new(snapshot);
        });
        Ok(())
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver is notified on every publish and preference change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<EnergySnapshot>> {
        self.sender.subscribe()
    }

    fn set_preferences(&self, preferences: DisplayPreferences) {
        self.sender.send_modify(|current| {
            let mut next = EnergySnapshot::clone(current);
            next.preferences = preferences;
            *current = Arc::new(next);
        });
    }
}

impl SnapshotSource for InProcessSnapshotStore {
    fn current(&self) -> Arc<EnergySnapshot> {
        Arc::clone(&self.sender.borrow())
    }
}

impl PreferenceStore for InProcessSnapshotStore {
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send {
        let preferences = self.current().preferences;
        async move { Ok(Some(preferences)) }
    }

    fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        self.set_preferences(preferences);
        async { Ok(()) }
    }
}
