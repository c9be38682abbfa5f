//! Preference store writing through to a durable primary and a live mirror.

use std::future::Future;

use powerhub_domain::error::PowerHubError;
use powerhub_domain::preferences::DisplayPreferences;

use crate::ports::PreferenceStore;

/// Saves preferences to `primary` first, then to `mirror`.
///
/// Loads read the primary only. The mirror is typically the snapshot store,
/// so that the preferences served with every snapshot stay current.
pub struct MirroredPreferenceStore<P, M> {
    primary: P,
    mirror: M,
}

impl<P, M> MirroredPreferenceStore<P, M>
where
    P: PreferenceStore + Sync,
    M: PreferenceStore + Sync,
{
    pub fn new(primary: P, mirror: M) -> Self {
        Self { primary, mirror }
    }

    /// Copy the preferences saved in the primary into the mirror.
    ///
    /// Returns the restored preferences, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns the error of either store.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<DisplayPreferences>, PowerHubError> {
        let Some(preferences) = self.primary.load().await? else {
            tracing::debug!("no saved display preferences");
            return Ok(None);
        };
        self.mirror.save(preferences).await?;
        tracing::info!(
            relative = preferences.relative_arc_mode,
            max_power = preferences.max_power,
            "restored display preferences"
        );
        Ok(Some(preferences))
    }
}

impl<P, M> PreferenceStore for MirroredPreferenceStore<P, M>
where
    P: PreferenceStore + Sync,
    M: PreferenceStore + Sync,
{
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send {
        self.primary.load()
    }

    fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        async move {
            self.primary.save(preferences).await?;
            self.mirror.save(preferences).await
        }
    }
}
