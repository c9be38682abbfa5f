//! Preference port: persistence of the power meter display preferences.

use std::future::Future;

use powerhub_domain::error::PowerHubError;
use powerhub_domain::preferences::DisplayPreferences;

/// Persists [`DisplayPreferences`].
pub trait PreferenceStore {
    /// Load the last saved preferences, `None` if nothing was saved yet.
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send;

    /// Save the preferences, replacing the previous ones.
    fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send;
}

impl<T: PreferenceStore + Send + Sync> PreferenceStore for std::sync::Arc<T> {
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send {
        (**self).load()
    }

    fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        (**self).save(preferences)
    }
}
