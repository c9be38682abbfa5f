//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use powerhub_adapter_svg::{HtmlDeviceTable, SvgPowerMeter};
use powerhub_app::dashboard::Dashboard;
use powerhub_app::ports::{CommandPublisher, PreferenceStore};
use powerhub_app::snapshot_store::InProcessSnapshotStore;
use powerhub_domain::theme::Theme;

/// Dashboard rendering into SVG and HTML.
pub type PageDashboard<P, C> =
    Dashboard<SvgPowerMeter, HtmlDeviceTable, Arc<InProcessSnapshotStore>, Arc<P>, Arc<C>>;

/// Application state shared across all axum handlers.
///
/// Generic over the preference store and the command publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<P, C> {
    /// Both widgets; one interaction runs at a time.
    pub dashboard: Arc<Mutex<PageDashboard<P, C>>>,
    /// Latest energy snapshot, fed by the data layer.
    pub snapshots: Arc<InProcessSnapshotStore>,
    /// Auto-reload interval of the dashboard page.
    pub refresh_seconds: u32,
}

impl<P, C> Clone for AppState<P, C> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            snapshots: Arc::clone(&self.snapshots),
            refresh_seconds: self.refresh_seconds,
        }
    }
}

impl<P, C> AppState<P, C>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    /// Bind a new dashboard to the snapshot store.
    pub fn new(
        snapshots: Arc<InProcessSnapshotStore>,
        preferences: Arc<P>,
        publisher: Arc<C>,
        theme: Theme,
        refresh_seconds: u32,
    ) -> Self {
        let dashboard = Dashboard::new(
            SvgPowerMeter::new("/power-meter/reset"),
            HtmlDeviceTable::new("/smart-home"),
            Arc::clone(&snapshots),
            preferences,
            publisher,
            theme,
        );
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            snapshots,
            refresh_seconds,
        }
    }
}
