//! JSON views of the two widgets.

use axum::Json;
use axum::extract::State;

use powerhub_app::ports::{CommandPublisher, PreferenceStore};
use powerhub_app::views::device_list::DeviceRow;
use powerhub_app::views::power_meter::PowerMeterScene;

use crate::state::AppState;

/// `GET /api/power-meter`: arcs and labels for the current snapshot.
///
/// Read-only: the maximum is not ratcheted or persisted here.
pub async fn power_meter<P, C>(State(state): State<AppState<P, C>>) -> Json<PowerMeterScene>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    Json(state.dashboard.lock().await.power_meter().scene())
}

/// `GET /api/smart-home`: rows of the configured devices.
pub async fn smart_home<P, C>(State(state): State<AppState<P, C>>) -> Json<Vec<DeviceRow>>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    Json(state.dashboard.lock().await.device_list().rows())
}
