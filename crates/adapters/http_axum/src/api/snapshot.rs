//! JSON handlers for the energy snapshot feed.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use powerhub_app::ports::{CommandPublisher, PreferenceStore, SnapshotSource};
use powerhub_domain::snapshot::EnergySnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/snapshot`: the latest snapshot.
pub async fn get<P, C>(State(state): State<AppState<P, C>>) -> Json<EnergySnapshot>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    Json(EnergySnapshot::clone(&state.snapshots.current()))
}

/// `PUT /api/snapshot`: replace the readings.
///
/// Lets an external data layer push snapshots over HTTP. Display preferences
/// in the body are ignored; they belong to the dashboard.
pub async fn replace<P, C>(
    State(state): State<AppState<P, C>>,
    Json(snapshot): Json<EnergySnapshot>,
) -> Result<StatusCode, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state.snapshots.publish(snapshot)?;
    Ok(StatusCode::NO_CONTENT)
}
