//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod snapshot;
pub mod sse;
pub mod widgets;

use axum::Router;
use axum::routing::get;

use powerhub_app::ports::{CommandPublisher, PreferenceStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<P, C>() -> Router<AppState<P, C>>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/snapshot",
            get(snapshot::get::<P, C>).put(snapshot::replace::<P, C>),
        )
        .route("/snapshot/stream", get(sse::stream::<P, C>))
        .route("/power-meter", get(widgets::power_meter::<P, C>))
        .route("/smart-home", get(widgets::smart_home::<P, C>))
}
