//! Server-Sent Events (SSE) stream of energy snapshots.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use powerhub_app::ports::{CommandPublisher, PreferenceStore};

use crate::state::AppState;

/// `GET /api/snapshot/stream`: SSE stream of snapshots.
///
/// Sends the current snapshot first, then one JSON-encoded `data:` frame per
/// change. The stream continues until the client disconnects.
pub async fn stream<P, C>(
    State(state): State<AppState<P, C>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    let snapshots = WatchStream::new(state.snapshots.subscribe()).filter_map(|snapshot| {
        match serde_json::to_string(&*snapshot) {
            Ok(json) => Some(Ok(Event::default().event("snapshot").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize snapshot for SSE stream");
                None
            }
        }
    });

    Sse::new(snapshots).keep_alive(KeepAlive::default())
}
