//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! - `GET  /`                           : power meter and device table
//! - `POST /power-meter/mode`           : switch absolute / relative arcs
//! - `POST /power-meter/reset`          : shrink the relative maximum
//! - `POST /power-meter/max-power`      : configure the relative maximum
//! - `POST /smart-home/{index}/toggle`  : switch a manual device
//! - `POST /smart-home/{index}/mode`    : switch automatic / manual
//!
//! The page reloads itself through `<meta http-equiv="refresh">`. Forms use
//! POST + redirect (PRG pattern) to avoid double-submission.

#[allow(clippy::missing_errors_doc)]
pub mod forms;
pub mod home;

use axum::Router;
use axum::routing::{get, post};

use powerhub_app::ports::{CommandPublisher, PreferenceStore};

use crate::state::AppState;

/// Build the dashboard sub-router.
pub fn routes<P, C>() -> Router<AppState<P, C>>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<P, C>))
        .route("/power-meter/mode", post(forms::toggle_mode::<P, C>))
        .route("/power-meter/reset", post(forms::reset::<P, C>))
        .route("/power-meter/max-power", post(forms::set_max_power::<P, C>))
        .route("/smart-home/{index}/toggle", post(forms::toggle_device::<P, C>))
        .route("/smart-home/{index}/mode", post(forms::toggle_device_mode::<P, C>))
}
