//! Dashboard home page: power meter and smart-home device table.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use powerhub_app::ports::{CommandPublisher, PreferenceStore};
use powerhub_domain::format::format_watt;
use powerhub_domain::preferences::DisplayPreferences;

use crate::state::AppState;

/// Home page template. `meter` and `table` are markup rendered by the
/// widget templates and embedded as-is.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    refresh_seconds: u32,
    meter: String,
    table: String,
    mode: &'static str,
    max_power_input: String,
    max_power: String,
}

impl HomeTemplate {
    fn new(
        refresh_seconds: u32,
        meter: String,
        table: String,
        preferences: DisplayPreferences,
    ) -> Self {
        Self {
            refresh_seconds,
            meter,
            table,
            mode: if preferences.relative_arc_mode {
                "Relativ"
            } else {
                "Absolut"
            },
            max_power_input: format!("{:.0}", preferences.max_power),
            max_power: format_watt(preferences.max_power),
        }
    }
}

impl IntoResponse for HomeTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /`: redraw both widgets and serve the page.
///
/// A failure to persist a raised maximum is logged; the page is served
/// regardless.
pub async fn index<P, C>(State(state): State<AppState<P, C>>) -> HomeTemplate
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    let mut dashboard = state.dashboard.lock().await;
    if let Err(err) = dashboard.update().await {
        tracing::warn!(error = %err, "dashboard update failed");
    }

    HomeTemplate::new(
        state.refresh_seconds,
        dashboard.power_meter().canvas().to_markup(),
        dashboard.device_list().canvas().to_markup(),
        dashboard.power_meter().preferences(),
    )
}
