//! Form actions of the dashboard page.
//!
//! Every action runs to completion under the dashboard lock and redirects
//! back to `/` (PRG pattern).

use axum::extract::{Form, Path, State};
use axum::response::Redirect;
use serde::Deserialize;

use powerhub_app::ports::{CommandPublisher, PreferenceStore};

use crate::error::ApiError;
use crate::state::AppState;

/// Form body of `POST /power-meter/max-power`.
#[derive(Debug, Deserialize)]
pub struct MaxPowerForm {
    pub max_power: f64,
}

/// `POST /power-meter/mode`
pub async fn toggle_mode<P, C>(State(state): State<AppState<P, C>>) -> Result<Redirect, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state.dashboard.lock().await.toggle_mode().await?;
    Ok(Redirect::to("/"))
}

/// `POST /power-meter/reset`
pub async fn reset<P, C>(State(state): State<AppState<P, C>>) -> Result<Redirect, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state.dashboard.lock().await.reset().await?;
    Ok(Redirect::to("/"))
}

/// `POST /power-meter/max-power`
pub async fn set_max_power<P, C>(
    State(state): State<AppState<P, C>>,
    Form(form): Form<MaxPowerForm>,
) -> Result<Redirect, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state
        .dashboard
        .lock()
        .await
        .set_max_power(form.max_power)
        .await?;
    Ok(Redirect::to("/"))
}

/// `POST /smart-home/{index}/toggle`
pub async fn toggle_device<P, C>(
    State(state): State<AppState<P, C>>,
    Path(index): Path<usize>,
) -> Result<Redirect, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state.dashboard.lock().await.device_clicked(index).await?;
    Ok(Redirect::to("/"))
}

/// `POST /smart-home/{index}/mode`
pub async fn toggle_device_mode<P, C>(
    State(state): State<AppState<P, C>>,
    Path(index): Path<usize>,
) -> Result<Redirect, ApiError>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    state.dashboard.lock().await.mode_clicked(index).await?;
    Ok(Redirect::to("/"))
}
