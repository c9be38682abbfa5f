//! # powerhubd: powerhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Restore the saved display preferences
//! - Start the data feed (virtual energy system) and the command channel
//!   (MQTT or the virtual energy system)
//! - Build the axum router, injecting the dashboard and its ports
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use powerhub_adapter_http_axum::router;
use powerhub_adapter_http_axum::state::AppState;
use powerhub_adapter_mqtt::MqttCommandPublisher;
use powerhub_adapter_storage_sqlite_sqlx::{SqlitePreferenceStore, connect_and_migrate};
use powerhub_adapter_virtual::VirtualEnergySystem;
use powerhub_app::ports::{CommandPublisher, PreferenceStore};
use powerhub_app::preferences::MirroredPreferenceStore;
use powerhub_app::snapshot_store::InProcessSnapshotStore;
use powerhub_domain::snapshot::EnergySnapshot;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database
    let pool = connect_and_migrate(config.database_url())
        .await
        .context("failed to initialise database")?;

    // Snapshot store and preferences
    let snapshots = Arc::new(InProcessSnapshotStore::new(EnergySnapshot::empty(
        &config.theme,
    )));
    let preferences = Arc::new(MirroredPreferenceStore::new(
        SqlitePreferenceStore::new(pool),
        Arc::clone(&snapshots),
    ));
    preferences
        .restore()
        .await
        .context("failed to restore display preferences")?;

    // Data feed
    let mut tasks = Vec::new();
    let simulation = config
        .simulation
        .enabled
        .then(|| Arc::new(VirtualEnergySystem::new(config.theme.clone())));
    if let Some(system) = &simulation {
        tasks.push(Arc::clone(system).spawn(Arc::clone(&snapshots), &config.simulation));
    }

    // Command channel
    let result = match (config.mqtt.enabled, simulation) {
        (true, _) => {
            let (publisher, handle) = MqttCommandPublisher::connect(&config.mqtt)
                .context("failed to set up MQTT client")?;
            tasks.push(handle);
            serve(&config, snapshots, preferences, Arc::new(publisher)).await
        }
        (false, Some(system)) => serve(&config, snapshots, preferences, system).await,
        (false, None) => Err(anyhow::anyhow!("no command channel configured")),
    };

    for task in tasks {
        task.abort();
    }
    tracing::info!("powerhubd stopped");
    result
}

async fn serve<P, C>(
    config: &Config,
    snapshots: Arc<InProcessSnapshotStore>,
    preferences: Arc<P>,
    publisher: Arc<C>,
) -> anyhow::Result<()>
where
    P: PreferenceStore + Send + Sync + 'static,
    C: CommandPublisher + Send + Sync + 'static,
{
    let state = AppState::new(
        snapshots,
        preferences,
        publisher,
        config.theme.clone(),
        config.dashboard.refresh_seconds,
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "powerhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
