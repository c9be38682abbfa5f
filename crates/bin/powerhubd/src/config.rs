//! Daemon configuration.
//!
//! Read from `powerhub.toml` in the working directory when present; every
//! field is defaulted. `POWERHUB_*` variables (and `RUST_LOG`) win over the
//! file, and a malformed variable is an error rather than silently skipped.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use powerhub_adapter_mqtt::MqttConfig;
use powerhub_adapter_virtual::SimulationConfig;
use powerhub_domain::theme::Theme;

const CONFIG_FILE: &str = "powerhub.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// Command channel to the energy manager.
    pub mqtt: MqttConfig,
    /// Simulated energy system, feeding snapshots and accepting commands.
    pub simulation: SimulationConfig,
    pub dashboard: DashboardConfig,
    /// Colour overrides for the widgets.
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Where display preferences are kept.
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `<meta http-equiv="refresh">` interval of the page.
    pub refresh_seconds: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:powerhub.db".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "powerhubd=info,powerhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_seconds: 5 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read powerhub.toml")]
    Io(#[from] std::io::Error),
    #[error("failed to parse powerhub.toml")]
    Parse(#[from] toml::de::Error),
    #[error("environment variable {name} has invalid value {value:?}")]
    Env { name: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Validation(&'static str),
}

impl Config {
    /// Load the file, apply the process environment and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unreadable or malformed file, a
    /// malformed variable, or an unusable combination of settings.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply overrides read through `lookup`. Later variables win, so
    /// `POWERHUB_BIND` beats `POWERHUB_HOST`/`POWERHUB_PORT` and `RUST_LOG`
    /// beats `POWERHUB_LOG`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = lookup("POWERHUB_HOST") {
            self.server.host = parse("POWERHUB_HOST", value)?;
        }
        if let Some(value) = lookup("POWERHUB_PORT") {
            self.server.port = parse("POWERHUB_PORT", value)?;
        }
        if let Some(value) = lookup("POWERHUB_BIND") {
            let bind: SocketAddr = parse("POWERHUB_BIND", value)?;
            self.server.host = bind.ip();
            self.server.port = bind.port();
        }
        if let Some(value) = lookup("POWERHUB_DATABASE_URL") {
            self.database.url = value;
        }
        for name in ["POWERHUB_LOG", "RUST_LOG"] {
            if let Some(value) = lookup(name) {
                self.logging.filter = value;
            }
        }
        if let Some(value) = lookup("POWERHUB_MQTT_HOST") {
            self.mqtt.broker_host = value;
            self.mqtt.enabled = true;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero"));
        }
        if self.simulation.enabled && self.simulation.tick_secs == 0 {
            return Err(ConfigError::Validation("simulation.tick_secs must be non-zero"));
        }
        if !self.mqtt.enabled && !self.simulation.enabled {
            return Err(ConfigError::Validation(
                "enable mqtt or the simulation to receive device commands",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Env { name, value })
}
