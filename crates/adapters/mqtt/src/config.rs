//! MQTT broker configuration.

use serde::Deserialize;

/// Configuration for the MQTT command channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Publish commands to the broker. When disabled the simulated energy
    /// system receives them instead.
    pub enabled: bool,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier prefix. A random suffix is appended so that
    /// several dashboards can share one broker.
    pub client_id: String,
    /// Prefix of every command topic.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Quality of service level: 0, 1 or 2.
    pub qos: u8,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "powerhub".to_string(),
            base_topic: "openWB".to_string(),
            keep_alive_secs: 30,
            qos: 0,
            username: None,
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "powerhub");
        assert_eq!(config.base_topic, "openWB");
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.qos, 0);
        assert!(config.username.is_none());
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            enabled = true
            broker_host = "openwb.local"
            broker_port = 8883
            client_id = "wall-panel"
            base_topic = "openWB-2"
            keep_alive_secs = 60
            qos = 1
            username = "panel"
            password = "secret"
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert!(config.enabled);
        assert_eq!(config.broker_host, "openwb.local");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "wall-panel");
        assert_eq!(config.base_topic, "openWB-2");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.qos, 1);
        assert_eq!(config.username.as_deref(), Some("panel"));
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.base_topic, "openWB");
    }
}
