//! MQTT adapter error types.

use powerhub_domain::error::PowerHubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The configured QoS level is not 0, 1 or 2.
    #[error("invalid MQTT QoS level {0}")]
    InvalidQos(u8),

    /// The request queue is full or the event loop is gone.
    #[error("MQTT client cannot accept the command")]
    Unavailable(#[source] rumqttc::ClientError),

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),
}

impl From<rumqttc::ClientError> for MqttError {
    fn from(err: rumqttc::ClientError) -> Self {
        if matches!(err, rumqttc::ClientError::TryRequest(_)) {
            Self::Unavailable(err)
        } else {
            Self::Client(err)
        }
    }
}

impl From<MqttError> for PowerHubError {
    fn from(err: MqttError) -> Self {
        PowerHubError::Storage(Box::new(err))
    }
}
