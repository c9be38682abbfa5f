//! [`CommandPublisher`] backed by an MQTT broker.

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;

use powerhub_app::ports::CommandPublisher;
use powerhub_domain::error::PowerHubError;

use crate::config::MqttConfig;
use crate::error::MqttError;

const REQUEST_CAPACITY: usize = 10;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Publishes smart-home commands below the configured base topic.
///
/// Messages are never retained: a command replayed to a reconnecting energy
/// manager would switch devices unexpectedly.
#[derive(Clone)]
pub struct MqttCommandPublisher {
    client: AsyncClient,
    base_topic: String,
    qos: QoS,
}

impl MqttCommandPublisher {
    /// Create the client and spawn the task driving its event loop.
    ///
    /// The connection is established lazily by the event loop; connection
    /// failures are logged and retried, never returned from here.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::InvalidQos`] for a QoS level outside 0..=2.
    pub fn connect(config: &MqttConfig) -> Result<(Self, JoinHandle<()>), MqttError> {
        let qos = qos_from_level(config.qos)?;
        let client_id = format!("{}-{}", config.client_id, uuid::Uuid::new_v4().simple());
        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            %client_id,
            "connecting to MQTT broker"
        );

        let mut options = MqttOptions::new(client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        options.set_clean_session(true);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let handle = tokio::spawn(drive(eventloop));
        Ok((Self::new(client, &config.base_topic, qos), handle))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: AsyncClient, base_topic: &str, qos: QoS) -> Self {
        Self {
            client,
            base_topic: base_topic.trim_end_matches('/').to_string(),
            qos,
        }
    }

    /// Absolute topic of a command topic.
    #[must_use]
    pub fn full_topic(&self, topic: &str) -> String {
        format!("{}/{}", self.base_topic, topic.trim_start_matches('/'))
    }
}

impl CommandPublisher for MqttCommandPublisher {
    /// Hand the command to the event loop without waiting.
    ///
    /// While the broker is unreachable the request queue is not drained; once
    /// it is full, commands fail immediately instead of blocking the caller.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        let topic = self.full_topic(topic);
        tracing::debug!(%topic, "publishing MQTT command");
        let result = self
            .client
            .try_publish(topic, self.qos, false, payload.as_bytes().to_vec())
            .map_err(|err| {
                let err = MqttError::from(err);
                tracing::warn!(error = %err, "MQTT command not queued");
                PowerHubError::from(err)
            });
        async move { result }
    }
}

/// Map a numeric QoS level onto rumqttc's enum.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] for levels above 2.
pub fn qos_from_level(level: u8) -> Result<QoS, MqttError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(MqttError::InvalidQos(other)),
    }
}

async fn drive(mut eventloop: EventLoop) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("connected to MQTT broker");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "MQTT event loop error");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher(base_topic: &str) -> (MqttCommandPublisher, EventLoop) {
        let options = MqttOptions::new("test", "localhost", 1883);
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        (
            MqttCommandPublisher::new(client, base_topic, QoS::AtMostOnce),
            eventloop,
        )
    }

    #[test]
    fn should_prefix_command_topic_with_base_topic() {
        let (publisher, _eventloop) = publisher("openWB");
        assert_eq!(
            publisher.full_topic("config/set/SmartHome/Device1/device_manual_control"),
            "openWB/config/set/SmartHome/Device1/device_manual_control"
        );
    }

    #[test]
    fn should_not_double_slashes() {
        let (publisher, _eventloop) = publisher("openWB/");
        assert_eq!(
            publisher.full_topic("/config/set/SmartHome/Devices/2/mode"),
            "openWB/config/set/SmartHome/Devices/2/mode"
        );
    }

    #[test]
    fn should_map_qos_levels() {
        assert_eq!(qos_from_level(0).unwrap(), QoS::AtMostOnce);
        assert_eq!(qos_from_level(1).unwrap(), QoS::AtLeastOnce);
        assert_eq!(qos_from_level(2).unwrap(), QoS::ExactlyOnce);
        assert!(matches!(qos_from_level(3), Err(MqttError::InvalidQos(3))));
    }

    #[tokio::test]
    async fn should_queue_command_while_event_loop_is_alive() {
        let (publisher, _eventloop) = publisher("openWB");

        let result = publisher
            .publish("config/set/SmartHome/Device1/device_manual_control", "1")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_fail_fast_when_request_queue_is_full() {
        // The event loop is never polled, as with an unreachable broker.
        let (publisher, _eventloop) = publisher("openWB");
        for _ in 0..REQUEST_CAPACITY {
            publisher
                .publish("config/set/SmartHome/Devices/1/mode", "1")
                .await
                .unwrap();
        }

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            publisher.publish("config/set/SmartHome/Devices/1/mode", "0"),
        )
        .await
        .expect("publish must not wait for queue space");

        assert!(matches!(result, Err(PowerHubError::Storage(_))));
    }
}
