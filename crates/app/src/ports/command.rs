//! Command port: fire-and-forget messages to the external control channel.

use std::future::Future;

use powerhub_domain::error::PowerHubError;

/// Publishes a payload on a hierarchical topic.
///
/// Delivery is not acknowledged: the effect of a command only becomes
/// visible through a later snapshot.
pub trait CommandPublisher {
    /// Publish `payload` on `topic` (relative to the channel's base topic).
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send;
}

impl<T: CommandPublisher + Send + Sync> CommandPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        (**self).publish(topic, payload)
    }
}
