//! # powerhub-adapter-mqtt
//!
//! MQTT adapter: sends smart-home commands to the energy manager.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the connection alive
//! - Prefix command topics with the configured base topic (`openWB`)
//! - Publish fire-and-forget, non-retained messages
//!
//! The effect of a command is observed through the next energy snapshot,
//! not through an acknowledgement.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `powerhub-app` and `powerhub-domain`.

pub mod config;
pub mod error;
pub mod publisher;

pub use config::MqttConfig;
pub use error::MqttError;
pub use publisher::MqttCommandPublisher;
