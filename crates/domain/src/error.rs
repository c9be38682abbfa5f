//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PowerHubError`] via `From` at the port boundary.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PowerHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Failure inside an adapter (database, broker, …).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("power of {category} must be a finite, non-negative number of watts, got {value}")]
    InvalidPower { category: String, value: f64 },

    #[error("energy of device {device} must be a finite, non-negative number of kWh, got {value}")]
    InvalidEnergy { device: String, value: f64 },

    #[error("state of charge of {subject} must be within 0..=100, got {value}")]
    StateOfChargeOutOfRange { subject: String, value: u8 },

    #[error("maximum power must be a finite, non-negative number of watts, got {0}")]
    InvalidMaxPower(f64),

    #[error("unrecognised command {payload:?} on topic {topic}")]
    InvalidCommand { topic: String, payload: String },
}

/// A referenced item does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
