//! Outbound smart-home commands: topic path and payload.

use std::fmt;

use crate::error::ValidationError;
use crate::smart_home::device_number;

const TOPIC_PREFIX: &str = "config/set/SmartHome/";

/// A command for the external energy manager.
///
/// Topics are relative to the broker's base topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Switch a manually controlled device on or off.
    ManualControl { index: usize, on: bool },
    /// Switch a device between automatic and manual mode.
    Mode { index: usize, manual: bool },
}

impl DeviceCommand {
    /// Index of the addressed device in the full device list.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::ManualControl { index, .. } | Self::Mode { index, .. } => *index,
        }
    }

    /// Hierarchical topic path of the command.
    #[must_use]
    pub fn topic(&self) -> String {
        match self {
            Self::ManualControl { index, .. } => format!(
                "{TOPIC_PREFIX}Device{}/device_manual_control",
                device_number(*index)
            ),
            Self::Mode { index, .. } => {
                format!("{TOPIC_PREFIX}Devices/{}/mode", device_number(*index))
            }
        }
    }

    /// Decode a command received on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCommand`] when the topic is not a
    /// smart-home command, the device number is 0, or the payload is not
    /// `"0"` or `"1"`.
    pub fn parse(topic: &str, payload: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidCommand {
            topic: topic.to_string(),
            payload: payload.to_string(),
        };
        let flag = match payload.trim() {
            "1" => true,
            "0" => false,
            _ => return Err(invalid()),
        };
        let path = topic.strip_prefix(TOPIC_PREFIX).ok_or_else(invalid)?;
        let device_index = |number: &str| {
            number
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .ok_or_else(invalid)
        };

        if let Some(number) = path
            .strip_prefix("Device")
            .and_then(|rest| rest.strip_suffix("/device_manual_control"))
        {
            return Ok(Self::ManualControl {
                index: device_index(number)?,
                on: flag,
            });
        }
        if let Some(number) = path
            .strip_prefix("Devices/")
            .and_then(|rest| rest.strip_suffix("/mode"))
        {
            return Ok(Self::Mode {
                index: device_index(number)?,
                manual: flag,
            });
        }
        Err(invalid())
    }

    /// Binary payload: `"1"` for on / manual, `"0"` for off / automatic.
    #[must_use]
    pub fn payload(&self) -> &'static str {
        match self {
            Self::ManualControl { on: true, .. } | Self::Mode { manual: true, .. } => "1",
            Self::ManualControl { on: false, .. } | Self::Mode { manual: false, .. } => "0",
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.topic(), self.payload())
    }
}
