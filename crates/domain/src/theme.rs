//! Theme colour tokens resolved once when a view is initialised.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CSS colour value (`#rrggbb`, `rgb(…)`, a named colour, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Named colours of the active dashboard theme.
///
/// Missing fields fall back to the dark default palette, so a configuration
/// file only has to list the colours it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub house: ColorToken,
    pub pv: ColorToken,
    pub export: ColorToken,
    pub grid: ColorToken,
    pub background: ColorToken,
    pub charging: ColorToken,
    pub axis: ColorToken,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            house: ColorToken::new("#5bc0de"),
            pv: ColorToken::new("#9ccc65"),
            export: ColorToken::new("#66bb6a"),
            grid: ColorToken::new("#ef5350"),
            background: ColorToken::new("#1e1e1e"),
            charging: ColorToken::new("#42a5f5"),
            axis: ColorToken::new("#a0a0a0"),
        }
    }
}
