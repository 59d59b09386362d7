//! One-shot control commands accepted by the box.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fire-and-forget command sent to the box's management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxCommand {
    /// Shut the box down completely.
    #[serde(rename = "powerdown")]
    PowerDown,
    /// Switch off the wireless radio but keep playing.
    StopWifi,
}

impl BoxCommand {
    /// Endpoint path relative to the box's base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::PowerDown => "api/powerdown",
            Self::StopWifi => "api/stop-wifi",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PowerDown => "powerdown",
            Self::StopWifi => "stop-wifi",
        }
    }
}

impl fmt::Display for BoxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
