//! Status snapshot pushed by the box on every status event.
//!
//! Each event carries a complete snapshot, never a delta, so consumers only
//! ever replace a snapshot wholesale. Field names follow the device's JSON
//! encoding (camelCase).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

/// Discretized battery level reported by the box.
///
/// Encoded on the wire as an integer. Any value outside the known set decodes
/// to [`BatteryLevel::Invalid`] instead of failing the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum BatteryLevel {
    /// Battery is exhausted, the box is shutting itself down.
    PowerOff,
    Critical,
    Low,
    Full,
    /// The device reported a value outside the known enumeration.
    Invalid,
}

impl BatteryLevel {
    /// Lower-case label used for display and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOff => "poweroff",
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Full => "full",
            Self::Invalid => "invalid",
        }
    }
}

impl From<i64> for BatteryLevel {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::PowerOff,
            1 => Self::Critical,
            2 => Self::Low,
            3 => Self::Full,
            _ => Self::Invalid,
        }
    }
}

impl From<BatteryLevel> for i64 {
    fn from(level: BatteryLevel) -> Self {
        match level {
            BatteryLevel::PowerOff => 0,
            BatteryLevel::Critical => 1,
            BatteryLevel::Low => 2,
            BatteryLevel::Full => 3,
            BatteryLevel::Invalid => -1,
        }
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discretized power supply state reported by the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PowerState {
    Discharging,
    Charging,
    /// Running from external power with a full battery.
    Standby,
    /// The device reported a value outside the known enumeration.
    Invalid,
}

impl PowerState {
    /// Lower-case label used for display and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discharging => "discharging",
            Self::Charging => "charging",
            Self::Standby => "standby",
            Self::Invalid => "invalid",
        }
    }
}

impl From<i64> for PowerState {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Discharging,
            1 => Self::Charging,
            2 => Self::Standby,
            _ => Self::Invalid,
        }
    }
}

impl From<PowerState> for i64 {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::Discharging => 0,
            PowerState::Charging => 1,
            PowerState::Standby => 2,
            PowerState::Invalid => -1,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio playback section of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStatus {
    pub is_playing: bool,
    /// Free-text album identifier, empty when nothing is loaded.
    pub current_album: String,
    /// Zero-based track index, `-1` when no track is selected.
    pub current_track: i32,
    pub volume: i32,
}

impl AudioStatus {
    /// Track index, or `None` when the box reports no current track.
    pub const fn track_number(&self) -> Option<i32> {
        if self.current_track < 0 {
            None
        } else {
            Some(self.current_track)
        }
    }
}

/// Power section of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    /// Battery voltage in millivolts.
    pub voltage: i32,
    pub level: BatteryLevel,
    pub state: PowerState,
}

impl PowerStatus {
    /// Battery voltage in volts.
    pub fn volts(&self) -> f64 {
        f64::from(self.voltage) / 1000.0
    }
}

/// One complete status report from the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub audio: AudioStatus,
    pub power: PowerStatus,
    /// Free heap in bytes, `-1` when unknown.
    pub heap: i64,
}

impl StatusSnapshot {
    /// Decode a snapshot from a raw event payload.
    ///
    /// Unknown fields are ignored; missing or mistyped fields are an error.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Free heap in bytes, or `None` when the box does not know.
    pub fn heap_bytes(&self) -> Option<u64> {
        u64::try_from(self.heap).ok()
    }
}

/// Failure to decode a status payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("status payload is not valid JSON: {0}")]
    Syntax(serde_json::Error),

    /// The payload is JSON but does not have the snapshot's shape.
    #[error("status payload does not match the snapshot schema: {0}")]
    Schema(serde_json::Error),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Schema(err),
            Category::Io | Category::Syntax | Category::Eof => Self::Syntax(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_PAYLOAD: &str = r#"{
        "power": {"voltage": 12000, "level": 3, "state": 1},
        "audio": {"isPlaying": false, "currentTrack": -1, "currentAlbum": "", "volume": 0},
        "heap": 45000
    }"#;

    #[test]
    fn test_decode_scenario_payload() {
        let snapshot = StatusSnapshot::decode(SCENARIO_PAYLOAD).unwrap();

        assert_eq!(snapshot.power.voltage, 12000);
        assert_eq!(snapshot.power.level, BatteryLevel::Full);
        assert_eq!(snapshot.power.state, PowerState::Charging);
        assert!(!snapshot.audio.is_playing);
        assert_eq!(snapshot.audio.current_track, -1);
        assert_eq!(snapshot.audio.current_album, "");
        assert_eq!(snapshot.audio.volume, 0);
        assert_eq!(snapshot.heap, 45000);
    }

    #[test]
    fn test_unknown_enum_values_decode_to_invalid() {
        let payload = r#"{
            "power": {"voltage": 3300, "level": 17, "state": -4},
            "audio": {"isPlaying": true, "currentTrack": 2, "currentAlbum": "abc", "volume": 5},
            "heap": -1
        }"#;
        let snapshot = StatusSnapshot::decode(payload).unwrap();

        assert_eq!(snapshot.power.level, BatteryLevel::Invalid);
        assert_eq!(snapshot.power.state, PowerState::Invalid);
        assert_eq!(snapshot.heap_bytes(), None);
    }

    #[test]
    fn test_encode_uses_device_field_names() {
        let snapshot = StatusSnapshot::decode(SCENARIO_PAYLOAD).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["audio"]["isPlaying"], false);
        assert_eq!(json["audio"]["currentTrack"], -1);
        assert_eq!(json["power"]["level"], 3);
        assert_eq!(json["power"]["state"], 1);

        let again: StatusSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(again, snapshot);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let payload = r#"{
            "power": {"voltage": 1, "level": 0, "state": 2, "temperature": 30},
            "audio": {"isPlaying": false, "currentTrack": 0, "currentAlbum": "x", "volume": 1},
            "heap": 10,
            "uptime": 99
        }"#;
        let snapshot = StatusSnapshot::decode(payload).unwrap();
        assert_eq!(snapshot.power.level, BatteryLevel::PowerOff);
        assert_eq!(snapshot.power.state, PowerState::Standby);
    }

    #[test]
    fn test_decode_error_classification() {
        assert!(matches!(
            StatusSnapshot::decode("hulpe"),
            Err(DecodeError::Syntax(_))
        ));
        assert!(matches!(
            StatusSnapshot::decode(r#"{"heap": 1"#),
            Err(DecodeError::Syntax(_))
        ));
        assert!(matches!(
            StatusSnapshot::decode(r#"{"heap": 1}"#),
            Err(DecodeError::Schema(_))
        ));
        assert!(matches!(
            StatusSnapshot::decode(r#"{"power": {"voltage": "high", "level": 1, "state": 1}, "audio": {"isPlaying": false, "currentTrack": 0, "currentAlbum": "", "volume": 0}, "heap": 1}"#),
            Err(DecodeError::Schema(_))
        ));
    }

    #[test]
    fn test_display_helpers() {
        let snapshot = StatusSnapshot::decode(SCENARIO_PAYLOAD).unwrap();

        assert!((snapshot.power.volts() - 12.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.audio.track_number(), None);
        assert_eq!(snapshot.heap_bytes(), Some(45000));
        assert_eq!(BatteryLevel::Critical.to_string(), "critical");
        assert_eq!(PowerState::Standby.to_string(), "standby");
        assert_eq!(i64::from(BatteryLevel::Invalid), -1);
    }
}
