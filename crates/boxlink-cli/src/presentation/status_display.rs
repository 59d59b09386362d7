//! Status snapshot rendering for terminal output.
//!
//! Labels match the ones the box's own web UI shows.

use std::fmt::Display;

use boxlink_core::{AudioStatus, BatteryLevel, PowerState, PowerStatus, StatusSnapshot};
use chrono::{DateTime, TimeZone};
use serde_json::json;

/// How `watch` prints its lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, one line per update.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

pub const fn battery_label(level: BatteryLevel) -> &'static str {
    match level {
        BatteryLevel::Critical => "kritisch",
        BatteryLevel::Full => "voll",
        BatteryLevel::Low => "niedrig",
        BatteryLevel::PowerOff => "Box schaltet jetzt ab",
        BatteryLevel::Invalid => "invalid",
    }
}

pub const fn power_state_label(state: PowerState) -> &'static str {
    match state {
        PowerState::Charging => "wird geladen",
        PowerState::Discharging => "wird entladen",
        PowerState::Standby => "Netz",
        PowerState::Invalid => "invalid",
    }
}

/// Millivolts as volts with two decimals, e.g. `12.00 V`.
pub fn format_voltage(power: &PowerStatus) -> String {
    format!("{:.2} V", power.volts())
}

pub fn format_track(audio: &AudioStatus) -> String {
    audio
        .track_number()
        .map_or_else(|| "-".to_string(), |track| track.to_string())
}

pub fn format_heap(snapshot: &StatusSnapshot) -> String {
    snapshot
        .heap_bytes()
        .map_or_else(|| "-".to_string(), |bytes| format!("{bytes} B"))
}

/// One output line for a snapshot received at `at`.
pub fn render_snapshot<Tz>(
    snapshot: &StatusSnapshot,
    at: &DateTime<Tz>,
    format: OutputFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match format {
        OutputFormat::Text => {
            let audio = &snapshot.audio;
            let power = &snapshot.power;
            let album = if audio.current_album.is_empty() {
                "-"
            } else {
                audio.current_album.as_str()
            };
            format!(
                "[{}] {} album {} track {} volume {} | battery {}, {}, {} | heap {}",
                at.format("%H:%M:%S"),
                if audio.is_playing { "playing" } else { "paused" },
                album,
                format_track(audio),
                audio.volume,
                battery_label(power.level),
                power_state_label(power.state),
                format_voltage(power),
                format_heap(snapshot),
            )
        }
        OutputFormat::Json => json!({
            "at": at.to_rfc3339(),
            "status": snapshot,
        })
        .to_string(),
    }
}

/// One output line for a liveness transition.
pub fn render_liveness<Tz>(connected: bool, at: &DateTime<Tz>, format: OutputFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match format {
        OutputFormat::Text => {
            let state = if connected {
                "live"
            } else {
                "stale, waiting for status"
            };
            format!("[{}] link {state}", at.format("%H:%M:%S"))
        }
        OutputFormat::Json => json!({
            "at": at.to_rfc3339(),
            "connected": connected,
        })
        .to_string(),
    }
}
