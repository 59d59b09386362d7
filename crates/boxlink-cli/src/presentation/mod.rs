//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: labels and line rendering, no state.

pub mod status_display;

pub use status_display::{
    OutputFormat, battery_label, format_heap, format_track, format_voltage, power_state_label,
    render_liveness, render_snapshot,
};
