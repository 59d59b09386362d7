//! Domain types for the box's status feed and control surface.
//!
//! These are pure value types with no infrastructure dependencies.

mod command;
mod snapshot;

pub use command::BoxCommand;
pub use snapshot::{
    AudioStatus, BatteryLevel, DecodeError, PowerState, PowerStatus, StatusSnapshot,
};
