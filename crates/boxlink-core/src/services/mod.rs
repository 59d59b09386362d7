//! Core services.
//!
//! Services depend only on ports and domain types; adapters are injected at
//! the composition root.

mod connection_manager;

pub use connection_manager::ConnectionManager;
