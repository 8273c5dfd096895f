//! `manuplan-observability` — logging/tracing setup.

pub mod tracing;

pub use tracing::init;
