//! Observability module providing structured logging.
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber configured under `[observability.logging]`.

mod tracing_init;

pub use tracing_init::*;
