//! Shared utilities for the device registry.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
