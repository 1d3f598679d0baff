//! Shared utilities for the DAC custodian workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};
