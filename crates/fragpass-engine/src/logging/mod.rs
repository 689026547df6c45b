//! Logging utilities.
//!
//! The engine logs through the `log` facade only; `init_logging` installs
//! `env_logger` for binaries and tests that want output.

mod init;

pub use init::{init_logging, LoggingConfig};
