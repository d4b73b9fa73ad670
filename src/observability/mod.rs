//! # Observability
//!
//! Structured logging for certwriter.

pub mod logging;

pub use logging::{init_logging, log_config_info};
