//! Shared utilities for stockdash
//!
//! Logging setup used by every binary in the workspace.

pub mod logging;

pub use logging::{DEFAULT_FILTER, LogFormat, init_tracing};
