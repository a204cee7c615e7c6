//! Shared utilities for mgrant.

pub mod format;
pub mod logging;
pub mod time;

pub use format::{format_amount, format_compact, format_bps};
pub use logging::{init_tracing, LogFormat};
pub use time::{format_countdown, format_duration, format_relative};
