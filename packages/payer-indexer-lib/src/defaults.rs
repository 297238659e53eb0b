pub const LOG_LEVEL: &str = "info";

pub const VERBOSE_LOGGING: bool = false;

pub const HUMAN_LOGGING: bool = true;

/// Log levels accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
