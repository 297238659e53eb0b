use crate::config::IndexerConfig;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use tracing_subscriber::filter::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";
const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

/// Serialize a generic object into its bincode byte representation.
pub fn serialize(obj: &impl Serialize) -> bincode::Result<Vec<u8>> {
    bincode::serialize(obj)
}

/// Deserialize a generic object from a bincode byte slice.
pub fn deserialize<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> bincode::Result<T> {
    bincode::deserialize(bytes)
}

/// Trim the leading '$' or '${' and trailing '}' from an environment variable.
///
/// Returns `None` for a malformed key, e.g. `${FOO` or an empty name.
pub fn trim_opt_env_key(key: &str) -> Option<&str> {
    // Abmiguous key: $FOO, non-ambiguous key: ${FOO}
    let name = match key.strip_prefix("${") {
        Some(rest) => rest.strip_suffix('}')?,
        None => key.strip_prefix('$')?,
    };
    match name.is_empty() {
        true => None,
        false => Some(name),
    }
}

/// Determine whether a given value refers to an environment variable.
pub fn is_opt_env_var(k: &str) -> bool {
    k.starts_with('$')
}

/// Initialize the logging context for the indexer.
///
/// `RUST_LOG` takes precedence over the configured log level. Setting
/// `HUMAN_LOGGING=false` switches the output to JSON.
pub fn init_logging(config: &IndexerConfig) -> anyhow::Result<()> {
    let filter = match env::var_os(RUST_LOG) {
        Some(_) => EnvFilter::try_from_default_env()?,
        None if config.verbose => EnvFilter::new("debug"),
        None => EnvFilter::new(&config.log_level),
    };

    let human_logging = match env::var(HUMAN_LOGGING) {
        Ok(s) => bool::from_str(&s).map_err(|_| {
            anyhow::anyhow!(
                "Expected `true` or `false` to be provided for `HUMAN_LOGGING`"
            )
        })?,
        Err(_) => crate::defaults::HUMAN_LOGGING,
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let res = if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
    };

    res.map_err(|e| anyhow::anyhow!("Could not initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_keys_are_trimmed() {
        assert!(is_opt_env_var("$FOO"));
        assert!(is_opt_env_var("${FOO}"));
        assert!(!is_opt_env_var("FOO"));

        assert_eq!(trim_opt_env_key("$FOO"), Some("FOO"));
        assert_eq!(trim_opt_env_key("${FOO}"), Some("FOO"));
    }

    #[test]
    fn test_malformed_env_var_keys_are_rejected() {
        assert_eq!(trim_opt_env_key("${"), None);
        assert_eq!(trim_opt_env_key("${FOO"), None);
        assert_eq!(trim_opt_env_key("${}"), None);
        assert_eq!(trim_opt_env_key("$"), None);
    }

    #[test]
    fn test_bincode_helpers_reverse_each_other() {
        let bytes = serialize(&(42u64, "debt".to_string())).unwrap();
        let (n, s): (u64, String) = deserialize(&bytes).unwrap();

        assert_eq!(n, 42);
        assert_eq!(s, "debt");
    }
}
