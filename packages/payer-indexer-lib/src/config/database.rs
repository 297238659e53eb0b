use crate::{
    config::{Env, IndexerConfigError, IndexerConfigResult},
    utils::{is_opt_env_var, trim_opt_env_key},
};
use serde::Deserialize;
use std::fmt;

/// Where the indexer keeps its entities.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseConfig {
    /// Entities only live for the duration of the process.
    #[default]
    Memory,

    /// Entities are loaded from, and persisted to, a snapshot file.
    Snapshot { path: String },
}

impl DatabaseConfig {
    /// Snapshot file path, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            DatabaseConfig::Memory => None,
            DatabaseConfig::Snapshot { path } => Some(path),
        }
    }
}

impl Env for DatabaseConfig {
    fn inject_opt_env_vars(&mut self) -> IndexerConfigResult<()> {
        if let DatabaseConfig::Snapshot { path } = self {
            if is_opt_env_var(path) {
                let key = trim_opt_env_key(path).ok_or_else(|| {
                    IndexerConfigError::InvalidValue("database.snapshot.path".into())
                })?;
                *path = std::env::var(key)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseConfig::Memory => write!(f, "memory"),
            DatabaseConfig::Snapshot { path } => write!(f, "snapshot://{path}"),
        }
    }
}
