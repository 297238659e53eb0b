pub mod cli;
pub mod database;

pub use crate::{
    config::{cli::IndexerArgs, database::DatabaseConfig},
    defaults,
};
pub use clap::Parser;
use serde::Deserialize;
use std::{fs::File, io::Error, path::Path};
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Error type returned by configuration operations.
#[derive(Error, Debug)]
pub enum IndexerConfigError {
    #[error("Error parsing env variables from config: {0:?}")]
    EnvVarParseError(#[from] std::env::VarError),
    #[error("Error processing file: {0:?}")]
    ConfigFileError(#[from] Error),
    #[error("Error processing YAML file: {0:?}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("Invalid value for '{0}' in config file.")]
    InvalidValue(String),
}

/// Result type returned by configuration operations.
pub type IndexerConfigResult<T> = core::result::Result<T, IndexerConfigError>;

/// Environment variables consulted when an option is not given explicitly.
#[derive(Debug, EnumString, AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "PAYER_INDEXER_DATABASE_PATH")]
    DatabasePath,
}

/// Return the value of an environment variable, if it is set.
pub fn env_var(var: EnvVar) -> Option<String> {
    std::env::var(var.as_ref()).ok()
}

pub trait Env {
    fn inject_opt_env_vars(&mut self) -> IndexerConfigResult<()>;
}

/// Payer indexer configuration.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct IndexerConfig {
    pub log_level: String,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            verbose: defaults::VERBOSE_LOGGING,
            database: DatabaseConfig::default(),
        }
    }
}

impl TryFrom<IndexerArgs> for IndexerConfig {
    type Error = IndexerConfigError;

    fn try_from(args: IndexerArgs) -> IndexerConfigResult<Self> {
        let database = match args
            .database_path
            .or_else(|| env_var(EnvVar::DatabasePath))
        {
            Some(path) => DatabaseConfig::Snapshot { path },
            None => DatabaseConfig::Memory,
        };

        let mut config = IndexerConfig {
            log_level: args.log_level,
            verbose: args.verbose,
            database,
        };

        config.inject_opt_env_vars()?;

        Ok(config)
    }
}

impl IndexerConfig {
    // When building the config via a file, if any section (e.g., database),
    // or if any individual setting is empty, replace it with its respective
    // default value.
    pub fn from_file(path: impl AsRef<Path>) -> IndexerConfigResult<Self> {
        let file = File::open(path)?;

        let mut config = IndexerConfig::default();

        let content: serde_yaml::Value = serde_yaml::from_reader(file)?;

        let log_level_key = serde_yaml::Value::String("log_level".into());
        let verbose_key = serde_yaml::Value::String("verbose".into());
        let database_config_key = serde_yaml::Value::String("database".into());

        if let Some(log_level) = content.get(log_level_key) {
            config.log_level = log_level
                .as_str()
                .ok_or_else(|| IndexerConfigError::InvalidValue("log_level".into()))?
                .to_string();
        }

        if let Some(verbose) = content.get(verbose_key) {
            config.verbose = verbose
                .as_bool()
                .ok_or_else(|| IndexerConfigError::InvalidValue("verbose".into()))?;
        }

        if let Some(section) = content.get(database_config_key) {
            let snapshot_section =
                section.get(&serde_yaml::Value::String("snapshot".into()));

            if let Some(snapshot_section) = snapshot_section {
                let path = snapshot_section
                    .get(&serde_yaml::Value::String("path".into()))
                    .and_then(|p| p.as_str())
                    .ok_or_else(|| {
                        IndexerConfigError::InvalidValue("database.snapshot.path".into())
                    })?;

                config.database = DatabaseConfig::Snapshot {
                    path: path.to_string(),
                };
            }
        }

        config.inject_opt_env_vars()?;

        Ok(config)
    }

    // Inject env vars into each section of the config
    pub fn inject_opt_env_vars(&mut self) -> IndexerConfigResult<()> {
        self.database.inject_opt_env_vars()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_indexer_config_will_supplement_top_level_config_vars() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = write_config(
            &dir,
            "config1.yaml",
            r#"
    verbose: true
    "#,
        );

        let config = IndexerConfig::from_file(file_path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database, DatabaseConfig::Memory);
    }

    #[test]
    fn test_indexer_config_reads_snapshot_section() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = write_config(
            &dir,
            "config2.yaml",
            r#"
    log_level: debug

    ## Database configuration options.
    #
    database:
      snapshot:
        path: /var/lib/payer/debts.bin
    "#,
        );

        let config = IndexerConfig::from_file(file_path).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database.path(), Some("/var/lib/payer/debts.bin"));
    }

    #[test]
    fn test_indexer_config_injects_env_vars_into_snapshot_path() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = write_config(
            &dir,
            "config3.yaml",
            r#"
    database:
      snapshot:
        path: ${PAYER_TEST_SNAPSHOT_PATH}
    "#,
        );

        std::env::set_var("PAYER_TEST_SNAPSHOT_PATH", "/tmp/payer.bin");
        let config = IndexerConfig::from_file(file_path).unwrap();

        assert_eq!(config.database.path(), Some("/tmp/payer.bin"));
    }

    #[test]
    fn test_indexer_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = write_config(&dir, "config4.yaml", "verbose: sometimes\n");

        let err = IndexerConfig::from_file(file_path).unwrap_err();

        assert!(matches!(err, IndexerConfigError::InvalidValue(k) if k == "verbose"));
    }

    #[test]
    fn test_indexer_config_from_args() {
        let args = IndexerArgs::parse_from([
            "payer-indexer",
            "--manifest",
            "payer.manifest.yaml",
            "--events",
            "logs.json",
            "--database-path",
            "debts.bin",
            "--log-level",
            "warn",
        ]);

        let config = IndexerConfig::try_from(args).unwrap();

        assert_eq!(config.log_level, "warn");
        assert!(!config.verbose);
        assert_eq!(
            config.database,
            DatabaseConfig::Snapshot {
                path: "debts.bin".to_string()
            }
        );
    }

    #[test]
    fn test_indexer_config_rejects_malformed_env_var_path() {
        for path in ["${", "${PAYER_TEST_UNCLOSED"] {
            let args = IndexerArgs::parse_from([
                "payer-indexer",
                "--manifest",
                "payer.manifest.yaml",
                "--events",
                "logs.json",
                "--database-path",
                path,
            ]);

            let err = IndexerConfig::try_from(args).unwrap_err();

            assert!(
                matches!(&err, IndexerConfigError::InvalidValue(k) if k == "database.snapshot.path"),
                "unexpected error for {path}: {err:?}"
            );
        }
    }

    #[test]
    fn test_database_config_display() {
        assert_eq!(DatabaseConfig::Memory.to_string(), "memory");
        assert_eq!(
            DatabaseConfig::Snapshot {
                path: "debts.bin".to_string()
            }
            .to_string(),
            "snapshot://debts.bin"
        );
    }
}
