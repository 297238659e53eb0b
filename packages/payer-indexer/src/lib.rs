#![deny(unused_crate_dependencies)]
pub mod cli;
pub(crate) mod commands;
pub mod database;
pub mod decoder;
pub mod executor;
pub mod handlers;
pub mod schema;

pub use commands::run::{replay, Report};
pub use database::{Database, DatabaseError};
pub use decoder::{decode_log, DecodeError};
pub use executor::{ExecutionSummary, Executor, PayerIndexExecutor};
pub use payer_indexer_lib::{
    config::{IndexerConfig, IndexerConfigError},
    manifest::{Manifest, ManifestError},
};
pub use payer_indexer_plugin::EntityError;
pub use schema::{Debt, DebtChange};
use thiserror::Error;

pub mod prelude {
    pub use super::{
        Database, Debt, DebtChange, ExecutionSummary, Executor, IndexerConfig,
        IndexerError, IndexerResult, Manifest, PayerIndexExecutor, Report,
    };
    pub use payer_indexer_types::prelude::*;
}

pub type IndexerResult<T> = core::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Entity error: {0}")]
    EntityError(#[from] EntityError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),
    #[error("Manifest error: {0:?}")]
    ManifestError(#[from] ManifestError),
    #[error("Config error: {0:?}")]
    ConfigError(#[from] IndexerConfigError),
    #[error("IO Error: {0:#?}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Missing handler '{0}'.")]
    MissingHandler(String),
    #[error("Handler '{handler}' cannot handle '{event}' events.")]
    HandlerMismatch { event: String, handler: String },
}
