use crate::defaults;
pub use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "Payer Indexer",
    about = "Replay Payer contract logs into Debt and DebtChange entities.",
    version
)]
pub struct IndexerArgs {
    /// Log level passed to the Payer indexer.
    #[clap(long, default_value = defaults::LOG_LEVEL, value_parser(defaults::LOG_LEVELS), help = "Log level passed to the Payer indexer.")]
    pub log_level: String,

    /// Indexer service config file.
    #[clap(
        short,
        long,
        value_name = "FILE",
        help = "Indexer service config file."
    )]
    pub config: Option<PathBuf>,

    /// Indexer manifest file.
    #[clap(short, long, value_name = "FILE", help = "Indexer manifest file.")]
    pub manifest: PathBuf,

    /// JSON file holding the raw logs to replay, in delivery order.
    #[clap(
        short,
        long,
        value_name = "FILE",
        help = "JSON file holding the raw logs to replay, in delivery order."
    )]
    pub events: PathBuf,

    /// Snapshot file the entities are loaded from and persisted to.
    #[clap(
        long,
        value_name = "FILE",
        help = "Snapshot file the entities are loaded from and persisted to."
    )]
    pub database_path: Option<String>,

    /// Enable verbose logging.
    #[clap(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}
