use crate::{
    schema::{Debt, DebtChange},
    Database, Executor, IndexerResult, PayerIndexExecutor,
};
use payer_indexer_lib::{
    config::{DatabaseConfig, IndexerArgs, IndexerConfig},
    manifest::Manifest,
    utils::init_logging,
};
use payer_indexer_plugin::types::RawLog;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Entities held by the store after a replay.
#[derive(Debug, Serialize)]
pub struct Report {
    pub debts: Vec<Debt>,
    pub debt_changes: Vec<DebtChange>,
}

/// Open the configured store, replay the logs in `events` through the
/// manifest's handlers and persist the result.
///
/// The snapshot is written even when a handler fails, so events committed
/// before the failure are kept.
pub async fn replay(
    config: &IndexerConfig,
    manifest: Manifest,
    events: impl AsRef<Path>,
) -> IndexerResult<Report> {
    let db = match &config.database {
        DatabaseConfig::Memory => Database::new(),
        DatabaseConfig::Snapshot { path } => Database::open(path)?,
    };

    let events = events.as_ref();
    let contents = tokio::fs::read(events).await?;
    let logs: Vec<RawLog> = serde_json::from_slice(&contents)?;

    info!("Replaying {} log(s) from '{}'", logs.len(), events.display());

    let mut executor = PayerIndexExecutor::new(manifest, db)?;
    let res = executor.handle_events(logs).await;

    let db = executor.into_database();
    db.persist()?;

    let summary = res?;
    info!(
        "Replay finished: {} processed, {} skipped.",
        summary.processed, summary.skipped
    );

    Ok(Report {
        debts: db.entities()?,
        debt_changes: db.entities()?,
    })
}

pub async fn exec(args: IndexerArgs) -> anyhow::Result<()> {
    let IndexerArgs {
        manifest, events, ..
    } = args.clone();

    let config = match args.config.clone() {
        Some(path) => IndexerConfig::from_file(path)?,
        None => IndexerConfig::try_from(args)?,
    };

    init_logging(&config)?;

    info!("Configuration: {:?}", config);
    info!("Using {} database", config.database);
    info!("Using manifest file located at '{}'", manifest.display());

    let manifest = Manifest::from_file(&manifest)?;
    let report = replay(&config, manifest, events).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
