use crate::{
    database::Database,
    decoder::decode_log,
    handlers::{
        handle_paid_back_debt, handle_registered_debt, HANDLE_PAID_BACK_DEBT,
        HANDLE_REGISTERED_DEBT,
    },
    IndexerError, IndexerResult,
};
use async_trait::async_trait;
use payer_indexer_lib::manifest::Manifest;
use payer_indexer_plugin::types::{PaidBackDebt, PayerEvent, RawLog, RegisteredDebt};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait Executor
where
    Self: Sized,
{
    async fn handle_events(&mut self, logs: Vec<RawLog>) -> IndexerResult<ExecutionSummary>;
}

/// Counts of the logs seen by one call to [`Executor::handle_events`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Logs that were dispatched to a handler and committed.
    pub processed: usize,
    /// Logs that were filtered out, failed to decode, or had no handler.
    pub skipped: usize,
}

/// Handlers an event can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    RegisteredDebt,
    PaidBackDebt,
}

impl Handler {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            HANDLE_REGISTERED_DEBT => Some(Self::RegisteredDebt),
            HANDLE_PAID_BACK_DEBT => Some(Self::PaidBackDebt),
            _ => None,
        }
    }

    /// Event the handler accepts.
    fn event_name(&self) -> &'static str {
        match self {
            Self::RegisteredDebt => RegisteredDebt::NAME,
            Self::PaidBackDebt => PaidBackDebt::NAME,
        }
    }
}

/// Runs the Payer handlers natively against a [`Database`], one transaction
/// per event.
#[derive(Debug)]
pub struct PayerIndexExecutor {
    manifest: Manifest,
    db: Database,
    routes: HashMap<String, Handler>,
}

impl PayerIndexExecutor {
    /// Create a new `PayerIndexExecutor`, registering the schema tables and
    /// resolving the manifest's event handlers.
    pub fn new(manifest: Manifest, mut db: Database) -> IndexerResult<Self> {
        let mut routes = HashMap::new();

        for route in manifest.event_handlers() {
            let handler = Handler::from_name(&route.handler)
                .ok_or_else(|| IndexerError::MissingHandler(route.handler.clone()))?;

            if handler.event_name() != route.event {
                return Err(IndexerError::HandlerMismatch {
                    event: route.event.clone(),
                    handler: route.handler.clone(),
                });
            }

            routes.insert(route.event.clone(), handler);
        }

        db.load_schema(&manifest);

        info!(
            "Executor for '{}' ready with {} event handler(s).",
            manifest.uid(),
            routes.len()
        );

        Ok(Self {
            manifest,
            db,
            routes,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }

    /// Whether the log was emitted by the indexed contract within the
    /// configured block range.
    fn accepts(&self, log: &RawLog) -> bool {
        if log.address != *self.manifest.contract().address() {
            debug!(
                "Skipping log {} from foreign contract {}.",
                log.event_id(),
                log.address
            );
            return false;
        }

        if !self.manifest.contains_block(log.block_number) {
            debug!(
                "Skipping log {} at block {} outside the indexed range.",
                log.event_id(),
                log.block_number
            );
            return false;
        }

        true
    }

    async fn dispatch(&mut self, event: &PayerEvent) -> IndexerResult<()> {
        match event {
            PayerEvent::RegisteredDebt(e) => handle_registered_debt(e, &mut self.db).await,
            PayerEvent::PaidBackDebt(e) => handle_paid_back_debt(e, &mut self.db).await,
        }
    }
}

#[async_trait]
impl Executor for PayerIndexExecutor {
    async fn handle_events(&mut self, logs: Vec<RawLog>) -> IndexerResult<ExecutionSummary> {
        let mut summary = ExecutionSummary::default();

        for log in logs {
            if !self.accepts(&log) {
                summary.skipped += 1;
                continue;
            }

            let event = match decode_log(&log) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Could not decode log {}: {e}", log.event_id());
                    summary.skipped += 1;
                    continue;
                }
            };

            if !self.routes.contains_key(event.name()) {
                debug!("No handler routed for {} {}.", event.name(), event.id());
                summary.skipped += 1;
                continue;
            }

            self.db.start_transaction()?;
            if let Err(e) = self.dispatch(&event).await {
                error!("PayerIndexExecutor handle_events failed on {}: {e}.", event.id());
                self.db.revert_transaction()?;
                return Err(e);
            }
            self.db.commit_transaction()?;

            summary.processed += 1;
        }

        debug!(
            "Processed {} log(s), skipped {}.",
            summary.processed, summary.skipped
        );

        Ok(summary)
    }
}
