use crate::{
    block::BlockData,
    scalar::{Address, BlockHeight, Bytes32, HexBytes, LogIndex, Timestamp},
    transaction::TransactionData,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An undecoded EVM log, as delivered by a chain client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract that emitted the log.
    pub address: Address,
    pub topics: Vec<Bytes32>,
    pub data: HexBytes,
    pub block_number: BlockHeight,
    pub block_timestamp: Timestamp,
    pub transaction_hash: Bytes32,
    pub log_index: LogIndex,
}

impl RawLog {
    pub fn block(&self) -> BlockData {
        BlockData {
            number: self.block_number,
            hash: None,
            timestamp: self.block_timestamp,
        }
    }

    pub fn transaction(&self) -> TransactionData {
        TransactionData {
            hash: self.transaction_hash,
            from: None,
        }
    }

    pub fn event_id(&self) -> EventId {
        EventId::new(&self.transaction_hash, self.log_index)
    }
}

/// Unique identifier of an event within the chain's event stream:
/// `{transaction hash}-{log index}`.
///
/// Treated as an opaque key; it is never parsed back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn new(transaction_hash: &Bytes32, log_index: LogIndex) -> Self {
        Self(format!("{}-{}", transaction_hash.to_hex(), log_index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
