use crate::scalar::{BlockHeight, Bytes32, Timestamp};
use serde::{Deserialize, Serialize};

/// The block containing an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub number: BlockHeight,
    pub hash: Option<Bytes32>,
    pub timestamp: Timestamp,
}
