use crate::scalar::{Address, Bytes32};
use serde::{Deserialize, Serialize};

/// The transaction that emitted an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    pub hash: Bytes32,
    pub from: Option<Address>,
}
