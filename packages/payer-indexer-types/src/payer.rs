//! Events emitted by the Payer contract.

use crate::{
    block::BlockData,
    log::EventId,
    scalar::{decimal, Address, BigUint, LogIndex},
    transaction::TransactionData,
};
use serde::{Deserialize, Serialize};

/// A new debt was registered for `account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredDebt {
    pub account: Address,
    #[serde(with = "decimal")]
    pub amount: BigUint,
}

impl RegisteredDebt {
    pub const NAME: &'static str = "RegisteredDebt";
    pub const SIGNATURE: &'static str = "RegisteredDebt(address,uint256)";
}

/// `account` was paid back `amount` of its debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidBackDebt {
    pub account: Address,
    #[serde(with = "decimal")]
    pub amount: BigUint,
    /// Debt still owed to `account` according to the contract.
    #[serde(with = "decimal")]
    pub remaining_debt: BigUint,
}

impl PaidBackDebt {
    pub const NAME: &'static str = "PaidBackDebt";
    pub const SIGNATURE: &'static str = "PaidBackDebt(address,uint256,uint256)";
}

/// Decoded event parameters together with the chain metadata of the log
/// that carried them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<P> {
    /// Contract that emitted the event.
    pub address: Address,
    pub log_index: LogIndex,
    pub block: BlockData,
    pub transaction: TransactionData,
    pub params: P,
}

impl<P> Event<P> {
    pub fn id(&self) -> EventId {
        EventId::new(&self.transaction.hash, self.log_index)
    }
}

/// Any event the Payer contract can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayerEvent {
    RegisteredDebt(Event<RegisteredDebt>),
    PaidBackDebt(Event<PaidBackDebt>),
}

impl PayerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisteredDebt(_) => RegisteredDebt::NAME,
            Self::PaidBackDebt(_) => PaidBackDebt::NAME,
        }
    }

    pub fn id(&self) -> EventId {
        match self {
            Self::RegisteredDebt(e) => e.id(),
            Self::PaidBackDebt(e) => e.id(),
        }
    }
}
