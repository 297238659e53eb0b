//! Entities derived from Payer events.

use payer_indexer_plugin::{
    serde::{Deserialize, Serialize},
    types::{decimal, Address, BigInt, EventId, Timestamp},
    Entity,
};

/// Namespace the entity type IDs are derived in.
pub const SCHEMA_NAMESPACE: &str = "payer";

/// Running balance owed to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Address,
    #[serde(with = "decimal")]
    pub amount: BigInt,
}

impl Debt {
    /// A new debt with a zero balance.
    pub fn new(id: Address) -> Self {
        Self {
            id,
            amount: BigInt::default(),
        }
    }
}

impl Entity for Debt {
    const NAMESPACE: &'static str = SCHEMA_NAMESPACE;
    const TYPE_NAME: &'static str = "Debt";

    fn id(&self) -> String {
        self.id.to_hex()
    }
}

/// Immutable record of one balance-affecting event. Positive amounts are
/// registrations, negative amounts are repayments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtChange {
    pub id: EventId,
    pub address: Address,
    #[serde(with = "decimal")]
    pub amount: BigInt,
    pub block_timestamp: Timestamp,
}

impl Entity for DebtChange {
    const NAMESPACE: &'static str = SCHEMA_NAMESPACE;
    const TYPE_NAME: &'static str = "DebtChange";

    fn id(&self) -> String {
        self.id.to_string()
    }
}

/// Type ID and name of every entity in the schema.
pub fn tables() -> [(i64, &'static str); 2] {
    [
        (Debt::type_id(), Debt::TYPE_NAME),
        (DebtChange::type_id(), DebtChange::TYPE_NAME),
    ]
}
