extern crate alloc;
use alloc::vec::Vec;
use async_trait::async_trait;
use payer_indexer_lib::utils::{deserialize, serialize};
use payer_indexer_types::type_id;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub type EntityResult<T> = core::result::Result<T, EntityError>;

#[derive(Error, Debug)]
pub enum EntityError {
    #[error("Bincode serde error: {0:?}")]
    BincodeError(#[from] bincode::Error),
    #[error("Entity store error: {0}")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Key-value storage for entity rows, injected into every handler call.
///
/// Rows are opaque bytes keyed by the entity's type ID and its string ID.
/// Writes are upserts; nothing is ever deleted.
#[async_trait]
pub trait EntityStore: Send {
    async fn get_object(
        &mut self,
        type_id: i64,
        object_id: &str,
    ) -> EntityResult<Option<Vec<u8>>>;

    async fn put_object(
        &mut self,
        type_id: i64,
        object_id: &str,
        bytes: Vec<u8>,
    ) -> EntityResult<()>;
}

#[async_trait]
pub trait Entity:
    Sized + PartialEq + Eq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// Namespace the entity's type ID is derived in.
    const NAMESPACE: &'static str;

    /// Name of the entity, as it appears in the schema.
    const TYPE_NAME: &'static str;

    /// Primary key of this entity.
    fn id(&self) -> String;

    fn type_id() -> i64 {
        type_id(Self::NAMESPACE, Self::TYPE_NAME)
    }

    async fn load<S>(store: &mut S, id: &str) -> EntityResult<Option<Self>>
    where
        S: EntityStore,
    {
        match store.get_object(Self::type_id(), id).await? {
            Some(bytes) => Ok(Some(deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save<S>(&self, store: &mut S) -> EntityResult<()>
    where
        S: EntityStore,
    {
        let bytes = serialize(self)?;
        store.put_object(Self::type_id(), &self.id(), bytes).await
    }
}
