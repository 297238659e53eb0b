//! Handler-facing API of the Payer indexer: entities and the store they
//! are loaded from and saved to.

#![deny(unused_crate_dependencies)]

mod entity;

pub use entity::{Entity, EntityError, EntityResult, EntityStore};

pub mod types {
    pub use payer_indexer_types::prelude::*;
}

pub use async_trait::async_trait;
pub use payer_indexer_lib::utils::{deserialize, serialize};

// Specifically we import `serde` here for the `Serialize` and `Deserialize` traits
// else the user would have to explicity import these in their indexer modules.
pub use serde;

pub use tracing::{debug, error, info, trace, warn};

pub mod prelude {
    pub use super::{
        async_trait, debug, deserialize, error, info, serde, serialize, trace,
        types::*, warn, Entity, EntityError, EntityResult, EntityStore,
    };
}
