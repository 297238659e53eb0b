pub mod block;
pub mod log;
pub mod payer;
pub mod scalar;
pub mod transaction;

use sha2::{Digest, Sha256};

pub mod prelude {
    pub use crate::block::*;
    pub use crate::log::*;
    pub use crate::payer::*;
    pub use crate::scalar::*;
    pub use crate::transaction::*;
    pub use crate::type_id;
}

/// Derive a type ID from a namespace and given abstraction name.
pub fn type_id(namespace: &str, name: &str) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&Sha256::digest(format!("{namespace}:{name}").as_bytes())[..8]);
    i64::from_le_bytes(bytes)
}
