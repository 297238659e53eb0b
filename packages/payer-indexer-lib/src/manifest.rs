use payer_indexer_types::scalar::{Address, BlockHeight};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use thiserror::Error;
use tracing::debug;

/// Result type returned from Manifest operations.
type ManifestResult<T> = Result<T, ManifestError>;

/// Error type returned from Manifest operations.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("YAML error: {0:#?}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("File IO error: {0} {1:?}.")]
    FileError(String, #[source] std::io::Error),
}

/// The contract this indexer subscribes to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Contract {
    /// Address of the deployed Payer contract.
    address: Address,

    /// Filepath to the contract ABI.
    abi: Option<String>,
}

impl Contract {
    pub fn new(address: Address) -> Self {
        Self { address, abi: None }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn abi(&self) -> Option<&str> {
        self.abi.as_deref()
    }
}

/// Maps an event name to the handler that processes it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EventHandler {
    pub event: String,
    pub handler: String,
}

/// Represents the indexer manifest file.
///
/// This manifest file is a simple YAML file that is read and passed
/// to the executor. It names the contract whose logs are indexed, the
/// block range to index, and which handler each event is routed to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Namespace of indexer.
    namespace: String,

    /// Identifier of indexer.
    identifier: String,

    /// Name of the network the contract is deployed on.
    network: Option<String>,

    /// Contract configuration.
    contract: Contract,

    /// Block at which indexer should start.
    start_block: Option<BlockHeight>,

    /// Block at which indexer should stop.
    end_block: Option<BlockHeight>,

    /// Event to handler routing.
    #[serde(default)]
    event_handlers: Vec<EventHandler>,
}

impl Manifest {
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        contract: Contract,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            network: None,
            contract,
            start_block: None,
            end_block: None,
            event_handlers: Vec::new(),
        }
    }

    /// Derive an indexer manifest via the YAML file at the specified path.
    pub fn from_file(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let mut file = File::open(&path).map_err(|e| {
            ManifestError::FileError(path.as_ref().display().to_string(), e)
        })?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|e| {
            ManifestError::FileError(path.as_ref().display().to_string(), e)
        })?;
        let manifest = Self::try_from(content.as_str())?;

        debug!(
            "Loaded manifest '{}' from '{}'",
            manifest.uid(),
            path.as_ref().display()
        );

        Ok(manifest)
    }

    /// Derive the unique identifier for a manifest.
    pub fn uid(&self) -> String {
        format!("{}.{}", &self.namespace, &self.identifier)
    }

    /// Write this manifest to a given path.
    pub fn write(&self, path: impl AsRef<Path>) -> ManifestResult<()> {
        let path = path.as_ref();
        let mut file = File::create(path)
            .map_err(|err| ManifestError::FileError(path.display().to_string(), err))?;
        let content = serde_yaml::to_vec(self)?;
        file.write_all(&content)
            .map_err(|err| ManifestError::FileError(path.display().to_string(), err))?;
        Ok(())
    }

    /// Name of the handler routed to `event`, if any.
    pub fn handler_for(&self, event: &str) -> Option<&str> {
        self.event_handlers
            .iter()
            .find(|h| h.event == event)
            .map(|h| h.handler.as_str())
    }

    /// Whether `height` falls inside the configured block range.
    pub fn contains_block(&self, height: BlockHeight) -> bool {
        self.start_block.map_or(true, |start| height >= start)
            && self.end_block.map_or(true, |end| height <= end)
    }

    pub fn add_event_handler(
        &mut self,
        event: impl Into<String>,
        handler: impl Into<String>,
    ) {
        self.event_handlers.push(EventHandler {
            event: event.into(),
            handler: handler.into(),
        });
    }

    /// Set the end block for this indexer.
    pub fn set_end_block(&mut self, block: BlockHeight) {
        self.end_block = Some(block);
    }

    /// Get the indexer namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Get the indexer start block.
    pub fn start_block(&self) -> Option<BlockHeight> {
        self.start_block
    }

    /// Get the indexer end block.
    pub fn end_block(&self) -> Option<BlockHeight> {
        self.end_block
    }

    pub fn event_handlers(&self) -> &[EventHandler] {
        &self.event_handlers
    }
}

impl TryFrom<&str> for Manifest {
    type Error = ManifestError;

    fn try_from(val: &str) -> ManifestResult<Self> {
        let manifest: Manifest = serde_yaml::from_str(val)?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const MANIFEST: &str = r#"
namespace: nouns
identifier: token_buyer
network: mainnet
contract:
  address: "0xd97bcd9f47cee35c0a9ec1dc40c1269afc9e8e1d"
start_block: 15000000
event_handlers:
  - event: RegisteredDebt
    handler: handleRegisteredDebt
  - event: PaidBackDebt
    handler: handlePaidBackDebt
"#;

    #[test]
    fn test_manifest_parses_from_yaml() {
        let manifest = Manifest::try_from(MANIFEST).unwrap();

        assert_eq!(manifest.uid(), "nouns.token_buyer");
        assert_eq!(manifest.network(), Some("mainnet"));
        assert_eq!(
            manifest.contract().address(),
            &Address::from_str("0xd97bcd9f47cee35c0a9ec1dc40c1269afc9e8e1d").unwrap()
        );
        assert_eq!(manifest.contract().abi(), None);
        assert_eq!(manifest.start_block(), Some(15000000));
        assert_eq!(manifest.end_block(), None);
        assert_eq!(
            manifest.handler_for("PaidBackDebt"),
            Some("handlePaidBackDebt")
        );
        assert_eq!(manifest.handler_for("Transfer"), None);
    }

    #[test]
    fn test_manifest_block_range() {
        let mut manifest = Manifest::try_from(MANIFEST).unwrap();

        assert!(!manifest.contains_block(14999999));
        assert!(manifest.contains_block(15000000));
        assert!(manifest.contains_block(u64::MAX));

        manifest.set_end_block(15000010);
        assert!(manifest.contains_block(15000010));
        assert!(!manifest.contains_block(15000011));
    }

    #[test]
    fn test_manifest_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payer.manifest.yaml");
        let manifest = Manifest::try_from(MANIFEST).unwrap();

        manifest.write(&path).unwrap();

        assert_eq!(Manifest::from_file(&path).unwrap(), manifest);
    }

    #[test]
    fn test_manifest_from_missing_file() {
        let err = Manifest::from_file("does/not/exist.yaml").unwrap_err();

        assert!(matches!(err, ManifestError::FileError(p, _) if p == "does/not/exist.yaml"));
    }
}
