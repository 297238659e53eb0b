use crate::schema;
use async_trait::async_trait;
use payer_indexer_lib::{
    manifest::Manifest,
    utils::{deserialize, serialize},
};
use payer_indexer_plugin::{Entity, EntityError, EntityResult, EntityStore};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

pub type DatabaseResult<T> = core::result::Result<T, DatabaseError>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("No transaction is open.")]
    NoTransactionError,
    #[error("A transaction is already open.")]
    TransactionInProgress,
    #[error("TypeId({0}) not found in tables.")]
    UnknownTypeId(i64),
    #[error("IO Error: {0:#?}")]
    IoError(#[from] std::io::Error),
    #[error("Bincode serde error: {0:?}")]
    BincodeError(#[from] bincode::Error),
}

impl From<DatabaseError> for EntityError {
    fn from(e: DatabaseError) -> Self {
        EntityError::StoreError(Box::new(e))
    }
}

/// Rows of one table, keyed by object ID.
type Rows = BTreeMap<String, Vec<u8>>;

/// In-memory, transactional entity store, optionally backed by a snapshot
/// file.
///
/// Writes made inside a transaction are staged and only become part of the
/// committed state on [`Database::commit_transaction`]. Reads inside a
/// transaction see the staged writes first.
#[derive(Debug, Default)]
pub struct Database {
    pub namespace: String,
    pub tables: HashMap<i64, String>,
    objects: HashMap<i64, Rows>,
    stashed: Option<HashMap<i64, Rows>>,
    path: Option<PathBuf>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a database backed by the snapshot at `path`, loading the
    /// committed state from it if the file exists.
    pub fn open(path: impl AsRef<Path>) -> DatabaseResult<Self> {
        let path = path.as_ref();
        let objects = match path.exists() {
            true => {
                let bytes = fs::read(path)?;
                let objects: HashMap<i64, Rows> = deserialize(&bytes)?;
                info!(
                    "Loaded {} objects from snapshot '{}'",
                    objects.values().map(BTreeMap::len).sum::<usize>(),
                    path.display()
                );
                objects
            }
            false => HashMap::new(),
        };

        Ok(Self {
            objects,
            path: Some(path.to_path_buf()),
            ..Default::default()
        })
    }

    /// Register the tables of the entity schema under the manifest's namespace.
    pub fn load_schema(&mut self, manifest: &Manifest) {
        self.namespace = format!("{}_{}", manifest.namespace(), manifest.identifier());

        for (type_id, name) in schema::tables() {
            let table = format!("{}.{}", self.namespace, name.to_lowercase());
            debug!("Registering table '{table}' for TypeId({type_id})");
            self.tables.insert(type_id, table);
        }
    }

    pub fn table_name(&self, type_id: i64) -> Option<&str> {
        self.tables.get(&type_id).map(String::as_str)
    }

    pub fn start_transaction(&mut self) -> DatabaseResult<()> {
        if self.stashed.is_some() {
            return Err(DatabaseError::TransactionInProgress);
        }
        self.stashed = Some(HashMap::new());
        Ok(())
    }

    pub fn commit_transaction(&mut self) -> DatabaseResult<()> {
        let stashed = self
            .stashed
            .take()
            .ok_or(DatabaseError::NoTransactionError)?;

        for (type_id, rows) in stashed {
            self.objects.entry(type_id).or_default().extend(rows);
        }

        Ok(())
    }

    pub fn revert_transaction(&mut self) -> DatabaseResult<()> {
        self.stashed
            .take()
            .ok_or(DatabaseError::NoTransactionError)?;
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.stashed.is_some()
    }

    fn check_table(&self, type_id: i64) -> DatabaseResult<()> {
        match self.tables.contains_key(&type_id) {
            true => Ok(()),
            false => Err(DatabaseError::UnknownTypeId(type_id)),
        }
    }

    pub fn get_object(
        &self,
        type_id: i64,
        object_id: &str,
    ) -> DatabaseResult<Option<Vec<u8>>> {
        self.check_table(type_id)?;

        let stashed = self
            .stashed
            .as_ref()
            .ok_or(DatabaseError::NoTransactionError)?;

        let staged = stashed.get(&type_id).and_then(|rows| rows.get(object_id));
        let committed = || {
            self.objects
                .get(&type_id)
                .and_then(|rows| rows.get(object_id))
        };

        Ok(staged.or_else(committed).cloned())
    }

    /// Insert or overwrite the object with the given ID.
    pub fn put_object(
        &mut self,
        type_id: i64,
        object_id: &str,
        bytes: Vec<u8>,
    ) -> DatabaseResult<()> {
        self.check_table(type_id)?;

        let stashed = self
            .stashed
            .as_mut()
            .ok_or(DatabaseError::NoTransactionError)?;

        stashed
            .entry(type_id)
            .or_default()
            .insert(object_id.to_string(), bytes);

        Ok(())
    }

    /// Committed rows of a table, ordered by object ID.
    pub fn objects(&self, type_id: i64) -> impl Iterator<Item = (&str, &[u8])> {
        self.objects
            .get(&type_id)
            .into_iter()
            .flat_map(|rows| rows.iter())
            .map(|(id, bytes)| (id.as_str(), bytes.as_slice()))
    }

    /// Number of committed rows in a table.
    pub fn count(&self, type_id: i64) -> usize {
        self.objects.get(&type_id).map_or(0, BTreeMap::len)
    }

    /// Decode every committed entity of type `T`, ordered by ID.
    pub fn entities<T: Entity>(&self) -> DatabaseResult<Vec<T>> {
        self.objects(T::type_id())
            .map(|(_, bytes)| Ok(deserialize(bytes)?))
            .collect()
    }

    /// Write the committed state to the snapshot file, if this database has one.
    pub fn persist(&self) -> DatabaseResult<()> {
        if let Some(path) = &self.path {
            fs::write(path, serialize(&self.objects)?)?;
            debug!("Persisted snapshot to '{}'", path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for Database {
    async fn get_object(
        &mut self,
        type_id: i64,
        object_id: &str,
    ) -> EntityResult<Option<Vec<u8>>> {
        Ok(Database::get_object(self, type_id, object_id)?)
    }

    async fn put_object(
        &mut self,
        type_id: i64,
        object_id: &str,
        bytes: Vec<u8>,
    ) -> EntityResult<()> {
        Ok(Database::put_object(self, type_id, object_id, bytes)?)
    }
}
