use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::storage::KeyValueStorage;

/// Name of the LMDB sub-database holding client state slots.
const SLOTS_DB: &str = "client_state";

/// The slot values are a few kilobytes at most.
const MAP_SIZE: usize = 10 * 1024 * 1024;

/// LMDB-backed [`KeyValueStorage`].
///
/// The environment lives in `<name>.lmdb`; every `set` is its own write
/// transaction and is durable once it returns.
pub struct AppDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl AppDbState {
    pub fn init(name: String) -> Result<Self, AppResponse> {
        if name.trim().is_empty() {
            return Err(AppResponse::ValidationError("Database name cannot be empty".to_string()));
        }

        let path = PathBuf::from(format!("{name}.lmdb"));
        fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(MAP_SIZE)
            .open(&path)?;
        let db = env.create_db(Some(SLOTS_DB), DatabaseFlags::empty())?;

        info!("LMDB environment opened at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes a slot. Returns `false` when there was nothing to remove.
    pub fn delete(&self, key: &str) -> Result<bool, AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {
                txn.commit()?;
                Ok(true)
            }
            Err(lmdb::Error::NotFound) => Ok(false),
            Err(e) => Err(AppResponse::from(e)),
        }
    }

    /// Forces buffered data to disk.
    pub fn sync(&self) -> Result<(), AppResponse> {
        self.env.sync(true).map_err(AppResponse::from)
    }
}

impl KeyValueStorage for AppDbState {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => String::from_utf8(bytes.to_vec()).map(Some).map_err(|e| {
                warn!("Slot {} holds non UTF-8 data: {}", key, e);
                AppResponse::SerializationError(format!("Invalid UTF-8 in slot {key}: {e}"))
            }),
            Err(lmdb::Error::NotFound) => Ok(None),
            Err(e) => Err(AppResponse::from(e)),
        };
        txn.abort();
        value
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        if key.is_empty() {
            return Err(AppResponse::ValidationError("Storage key cannot be empty".to_string()));
        }

        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Slot {} written ({} bytes)", key, value.len());
        Ok(())
    }
}
