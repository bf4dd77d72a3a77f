//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbKvStore};

const STRINGS_DB: &str = "strings";
const SETS_DB: &str = "sets";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    path: PathBuf,
    pub(crate) strings_db: Database<Bytes, Bytes>,
    pub(crate) sets_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if it does not exist.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: at most one live handle to a given path exists at a time.
        // Callers (daemon, tests) drop every handle before reopening a path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let strings_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(STRINGS_DB))?;
        let sets_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(SETS_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, max_dbs, "opened LMDB environment");

        Ok(Self {
            env,
            path: path.to_path_buf(),
            strings_db,
            sets_db,
        })
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A key-value store view over this environment.
    pub fn kv_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(self)
    }
}
