//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

/// Name of the database holding every ledger record.
pub const STATE_DB: &str = "state";

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and the state database handle.
pub struct LmdbEnvironment {
    env: Env,
    state_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path` (created if missing).
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process and the data
        // directory is not shared with another process opening it differently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let state_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(STATE_DB))?;
        wtxn.commit()?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env,
            state_db,
            path: path.to_path_buf(),
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn state_db(&self) -> Database<Bytes, Bytes> {
        self.state_db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
