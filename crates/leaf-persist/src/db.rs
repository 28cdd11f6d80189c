//! LMDB database wrapper for progress persistence.

use std::path::Path;

use heed::{Database, Env, EnvOpenOptions, types::Bytes};
use leaf_tick::{ConfigStore, ProgressState};

use crate::{PersistError, PersistResult};

/// Key of the progress record. Bumped whenever `ProgressState` changes shape,
/// since bincode records are not self-describing.
const PROGRESS_KEY: &str = "progress.v1";

/// LMDB database holding the fixer's progress.
pub struct ProgressDb {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl ProgressDb {
    /// Open or create a progress database in the directory `path`.
    ///
    /// # Errors
    /// Returns an error if the directory or database cannot be created.
    ///
    /// # Safety
    /// Uses unsafe to call heed's open method which requires ensuring
    /// the database is not opened multiple times with different options.
    #[allow(unsafe_code)]
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        // SAFETY: The fixer opens its database once per process
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(16 * 1024 * 1024) // 16MB max
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db = env.create_database(&mut wtxn, Some("progress"))?;
        wtxn.commit()?;

        tracing::debug!("Opened progress database at {}", path.display());
        Ok(Self { env, db })
    }

    /// Load the saved progress, if any.
    ///
    /// # Errors
    /// Returns an error if the read fails or the record cannot be decoded.
    pub fn load_progress(&self) -> PersistResult<Option<ProgressState>> {
        let rtxn = self.env.read_txn()?;
        let Some(bytes) = self.db.get(&rtxn, PROGRESS_KEY.as_bytes())? else {
            return Ok(None);
        };

        let state = bincode::deserialize(bytes)?;
        tracing::trace!("Loaded progress record ({} bytes)", bytes.len());
        Ok(Some(state))
    }

    /// Overwrite the saved progress.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn save_progress(&self, state: &ProgressState) -> PersistResult<()> {
        let bytes = bincode::serialize(state)?;

        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, PROGRESS_KEY.as_bytes(), &bytes)?;
        wtxn.commit()?;

        tracing::trace!("Persisted progress at index {}", state.index);
        Ok(())
    }

    /// Remove the saved progress.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> PersistResult<bool> {
        let mut wtxn = self.env.write_txn()?;
        let deleted = self.db.delete(&mut wtxn, PROGRESS_KEY.as_bytes())?;
        wtxn.commit()?;
        Ok(deleted)
    }
}

impl ConfigStore for ProgressDb {
    type Error = PersistError;

    fn load(&self) -> Result<Option<ProgressState>, Self::Error> {
        self.load_progress()
    }

    fn save(&self, state: &ProgressState) -> Result<(), Self::Error> {
        self.save_progress(state)
    }
}
