//! Progress persistence contract.

use core::cell::{Cell, RefCell};

use thiserror::Error;

use crate::ProgressState;

/// Loads and saves [`ProgressState`].
pub trait ConfigStore {
    type Error: std::error::Error;

    /// Load the saved state, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<ProgressState>, Self::Error>;

    /// Overwrite the saved state.
    fn save(&self, state: &ProgressState) -> Result<(), Self::Error>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    type Error = T::Error;

    fn load(&self) -> Result<Option<ProgressState>, Self::Error> {
        (**self).load()
    }

    fn save(&self, state: &ProgressState) -> Result<(), Self::Error> {
        (**self).save(state)
    }
}

/// Error from a [`MemoryStore`] switched into failure mode.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("memory store is unavailable")]
pub struct MemoryStoreError;

/// Keeps the saved state in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<ProgressState>>,
    saves: Cell<u64>,
    failing: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    #[must_use]
    pub fn with_state(state: ProgressState) -> Self {
        Self {
            saved: RefCell::new(Some(state)),
            ..Self::default()
        }
    }

    /// The last saved state.
    #[must_use]
    pub fn saved(&self) -> Option<ProgressState> {
        self.saved.borrow().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> u64 {
        self.saves.get()
    }

    /// Make every load and save fail while `failing` is set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl ConfigStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load(&self) -> Result<Option<ProgressState>, Self::Error> {
        if self.failing.get() {
            return Err(MemoryStoreError);
        }
        Ok(self.saved())
    }

    fn save(&self, state: &ProgressState) -> Result<(), Self::Error> {
        if self.failing.get() {
            return Err(MemoryStoreError);
        }
        *self.saved.borrow_mut() = Some(state.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
