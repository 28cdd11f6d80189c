//! Progress persistence using LMDB (heed).
//!
//! # Usage
//!
//! ```ignore
//! use leaf_persist::ProgressDb;
//! use leaf_tick::FixScheduler;
//!
//! let db = ProgressDb::open("data/leaffix")?;
//! let scheduler = FixScheduler::new(world, db, sink);
//! ```
//!
//! The state is stored as one `bincode` record. Each save is its own write
//! transaction, so a crash never leaves a half-written record behind.

mod db;
mod error;

pub use db::ProgressDb;
pub use error::{PersistError, PersistResult};
