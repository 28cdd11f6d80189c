//! Chunk storage contract.
//!
//! The fixer never talks to a game host directly. It loads chunks through
//! [`TileStore`] and edits the cells of a loaded [`Tile`] in place.
//! [`MemoryWorld`] is a lazily generated in-memory implementation used by the
//! runner and by tests.

mod error;
mod generate;
mod memory;
mod tile;

pub use error::{WorldError, WorldResult};
pub use generate::Generator;
pub use memory::MemoryWorld;
pub use tile::{Cell, MaterialKind, TILE_AREA, TILE_EDGE, Tile, TilePos};

/// Source of loadable chunks.
pub trait TileStore {
    /// Load the chunk at `pos` in `world`, generating it if the store can.
    ///
    /// The returned chunk stays loaded; edits are visible on the next load.
    fn load_tile(&mut self, world: &str, pos: TilePos) -> WorldResult<&mut Tile>;
}

impl<T: TileStore + ?Sized> TileStore for &mut T {
    fn load_tile(&mut self, world: &str, pos: TilePos) -> WorldResult<&mut Tile> {
        (**self).load_tile(world, pos)
    }
}

impl<T: TileStore + ?Sized> TileStore for Box<T> {
    fn load_tile(&mut self, world: &str, pos: TilePos) -> WorldResult<&mut Tile> {
        (**self).load_tile(world, pos)
    }
}
