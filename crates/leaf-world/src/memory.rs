//! In-memory world.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::{Generator, Tile, TilePos, TileStore, WorldError, WorldResult};

/// A single named world held entirely in memory.
///
/// Chunks are generated on first load when a [`Generator`] is attached.
/// Positions registered with [`MemoryWorld::fail_loads_at`] always fail to
/// load, which stands in for a corrupt region file on a real host.
pub struct MemoryWorld {
    name: String,
    min_y: i32,
    max_y: i32,
    generator: Option<Generator>,
    tiles: HashMap<TilePos, Tile>,
    failing: HashSet<TilePos>,
    loads: u64,
}

impl MemoryWorld {
    /// Create an empty world that cannot generate chunks.
    #[must_use]
    pub fn new(name: impl Into<String>, min_y: i32, max_y: i32) -> Self {
        Self {
            name: name.into(),
            min_y,
            max_y,
            generator: None,
            tiles: HashMap::new(),
            failing: HashSet::new(),
            loads: 0,
        }
    }

    /// Create a world that generates missing chunks on load.
    #[must_use]
    pub fn generated(
        name: impl Into<String>,
        min_y: i32,
        max_y: i32,
        generator: Generator,
    ) -> Self {
        Self {
            generator: Some(generator),
            ..Self::new(name, min_y, max_y)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a chunk.
    pub fn insert(&mut self, tile: Tile) {
        self.tiles.insert(tile.pos(), tile);
    }

    /// Get a chunk without loading or generating it.
    #[must_use]
    pub fn get(&self, pos: TilePos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Make every load of `pos` fail until [`MemoryWorld::clear_failure`].
    pub fn fail_loads_at(&mut self, pos: TilePos) {
        self.failing.insert(pos);
    }

    pub fn clear_failure(&mut self, pos: TilePos) {
        self.failing.remove(&pos);
    }

    /// Number of successful loads so far.
    #[must_use]
    pub const fn loads(&self) -> u64 {
        self.loads
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileStore for MemoryWorld {
    fn load_tile(&mut self, world: &str, pos: TilePos) -> WorldResult<&mut Tile> {
        if world != self.name {
            return Err(WorldError::UnknownWorld(world.to_string()));
        }
        if self.failing.contains(&pos) {
            return Err(WorldError::LoadFailed(pos));
        }

        let (min_y, max_y) = (self.min_y, self.max_y);
        let tile = match self.tiles.entry(pos) {
            hashbrown::hash_map::Entry::Occupied(entry) => {
                trace!("Chunk {pos} already loaded");
                entry.into_mut()
            }
            hashbrown::hash_map::Entry::Vacant(entry) => {
                let Some(generator) = &self.generator else {
                    return Err(WorldError::NotGenerated(pos));
                };
                debug!("Generating chunk {pos}");
                entry.insert(generator.generate(pos, min_y, max_y))
            }
        };

        self.loads += 1;
        Ok(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, MaterialKind};

    #[test]
    fn test_unknown_world() {
        let mut world = MemoryWorld::new("world", 0, 15);
        let err = world.load_tile("nether", TilePos::default()).unwrap_err();
        assert_eq!(err, WorldError::UnknownWorld("nether".to_string()));
    }

    #[test]
    fn test_missing_chunk_without_generator() {
        let mut world = MemoryWorld::new("world", 0, 15);
        let pos = TilePos::new(1, 1);
        assert_eq!(
            world.load_tile("world", pos).unwrap_err(),
            WorldError::NotGenerated(pos)
        );
        assert_eq!(world.loads(), 0);
    }

    #[test]
    fn test_edits_persist_between_loads() {
        let mut world = MemoryWorld::new("world", 0, 15);
        world.insert(Tile::new(TilePos::new(2, -1), 0, 15));

        let tile = world.load_tile("world", TilePos::new(2, -1)).unwrap();
        tile.set(0, 3, 0, Cell::new(MaterialKind::Leaves, 4));

        let tile = world.load_tile("world", TilePos::new(2, -1)).unwrap();
        assert_eq!(tile.get(0, 3, 0).map(Cell::aux), Some(4));
        assert_eq!(world.loads(), 2);
    }

    #[test]
    fn test_generates_on_demand() {
        let mut world = MemoryWorld::generated("world", 0, 255, Generator::with_seed(1));
        assert!(world.is_empty());
        world.load_tile("world", TilePos::new(-4, 9)).unwrap();
        assert_eq!(world.len(), 1);
        assert!(world.get(TilePos::new(-4, 9)).is_some());
    }

    #[test]
    fn test_failing_position() {
        let mut world = MemoryWorld::generated("world", 0, 255, Generator::default());
        let pos = TilePos::new(0, 0);
        world.fail_loads_at(pos);
        assert_eq!(
            world.load_tile("world", pos).unwrap_err(),
            WorldError::LoadFailed(pos)
        );

        world.clear_failure(pos);
        assert!(world.load_tile("world", pos).is_ok());
    }
}
