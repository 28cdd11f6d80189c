//! Chunks and their cells.

use core::ops::RangeInclusive;

/// Edge length of a chunk in cells.
pub const TILE_EDGE: usize = 16;

/// Cells in one horizontal layer of a chunk.
pub const TILE_AREA: usize = TILE_EDGE * TILE_EDGE;

/// Chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TilePos {
    pub x: i32,
    pub z: i32,
}

impl TilePos {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World coordinates of the chunk's north-west column.
    ///
    /// Wraps for chunks beyond the `i32` block range.
    #[must_use]
    pub const fn origin_block(self) -> (i32, i32) {
        (
            self.x.wrapping_mul(TILE_EDGE as i32),
            self.z.wrapping_mul(TILE_EDGE as i32),
        )
    }
}

impl core::fmt::Display for TilePos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Material of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MaterialKind {
    #[default]
    Air,
    Bedrock,
    Stone,
    Dirt,
    Grass,
    Water,
    Log,
    /// Oak, spruce, birch and jungle leaves.
    Leaves,
    /// Acacia and dark oak leaves.
    Leaves2,
}

impl MaterialKind {
    /// Whether this material is one of the two leaf kinds.
    #[must_use]
    pub const fn is_leaves(self) -> bool {
        matches!(self, Self::Leaves | Self::Leaves2)
    }
}

/// A single cell: material plus four bits of auxiliary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    kind: MaterialKind,
    aux: u8,
}

impl Cell {
    pub const AIR: Self = Self::new(MaterialKind::Air, 0);

    #[must_use]
    pub const fn new(kind: MaterialKind, aux: u8) -> Self {
        Self { kind, aux }
    }

    #[must_use]
    pub const fn kind(&self) -> MaterialKind {
        self.kind
    }

    #[must_use]
    pub const fn aux(&self) -> u8 {
        self.aux
    }

    pub fn set_aux(&mut self, aux: u8) {
        self.aux = aux;
    }
}

/// A loaded chunk: a 16x16 column stack spanning `min_y..=max_y`.
///
/// Cells are stored layer by layer, `z` rows within a layer, `x` within a row.
#[derive(Debug, Clone)]
pub struct Tile {
    pos: TilePos,
    min_y: i32,
    max_y: i32,
    cells: Vec<Cell>,
}

impl Tile {
    /// Create an all-air chunk.
    ///
    /// # Panics
    /// Panics if `max_y < min_y`.
    #[must_use]
    pub fn new(pos: TilePos, min_y: i32, max_y: i32) -> Self {
        assert!(max_y >= min_y, "chunk height range is empty");
        let height = (max_y - min_y + 1) as usize;
        Self {
            pos,
            min_y,
            max_y,
            cells: vec![Cell::AIR; height * TILE_AREA],
        }
    }

    #[must_use]
    pub const fn pos(&self) -> TilePos {
        self.pos
    }

    /// Lowest and highest valid y.
    #[must_use]
    pub const fn y_bounds(&self) -> (i32, i32) {
        (self.min_y, self.max_y)
    }

    fn offset(&self, x: usize, y: i32, z: usize) -> Option<usize> {
        if x >= TILE_EDGE || z >= TILE_EDGE || y < self.min_y || y > self.max_y {
            return None;
        }
        let layer = (y - self.min_y) as usize;
        Some(layer * TILE_AREA + z * TILE_EDGE + x)
    }

    /// Get a cell by local coordinates.
    #[must_use]
    pub fn get(&self, x: usize, y: i32, z: usize) -> Option<&Cell> {
        self.offset(x, y, z).map(|i| &self.cells[i])
    }

    /// Replace a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: i32, z: usize, cell: Cell) {
        if let Some(i) = self.offset(x, y, z) {
            self.cells[i] = cell;
        }
    }

    /// Cells of column `(x, z)` whose y lies in `ys`, bottom to top.
    ///
    /// The range is clipped to the chunk's height; a column outside the chunk
    /// yields nothing.
    pub fn column_mut(
        &mut self,
        x: usize,
        z: usize,
        ys: RangeInclusive<i32>,
    ) -> impl Iterator<Item = &mut Cell> + '_ {
        let lo = (*ys.start()).max(self.min_y);
        let hi = (*ys.end()).min(self.max_y);

        let (start, count) = if x >= TILE_EDGE || z >= TILE_EDGE || lo > hi {
            (0, 0)
        } else {
            let layer = (lo - self.min_y) as usize;
            (
                layer * TILE_AREA + z * TILE_EDGE + x,
                (hi - lo + 1) as usize,
            )
        };

        self.cells
            .iter_mut()
            .skip(start)
            .step_by(TILE_AREA)
            .take(count)
    }

    /// Iterate over every cell with its local coordinates.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, i32, usize), &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let layer = i / TILE_AREA;
            let within = i % TILE_AREA;
            (
                (within % TILE_EDGE, self.min_y + layer as i32, within / TILE_EDGE),
                cell,
            )
        })
    }
}
