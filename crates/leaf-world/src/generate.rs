//! Terrain generation - rolling hills with trees.
//!
//! Generated leaves carry the "no decay" flag the way a host world marks
//! player-placed or structure leaves, which is exactly what the fixer clears.

use crate::tile::{Cell, MaterialKind, TILE_EDGE, Tile, TilePos};

/// Aux bit marking a leaf cell as exempt from decay.
const NO_DECAY: u8 = 0b0100;

/// Aux bit marking a leaf cell as due for a decay check.
const CHECK_DECAY: u8 = 0b1000;

/// Trunk height of generated trees.
const TRUNK_HEIGHT: i32 = 5;

/// Generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    pub seed: u64,
    /// Surface height around which the hills roll.
    pub base_height: i32,
    /// Maximum deviation from `base_height`.
    pub amplitude: i32,
    /// Roughly one column in `tree_rarity` grows a tree.
    pub tree_rarity: u32,
    /// Sea level; columns below are filled with water.
    pub sea_level: i32,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            seed: 0,
            base_height: 64,
            amplitude: 8,
            tree_rarity: 61,
            sea_level: 60,
        }
    }
}

// ============================================================================
// Noise
// ============================================================================

fn mix(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^ (h >> 33)
}

fn hash2(seed: u64, x: i32, z: i32) -> u64 {
    let packed = (u64::from(x as u32) << 32) | u64::from(z as u32);
    mix(seed ^ mix(packed))
}

/// Lattice value in [0, 1].
fn lattice(seed: u64, x: i32, z: i32) -> f64 {
    (hash2(seed, x, z) >> 11) as f64 / (1u64 << 53) as f64
}

fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Value noise in [0, 1] with a lattice spacing of `scale` blocks.
fn value_noise(seed: u64, x: i32, z: i32, scale: i32) -> f64 {
    let x0 = x.div_euclid(scale);
    let z0 = z.div_euclid(scale);
    let tx = smooth(f64::from(x.rem_euclid(scale)) / f64::from(scale));
    let tz = smooth(f64::from(z.rem_euclid(scale)) / f64::from(scale));

    let top = lerp(lattice(seed, x0, z0), lattice(seed, x0 + 1, z0), tx);
    let bottom = lerp(lattice(seed, x0, z0 + 1), lattice(seed, x0 + 1, z0 + 1), tx);
    lerp(top, bottom, tz)
}

// ============================================================================
// Chunk generation
// ============================================================================

impl Generator {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Surface height of the column at world coordinates `(x, z)`.
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let broad = value_noise(self.seed, x, z, 32);
        let detail = value_noise(self.seed.rotate_left(17), x, z, 8);
        let n = broad * 0.75 + detail * 0.25;
        self.base_height + ((n * 2.0 - 1.0) * f64::from(self.amplitude)).round() as i32
    }

    /// Generate the chunk at `pos` spanning `min_y..=max_y`.
    #[must_use]
    pub fn generate(&self, pos: TilePos, min_y: i32, max_y: i32) -> Tile {
        let mut tile = Tile::new(pos, min_y, max_y);
        let (bx, bz) = pos.origin_block();

        for z in 0..TILE_EDGE {
            for x in 0..TILE_EDGE {
                let wx = bx.wrapping_add(x as i32);
                let wz = bz.wrapping_add(z as i32);
                let surface = self.surface_height(wx, wz).clamp(min_y, max_y);

                tile.set(x, min_y, z, Cell::new(MaterialKind::Bedrock, 0));
                for y in (min_y + 1)..surface {
                    let kind = if y < surface - 3 {
                        MaterialKind::Stone
                    } else {
                        MaterialKind::Dirt
                    };
                    tile.set(x, y, z, Cell::new(kind, 0));
                }

                if surface < self.sea_level {
                    tile.set(x, surface, z, Cell::new(MaterialKind::Dirt, 0));
                    for y in (surface + 1)..=self.sea_level.min(max_y) {
                        tile.set(x, y, z, Cell::new(MaterialKind::Water, 0));
                    }
                } else {
                    tile.set(x, surface, z, Cell::new(MaterialKind::Grass, 0));
                }
            }
        }

        self.plant_trees(&mut tile);
        tile
    }

    /// Trees are kept two columns away from the chunk edge so a canopy never
    /// spans two chunks.
    fn plant_trees(&self, tile: &mut Tile) {
        let (bx, bz) = tile.pos().origin_block();
        let (_, max_y) = tile.y_bounds();
        let rarity = u64::from(self.tree_rarity.max(1));

        for z in 2..TILE_EDGE - 2 {
            for x in 2..TILE_EDGE - 2 {
                let wx = bx.wrapping_add(x as i32);
                let wz = bz.wrapping_add(z as i32);
                let roll = hash2(self.seed ^ 0x7ee5, wx, wz);
                if !roll.is_multiple_of(rarity) {
                    continue;
                }

                let ground = self.surface_height(wx, wz);
                if ground < self.sea_level || ground + TRUNK_HEIGHT + 2 > max_y {
                    continue;
                }

                let (kind, species) = match (roll >> 8) % 6 {
                    s @ 0..=3 => (MaterialKind::Leaves, s as u8),
                    s => (MaterialKind::Leaves2, (s - 4) as u8),
                };
                Self::grow_tree(tile, x, ground + 1, z, kind, species, roll);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn grow_tree(
        tile: &mut Tile,
        x: usize,
        base: i32,
        z: usize,
        kind: MaterialKind,
        species: u8,
        roll: u64,
    ) {
        let top = base + TRUNK_HEIGHT - 1;
        let flags = if (roll >> 16).is_multiple_of(3) {
            NO_DECAY | CHECK_DECAY
        } else {
            NO_DECAY
        };

        for dy in -2i32..=1 {
            let radius: i32 = if dy < 0 { 2 } else { 1 };
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let lx = x as i32 + dx;
                    let lz = z as i32 + dz;
                    tile.set(
                        lx as usize,
                        top + dy,
                        lz as usize,
                        Cell::new(kind, species | flags),
                    );
                }
            }
        }

        for y in base..=top {
            tile.set(x, y, z, Cell::new(MaterialKind::Log, species));
        }
    }
}
