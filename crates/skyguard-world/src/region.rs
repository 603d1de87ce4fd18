use skyguard_geom::{BlockBox, BlockPos};

use crate::rng;

/// Horizontal chunk edge length in blocks.
pub const CHUNK_SIZE: i32 = 32;

/// Per-world constants every generator reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldInfo {
    pub seed: i64,
    pub height: i32,
}

impl WorldInfo {
    #[inline]
    pub const fn new(seed: i64, height: i32) -> Self {
        Self { seed, height }
    }

    /// Rough sea level the quarry carver aims its pits at.
    #[inline]
    pub fn estimated_sea_level(&self) -> i32 {
        (self.height as f32 * 0.43) as i32
    }
}

/// Number of chunk cells along one side of a region.
#[inline]
pub fn cells_per_region(region_size: i32) -> i32 {
    (region_size / CHUNK_SIZE).max(1)
}

/// Identifies a region by the chunk coordinate of its origin corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub base_cx: i32,
    pub base_cz: i32,
}

impl RegionKey {
    #[inline]
    pub const fn new(base_cx: i32, base_cz: i32) -> Self {
        Self { base_cx, base_cz }
    }

    /// Region owning chunk `(cx, cz)`; floors toward negative infinity.
    #[inline]
    pub fn containing(cx: i32, cz: i32, num_cells: i32) -> Self {
        Self {
            base_cx: cx.div_euclid(num_cells) * num_cells,
            base_cz: cz.div_euclid(num_cells) * num_cells,
        }
    }

    #[inline]
    pub fn block_origin(&self) -> (i32, i32) {
        (self.base_cx * CHUNK_SIZE, self.base_cz * CHUNK_SIZE)
    }

    #[inline]
    pub fn seed(&self, world_seed: i64) -> i64 {
        rng::region_seed(world_seed, self.base_cx, self.base_cz)
    }
}

/// Full-height box covered by chunk `(cx, cz)`.
#[inline]
pub fn chunk_box(cx: i32, cz: i32, world_height: i32) -> BlockBox {
    let x0 = cx * CHUNK_SIZE;
    let z0 = cz * CHUNK_SIZE;
    BlockBox::new(
        BlockPos::new(x0, 0, z0),
        BlockPos::new(x0 + CHUNK_SIZE - 1, world_height - 1, z0 + CHUNK_SIZE - 1),
    )
}
