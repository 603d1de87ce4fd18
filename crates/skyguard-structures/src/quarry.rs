//! Carves a region's quarry pit into one chunk and dresses it with access
//! paths and scrap.

use skyguard_blocks::{Block, BlockAccess};
use skyguard_geom::BlockPos;
use skyguard_world::noise::OctaveNoise;
use skyguard_world::rng::chunk_seed;
use skyguard_world::worldgen::QuarryConfig;
use skyguard_world::{CHUNK_SIZE, PathStub, QuarryPlan, SeededStream, WorldInfo};

use crate::paint;
use crate::palette::QuarryPalette;

/// Noise that roughens the stepped pit floor. Seeded per region so
/// neighbouring chunks agree on every shared column.
pub struct ErosionField {
    local: OctaveNoise,
    map: OctaveNoise,
    strength: f64,
    negative_mod: f64,
}

impl ErosionField {
    pub fn new(cfg: &QuarryConfig, region_seed: i64) -> Self {
        Self {
            local: OctaveNoise::new(&cfg.local_noise_amp, &cfg.local_noise_freq, region_seed),
            map: OctaveNoise::new(
                &cfg.erosion_map_noise_amp,
                &cfg.erosion_map_noise_freq,
                region_seed.wrapping_add(1),
            ),
            strength: cfg.erosion_strength as f64,
            negative_mod: cfg.erosion_negative_mod as f64,
        }
    }

    /// Signed depth adjustment at `(x, z)`; mostly negative, so erosion
    /// shallows the pit.
    pub fn sample(&self, x: i32, z: i32) -> f64 {
        let weight = (self.map.sample(x, z) - (1.0 - self.strength)).abs().clamp(0.0, 1.0);
        weight * (self.local.sample(x, z) - self.negative_mod)
    }
}

/// Lowest air cell of the carved column at `(x, z)`, or `None` when the pit
/// would start above the world.
pub fn carve_top(plan: &QuarryPlan, field: &ErosionField, sea: i32, height: i32, x: i32, z: i32) -> Option<i32> {
    let pit = plan.stepped_depth(x, z) + field.sample(x, z).floor() as i32;
    let from = sea - pit;
    (from < height).then_some(from)
}

/// Loose scrap dropped on the surface of a chunk.
struct Scatter {
    chance: f32,
    min: i32,
    max: i32,
    small: Block,
    medium: Block,
    small_chance: f32,
}

impl Scatter {
    fn place(&self, x0: i32, z0: i32, height: i32, rng: &mut SeededStream, access: &mut dyn BlockAccess) {
        if !rng.chance(self.chance) {
            return;
        }
        for _ in 0..rng.range(self.min, self.max) {
            let x = x0 + rng.next_int(CHUNK_SIZE);
            let z = z0 + rng.next_int(CHUNK_SIZE);
            let y = paint::find_ground_height(access, x, height - 1, z);
            let block = if rng.chance(self.small_chance) { self.small } else { self.medium };
            paint::place_block(access, BlockPos::new(x, y, z), block, true);
        }
    }
}

pub struct QuarryRenderer<'a> {
    pub cfg: &'a QuarryConfig,
    pub palette: &'a QuarryPalette,
}

impl QuarryRenderer<'_> {
    pub fn render_chunk(&self, plan: &QuarryPlan, world: &WorldInfo, cx: i32, cz: i32, access: &mut dyn BlockAccess) {
        if !plan.has_quarry || !plan.touches_chunk(cx, cz) {
            return;
        }
        let mut rng = SeededStream::new(chunk_seed(world.seed, cx, cz));
        let field = ErosionField::new(self.cfg, plan.region_seed);
        let (x0, z0) = (cx * CHUNK_SIZE, cz * CHUNK_SIZE);
        let height = access.world_height();
        let sea = world.estimated_sea_level();
        log::trace!("quarry chunk ({cx}, {cz}) of region {:?}", plan.key);

        for stub in &plan.stubs {
            self.path(stub, x0, z0, height, &mut rng, access);
        }

        let mut carved = 0usize;
        for x in x0..x0 + CHUNK_SIZE {
            for z in z0..z0 + CHUNK_SIZE {
                let Some(from) = carve_top(plan, &field, sea, height, x, z) else {
                    continue;
                };
                paint::place_column(access, x, z, from, height - 1, Block::AIR, true);
                paint::refresh_column(access, x, z, from - plan.step_depth, from);
                if plan.flooded && plan.overflow(x, z) == (0, 0) {
                    let surface = sea - plan.depth + plan.flooding_depth;
                    paint::place_column(access, x, z, from, surface, self.palette.water, true);
                }
                carved += 1;
            }
        }
        log::trace!("quarry chunk ({cx}, {cz}): {carved} columns carved");

        let cfg = self.cfg;
        let pal = self.palette;
        let gears = Scatter {
            chance: cfg.chance_of_gears_in_chunk,
            min: cfg.min_gears,
            max: cfg.max_gears,
            small: pal.gears_small,
            medium: pal.gears_medium,
            small_chance: cfg.chance_of_small_gear,
        };
        let parts = Scatter {
            chance: cfg.chance_of_metal_parts_in_chunk,
            min: cfg.min_metal_parts,
            max: cfg.max_metal_parts,
            small: pal.metal_parts_small,
            medium: pal.metal_parts_medium,
            small_chance: cfg.chance_of_small_parts,
        };
        for scatter in [gears, parts] {
            scatter.place(x0, z0, height, &mut rng, access);
        }
    }

    /// Lays the part of `stub` inside the chunk, thinning out over the last
    /// `path_fade_length` tiles.
    fn path(
        &self,
        stub: &PathStub,
        x0: i32,
        z0: i32,
        height: i32,
        rng: &mut SeededStream,
        access: &mut dyn BlockAccess,
    ) {
        let (min_x, max_x) = (stub.min_x().max(x0), stub.max_x().min(x0 + CHUNK_SIZE - 1));
        let (min_z, max_z) = (stub.min_z().max(z0), stub.max_z().min(z0 + CHUNK_SIZE - 1));
        if min_x > max_x || min_z > max_z {
            return;
        }
        let tile = if stub.runs_along_z() { self.palette.path_ns } else { self.palette.path_we };
        let fade = self.cfg.path_fade_length;

        for x in min_x..=max_x {
            for z in min_z..=max_z {
                let left = stub.distance_to_end(x, z) as f32;
                if left < fade {
                    let missing = 1.0 - left / fade;
                    if rng.next_float() <= missing {
                        continue;
                    }
                }
                let y = paint::find_ground_height(access, x, height - 1, z);
                let pos = BlockPos::new(x, y, z);
                if access.is_liquid(access.block(pos)) || access.is_liquid(access.block(pos.down())) {
                    continue;
                }
                paint::place_block(access, pos, tile, true);
            }
        }
    }
}
