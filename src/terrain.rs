use fastnoise_lite::{FastNoiseLite, NoiseType};
use skyguard_blocks::{Block, BlockRegistry};
use skyguard_edit::BaseTerrain;
use skyguard_geom::BlockPos;
use skyguard_world::worldgen::TerrainConfig;

/// Rolling heightmap terrain: stone, a few layers of soil, a grass top, and
/// still water filling hollows up to the water line.
pub struct NoiseTerrain {
    noise: FastNoiseLite,
    min_h: i32,
    max_h: i32,
    world_height: i32,
    water_level: i32,
    topsoil: i32,
    stone: Block,
    soil: Block,
    top: Block,
    water: Block,
}

impl NoiseTerrain {
    pub fn new(cfg: &TerrainConfig, blocks: &BlockRegistry, seed: i64, world_height: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(cfg.frequency));
        let hf = world_height as f32;
        Self {
            noise,
            min_h: (hf * cfg.min_y_ratio) as i32,
            max_h: (hf * cfg.max_y_ratio) as i32,
            world_height,
            water_level: (hf * cfg.water_level_ratio) as i32,
            topsoil: cfg.topsoil_thickness.max(0),
            stone: blocks.resolve_or_fallback(&cfg.stone),
            soil: blocks.resolve_or_fallback(&cfg.soil),
            top: blocks.resolve_or_fallback(&cfg.top),
            water: blocks.resolve_or_fallback(&cfg.water),
        }
    }

    /// Surface height of column `(x, z)`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let n = self.noise.get_noise_2d(x as f32, z as f32);
        let span = (self.max_h - self.min_h) as f32;
        let h = ((n + 1.0) * 0.5 * span) as i32 + self.min_h;
        h.clamp(1, self.world_height - 1)
    }
}

impl BaseTerrain for NoiseTerrain {
    fn base_block(&self, pos: BlockPos) -> Block {
        let h = self.height_at(pos.x, pos.z);
        if pos.y > h {
            if pos.y <= self.water_level { self.water } else { Block::AIR }
        } else if pos.y == h {
            if h < self.water_level { self.soil } else { self.top }
        } else if pos.y > h - self.topsoil {
            self.soil
        } else {
            self.stone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_layer_from_stone_to_air() {
        let reg = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "rock-granite"
            [[blocks]]
            name = "soil-medium"
            [[blocks]]
            name = "soil-medium-grass"
            [[blocks]]
            name = "water-still-7"
            liquid = true
            "#,
        )
        .unwrap();
        let cfg = TerrainConfig::default();
        let t = NoiseTerrain::new(&cfg, &reg, 12, 256);
        for (x, z) in [(0, 0), (500, -300), (-77, 91)] {
            let h = t.height_at(x, z);
            assert!((89..=158).contains(&h), "{h}");
            assert_eq!(t.base_block(BlockPos::new(x, 0, z)), reg.make_block_by_name("rock-granite").unwrap());
            assert_eq!(t.base_block(BlockPos::new(x, 255, z)), Block::AIR);
        }
    }
}
