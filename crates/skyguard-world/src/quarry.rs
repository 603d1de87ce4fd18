use skyguard_geom::Cardinal;

use crate::region::{CHUNK_SIZE, RegionKey, WorldInfo, cells_per_region};
use crate::rng::SeededStream;
use crate::worldgen::QuarryRegionConfig;

/// Access path leaving one edge of the quarry rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStub {
    pub x: i32,
    pub z: i32,
    pub dir: Cardinal,
    pub length: i32,
    pub width: i32,
}

impl PathStub {
    #[inline]
    pub fn min_x(&self) -> i32 {
        if self.dir == Cardinal::West { self.x - self.length } else { self.x }
    }

    #[inline]
    pub fn min_z(&self) -> i32 {
        if self.dir == Cardinal::North { self.z - self.length } else { self.z }
    }

    /// Inclusive; the cross axis spans `width + 1` tiles.
    #[inline]
    pub fn max_x(&self) -> i32 {
        match self.dir {
            Cardinal::West => self.x,
            Cardinal::East => self.x + self.length,
            _ => self.x + self.width,
        }
    }

    #[inline]
    pub fn max_z(&self) -> i32 {
        match self.dir {
            Cardinal::North => self.z,
            Cardinal::South => self.z + self.length,
            _ => self.z + self.width,
        }
    }

    /// Tiles left before the far end of the stub, measured along its axis.
    #[inline]
    pub fn distance_to_end(&self, x: i32, z: i32) -> i32 {
        match self.dir {
            Cardinal::East => self.max_x() - x,
            Cardinal::West => x - self.min_x(),
            Cardinal::South => self.max_z() - z,
            Cardinal::North => z - self.min_z(),
        }
    }

    #[inline]
    pub fn runs_along_z(&self) -> bool {
        !self.dir.is_x_axis()
    }
}

/// Layout of the quarry owned by one region.
#[derive(Clone, Debug, PartialEq)]
pub struct QuarryPlan {
    pub key: RegionKey,
    pub region_seed: i64,
    pub has_quarry: bool,
    pub base_x: i32,
    pub base_z: i32,
    pub width_x: i32,
    pub width_z: i32,
    pub depth: i32,
    pub step_depth: i32,
    pub flooded: bool,
    pub flooding_depth: i32,
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
    pub stubs: Vec<PathStub>,
}

impl QuarryPlan {
    /// Plan of the region owning chunk `(cx, cz)`.
    pub fn resolve(cfg: &QuarryRegionConfig, world: &WorldInfo, cx: i32, cz: i32) -> Self {
        let key = RegionKey::containing(cx, cz, cells_per_region(cfg.region_size));
        Self::for_region(cfg, world, key)
    }

    pub fn for_region(cfg: &QuarryRegionConfig, world: &WorldInfo, key: RegionKey) -> Self {
        let region_seed = key.seed(world.seed);
        let mut rng = SeededStream::new(region_seed);
        let (origin_x, origin_z) = key.block_origin();

        let has_quarry = rng.chance(cfg.chance_of_quarry);
        let width_x = rng.range(cfg.min_width_x, cfg.max_width_x);
        let width_z = rng.range(cfg.min_width_z, cfg.max_width_z);

        // The pad never drops below the longest stub so -X/-Z stubs stay in the region.
        let pad = cfg.max_path_stub_length;
        let base_x = origin_x + pad + rng.next_int(width_x);
        let base_z = origin_z + pad + rng.next_int(width_z);

        let depth = rng.range(cfg.min_depth, cfg.max_depth);
        let step_depth = rng.range(cfg.min_step_depth, cfg.max_step_depth).max(1);
        let flooded = rng.chance(cfg.chance_of_flooding);
        let flooding_depth = if flooded {
            rng.range(cfg.min_flooding_depth, cfg.max_flooding_depth)
        } else {
            0
        };
        let num_stubs = rng.range(cfg.min_path_stubs, cfg.max_path_stubs);

        let slope = world.estimated_sea_level() / step_depth;
        let mut plan = QuarryPlan {
            key,
            region_seed,
            has_quarry,
            base_x,
            base_z,
            width_x,
            width_z,
            depth,
            step_depth,
            flooded,
            flooding_depth,
            min_x: base_x - slope,
            min_z: base_z - slope,
            max_x: base_x + width_x + slope,
            max_z: base_z + width_z + slope,
            stubs: Vec::with_capacity(num_stubs.max(0) as usize),
        };

        for _ in 0..num_stubs {
            let dir = match rng.next_int(4) {
                0 => Cardinal::East,
                1 => Cardinal::West,
                2 => Cardinal::South,
                _ => Cardinal::North,
            };
            let length = rng.range(cfg.min_path_stub_length, cfg.max_path_stub_length);
            let width = rng.range(cfg.min_path_stub_width, cfg.max_path_stub_width);
            let (x, z) = match dir {
                Cardinal::East => (base_x + width_x, base_z + rng.next_int(width_z)),
                Cardinal::West => (base_x, base_z + rng.next_int(width_z)),
                Cardinal::South => (base_x + rng.next_int(width_x), base_z + width_z),
                Cardinal::North => (base_x + rng.next_int(width_x), base_z),
            };
            let stub = PathStub {
                x,
                z,
                dir,
                length,
                width,
            };
            plan.min_x = plan.min_x.min(stub.min_x());
            plan.min_z = plan.min_z.min(stub.min_z());
            plan.max_x = plan.max_x.max(stub.max_x());
            plan.max_z = plan.max_z.max(stub.max_z());
            plan.stubs.push(stub);
        }

        log::debug!(
            "quarry region {:?}: present={} rect=({}, {}) {}x{} depth={} step={} flooded={} stubs={}",
            key,
            has_quarry,
            base_x,
            base_z,
            width_x,
            width_z,
            depth,
            step_depth,
            flooded,
            plan.stubs.len()
        );
        plan
    }

    /// Whether chunk `(cx, cz)` overlaps the plan's bounding box.
    pub fn touches_chunk(&self, cx: i32, cz: i32) -> bool {
        let x0 = cx * CHUNK_SIZE;
        let z0 = cz * CHUNK_SIZE;
        x0 <= self.max_x
            && z0 <= self.max_z
            && x0 + CHUNK_SIZE - 1 >= self.min_x
            && z0 + CHUNK_SIZE - 1 >= self.min_z
    }

    /// Per-axis distance of column `(x, z)` outside the rectangle `[base, base + width]`.
    #[inline]
    pub fn overflow(&self, x: i32, z: i32) -> (i32, i32) {
        let ox = if x < self.base_x {
            self.base_x - x
        } else if x > self.base_x + self.width_x {
            x - (self.base_x + self.width_x)
        } else {
            0
        };
        let oz = if z < self.base_z {
            self.base_z - z
        } else if z > self.base_z + self.width_z {
            z - (self.base_z + self.width_z)
        } else {
            0
        };
        (ox, oz)
    }

    /// Stepped pit depth before erosion.
    #[inline]
    pub fn stepped_depth(&self, x: i32, z: i32) -> i32 {
        let (ox, oz) = self.overflow(x, z);
        self.depth - self.step_depth * ox.max(oz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(dir: Cardinal) -> PathStub {
        PathStub {
            x: 100,
            z: 200,
            dir,
            length: 10,
            width: 3,
        }
    }

    #[test]
    fn stub_boxes_follow_direction() {
        let e = stub(Cardinal::East);
        assert_eq!((e.min_x(), e.max_x(), e.min_z(), e.max_z()), (100, 110, 200, 203));
        let w = stub(Cardinal::West);
        assert_eq!((w.min_x(), w.max_x()), (90, 100));
        let n = stub(Cardinal::North);
        assert_eq!((n.min_z(), n.max_z(), n.min_x(), n.max_x()), (190, 200, 100, 103));
    }

    #[test]
    fn fade_distance_measures_to_far_end() {
        assert_eq!(stub(Cardinal::East).distance_to_end(108, 201), 2);
        assert_eq!(stub(Cardinal::West).distance_to_end(91, 201), 1);
        assert_eq!(stub(Cardinal::South).distance_to_end(101, 210), 0);
        assert_eq!(stub(Cardinal::North).distance_to_end(101, 193), 3);
    }

    #[test]
    fn overflow_is_zero_inside_rectangle() {
        let cfg = QuarryRegionConfig::default();
        let plan = QuarryPlan::for_region(&cfg, &WorldInfo::new(3, 256), RegionKey::new(0, 0));
        assert_eq!(plan.overflow(plan.base_x, plan.base_z), (0, 0));
        assert_eq!(plan.overflow(plan.base_x + plan.width_x, plan.base_z + plan.width_z), (0, 0));
        assert_eq!(plan.overflow(plan.base_x - 2, plan.base_z + 1), (2, 0));
        assert_eq!(plan.stepped_depth(plan.base_x - 2, plan.base_z + 1), plan.depth - 2 * plan.step_depth);
    }

    #[test]
    fn absent_quarry_still_draws_layout() {
        let cfg = QuarryRegionConfig {
            chance_of_quarry: 0.0,
            ..QuarryRegionConfig::default()
        };
        let plan = QuarryPlan::resolve(&cfg, &WorldInfo::new(11, 256), 4, 4);
        assert!(!plan.has_quarry);
        assert!(plan.width_x >= cfg.min_width_x);
    }
}
