use std::collections::VecDeque;

use crate::region::{RegionKey, WorldInfo, cells_per_region};
use crate::rng::SeededStream;
use crate::worldgen::SkyBridgeRegionConfig;

/// Structural role of one chunk cell in a sky-bridge region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SkyBridgeFeature {
    #[default]
    None,
    Bridge,
    BrokenBridge,
    Building,
    Tower,
    Center,
}

impl SkyBridgeFeature {
    #[inline]
    pub fn is_none(self) -> bool {
        matches!(self, SkyBridgeFeature::None)
    }

    /// Map glyph used by the region preview.
    pub fn glyph(self) -> char {
        match self {
            SkyBridgeFeature::None => '.',
            SkyBridgeFeature::Bridge => '=',
            SkyBridgeFeature::BrokenBridge => '~',
            SkyBridgeFeature::Building => 'B',
            SkyBridgeFeature::Tower => 'T',
            SkyBridgeFeature::Center => 'C',
        }
    }
}

/// Random-walk cursor: cell position, unit direction, and remaining budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathHead {
    pub x: i32,
    pub z: i32,
    pub dx: i32,
    pub dz: i32,
    pub len: i32,
}

impl PathHead {
    #[inline]
    fn advance(&mut self) {
        self.x += self.dx;
        self.z += self.dz;
        self.len -= 1;
    }

    /// Swaps the travel axis, picking the new sign from one draw.
    #[inline]
    fn turn(&mut self, rng: &mut SeededStream) {
        let sign = if rng.next_float() > 0.5 { 1 } else { -1 };
        if self.dx != 0 {
            self.dx = 0;
            self.dz = sign;
        } else {
            self.dz = 0;
            self.dx = sign;
        }
    }
}

/// Branches for a tee whose legs leave on both sides of the travel axis.
/// The first head is queued; the second replaces the walking head.
pub(crate) fn side_tee_branches(head: &PathHead, decrement: i32) -> [PathHead; 2] {
    let mut a = *head;
    let mut b = *head;
    if head.dx != 0 {
        a.dx = 0;
        a.dz = 1;
        a.z += 1;
        b.dx = 0;
        b.dz = -1;
        b.z -= 1;
    } else {
        a.dz = 0;
        a.dx = 1;
        a.x += 1;
        b.dz = 0;
        b.dx = -1;
        b.x -= 1;
    }
    a.len -= decrement;
    b.len -= decrement;
    [a, b]
}

/// Branches queued at a 4-way intersection.
///
/// Unmirrored, X-travelling heads spawn two identical +Z branches and
/// Z-travelling heads spawn a +X branch plus a -X branch that starts on the
/// +X side. Mirroring sends the pair to opposite sides.
pub(crate) fn four_way_branches(head: &PathHead, decrement: i32, mirror: bool) -> [PathHead; 2] {
    let mut a = *head;
    let mut b = *head;
    a.len -= decrement;
    b.len -= decrement;
    if head.dx != 0 {
        a.dx = 0;
        a.dz = 1;
        a.z += 1;
        b.dx = 0;
        if mirror {
            b.dz = -1;
            b.z -= 1;
        } else {
            b.dz = 1;
            b.z += 1;
        }
    } else {
        a.dz = 0;
        a.dx = 1;
        a.x += 1;
        b.dz = 0;
        b.dx = -1;
        b.x += if mirror { -1 } else { 1 };
    }
    [a, b]
}

/// Feature map of one sky-bridge region, grown by a branching random walk.
///
/// The graph is a pure function of the world seed and region origin, so it
/// may be rebuilt on every chunk or shared through a cache.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureGraph {
    key: RegionKey,
    num_cells: i32,
    active: bool,
    height: i32,
    width: i32,
    center: (i32, i32),
    head_lengths: [i32; 4],
    cells: Vec<SkyBridgeFeature>,
}

impl FeatureGraph {
    /// Graph of the region owning chunk `(cx, cz)`.
    pub fn resolve(cfg: &SkyBridgeRegionConfig, world: &WorldInfo, cx: i32, cz: i32) -> Self {
        let key = RegionKey::containing(cx, cz, cells_per_region(cfg.region_size));
        Self::for_region(cfg, world, key)
    }

    pub fn for_region(cfg: &SkyBridgeRegionConfig, world: &WorldInfo, key: RegionKey) -> Self {
        let num_cells = cells_per_region(cfg.region_size);
        let mut rng = SeededStream::new(key.seed(world.seed));
        let mut graph = FeatureGraph {
            key,
            num_cells,
            active: false,
            height: 0,
            width: 0,
            center: (0, 0),
            head_lengths: [0; 4],
            cells: Vec::new(),
        };
        if !rng.chance(cfg.chance_of_region) {
            log::debug!("sky bridge region {:?} inactive", key);
            return graph;
        }
        graph.active = true;
        let prop = rng.next_float() * (cfg.max_height_prop - cfg.min_height_prop) + cfg.min_height_prop;
        graph.height = (prop * world.height as f32) as i32;
        graph.width = rng.range(cfg.min_width, cfg.max_width);
        graph.cells = vec![SkyBridgeFeature::None; (num_cells * num_cells) as usize];

        let span = (num_cells as f32 * cfg.range_for_center) as i32;
        let offset = cfg.range_for_center * num_cells as f32 / 2.0;
        let center_x = (rng.next_int(span) as f32 + offset) as i32;
        let center_z = (rng.next_int(span) as f32 + offset) as i32;
        graph.center = (center_x, center_z);
        graph.set(center_x, center_z, SkyBridgeFeature::Center);

        let mut queue: VecDeque<PathHead> = VecDeque::new();
        for (i, (dx, dz)) in [(1, 0), (-1, 0), (0, 1), (0, -1)].into_iter().enumerate() {
            let len = rng.range(cfg.min_path_length, cfg.max_path_length);
            graph.head_lengths[i] = len;
            queue.push_back(PathHead {
                x: center_x + dx,
                z: center_z + dz,
                dx,
                dz,
                len,
            });
        }

        while let Some(mut head) = queue.pop_front() {
            while head.len > 0 {
                if !graph.in_grid(head.x, head.z) || !graph.raw(head.x, head.z).is_none() {
                    break;
                }
                let feature = graph.roll_feature(cfg, &mut rng, head.x, head.z);
                graph.set(head.x, head.z, feature);
                graph.step_head(cfg, &mut rng, &mut head, &mut queue);
            }
        }

        log::debug!(
            "sky bridge region {:?}: height={} width={} center={:?} cells={}",
            key,
            graph.height,
            graph.width,
            graph.center,
            graph.cells.iter().filter(|c| !c.is_none()).count()
        );
        graph
    }

    /// Builds a graph from an explicit cell grid in row-major `(z, x)` order.
    /// Returns `None` unless `cells` holds exactly `num_cells²` entries.
    pub fn from_cells(
        key: RegionKey,
        num_cells: i32,
        height: i32,
        width: i32,
        cells: Vec<SkyBridgeFeature>,
    ) -> Option<Self> {
        if num_cells <= 0 || cells.len() != (num_cells * num_cells) as usize {
            return None;
        }
        let center = cells
            .iter()
            .position(|c| *c == SkyBridgeFeature::Center)
            .map(|i| (i as i32 % num_cells, i as i32 / num_cells))
            .unwrap_or((0, 0));
        Some(FeatureGraph {
            key,
            num_cells,
            active: true,
            height,
            width,
            center,
            head_lengths: [0; 4],
            cells,
        })
    }

    fn roll_feature(
        &self,
        cfg: &SkyBridgeRegionConfig,
        rng: &mut SeededStream,
        x: i32,
        z: i32,
    ) -> SkyBridgeFeature {
        let special = rng.next_float();
        if special > cfg.building_chance + cfg.tower_chance {
            let (ddx, ddz) = ((x - self.center.0) as f64, (z - self.center.1) as f64);
            let half = (self.num_cells / 2).max(1) as f64;
            let break_chance = cfg.broken_bridge_min as f64
                + (cfg.broken_bridge_max - cfg.broken_bridge_min) as f64 * (ddx * ddx + ddz * ddz).sqrt()
                    / half;
            if (rng.next_float() as f64) < break_chance {
                SkyBridgeFeature::BrokenBridge
            } else {
                SkyBridgeFeature::Bridge
            }
        } else if special > cfg.building_chance {
            SkyBridgeFeature::Tower
        } else {
            SkyBridgeFeature::Building
        }
    }

    fn step_head(
        &self,
        cfg: &SkyBridgeRegionConfig,
        rng: &mut SeededStream,
        head: &mut PathHead,
        queue: &mut VecDeque<PathHead>,
    ) {
        if rng.chance(cfg.straight_walk_chance) {
            head.advance();
            return;
        }
        let shape = rng.next_float();
        if shape < 0.5 {
            head.turn(rng);
            head.advance();
        } else if shape < 0.75 {
            if rng.next_float() < 2.0 / 3.0 {
                let mut forward = *head;
                forward.advance();
                queue.push_back(forward);
                head.turn(rng);
                head.advance();
            } else {
                let [queued, walking] = side_tee_branches(head, cfg.branch_path_decrement);
                queue.push_back(queued);
                *head = walking;
            }
        } else {
            let [a, b] = four_way_branches(head, cfg.branch_path_decrement, cfg.mirror_four_way_branches);
            queue.push_back(a);
            queue.push_back(b);
            head.advance();
        }
    }

    #[inline]
    fn in_grid(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.num_cells && z < self.num_cells
    }

    #[inline]
    fn raw(&self, x: i32, z: i32) -> SkyBridgeFeature {
        self.cells[(z * self.num_cells + x) as usize]
    }

    #[inline]
    fn set(&mut self, x: i32, z: i32, f: SkyBridgeFeature) {
        if self.in_grid(x, z) {
            let n = self.num_cells;
            self.cells[(z * n + x) as usize] = f;
        }
    }

    /// Cell at local indices, including the unused margin row and column.
    pub fn cell(&self, x: i32, z: i32) -> SkyBridgeFeature {
        if !self.active || !self.in_grid(x, z) {
            return SkyBridgeFeature::None;
        }
        self.raw(x, z)
    }

    /// Feature rendered at chunk `(cx, cz)`. Local index 0 on either axis is
    /// outside the live range, so regions never render along their low edges.
    pub fn get_feature(&self, cx: i32, cz: i32) -> SkyBridgeFeature {
        let ix = cx - self.key.base_cx;
        let iz = cz - self.key.base_cz;
        if ix > 0 && iz > 0 && ix < self.num_cells && iz < self.num_cells {
            self.cell(ix, iz)
        } else {
            SkyBridgeFeature::None
        }
    }

    #[inline]
    pub fn key(&self) -> RegionKey {
        self.key
    }

    #[inline]
    pub fn num_cells(&self) -> i32 {
        self.num_cells
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Platform height in blocks.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tower edge length in blocks.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn center(&self) -> (i32, i32) {
        self.center
    }

    /// Budgets drawn for the four initial heads (+X, -X, +Z, -Z).
    #[inline]
    pub fn head_lengths(&self) -> [i32; 4] {
        self.head_lengths
    }

    pub fn count(&self, feature: SkyBridgeFeature) -> usize {
        self.cells.iter().filter(|c| **c == feature).count()
    }
}
