//! Renders one chunk of a sky-bridge network from its region's feature graph.

mod platform;
mod ruin;
mod span;

use skyguard_blocks::{Block, BlockAccess, ItemCatalog};
use skyguard_geom::{BlockPos, Cardinal};
use skyguard_world::rng::chunk_seed;
use skyguard_world::worldgen::SkyBridgeConfig;
use skyguard_world::{CHUNK_SIZE, FeatureGraph, SeededStream, SkyBridgeFeature, WorldInfo};

use crate::loot::LootTable;
use crate::paint;
use crate::palette::SkyBridgePalette;

/// Spans and rubble are laid toward neighbours in this order.
pub const SPAN_ORDER: [Cardinal; 4] = [Cardinal::South, Cardinal::North, Cardinal::East, Cardinal::West];

/// Loot tables for the three container kinds.
#[derive(Clone, Debug, Default)]
pub struct SkyBridgeLoot {
    pub tower: LootTable,
    pub barracks: LootTable,
    pub center: LootTable,
}

impl SkyBridgeLoot {
    pub fn from_config(cfg: &SkyBridgeConfig) -> Self {
        Self {
            tower: LootTable::from_config(&cfg.tower_loot),
            barracks: LootTable::from_config(&cfg.barracks_loot),
            center: LootTable::from_config(&cfg.center_loot),
        }
    }
}

/// Whether a cell lays a span (or, when broken, rubble) toward `neighbor`.
#[inline]
pub fn connects_to(neighbor: SkyBridgeFeature) -> bool {
    !matches!(neighbor, SkyBridgeFeature::None | SkyBridgeFeature::BrokenBridge)
}

/// Directions, in [`SPAN_ORDER`], toward which chunk `(cx, cz)` connects.
pub fn connections(graph: &FeatureGraph, cx: i32, cz: i32) -> Vec<Cardinal> {
    SPAN_ORDER
        .into_iter()
        .filter(|d| {
            let (dx, dz) = d.delta();
            connects_to(graph.get_feature(cx + dx, cz + dz))
        })
        .collect()
}

/// Tower footprint and height inside one chunk.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Site {
    pub base_x: i32,
    pub base_z: i32,
    pub corner_x: i32,
    pub corner_z: i32,
    pub width: i32,
    pub height: i32,
}

impl Site {
    fn new(cx: i32, cz: i32, width: i32, height: i32) -> Self {
        let base_x = cx * CHUNK_SIZE;
        let base_z = cz * CHUNK_SIZE;
        Self {
            base_x,
            base_z,
            corner_x: base_x + CHUNK_SIZE / 2 - width / 2,
            corner_z: base_z + CHUNK_SIZE / 2 - width / 2,
            width,
            height,
        }
    }

    #[inline]
    fn along_corner(&self, dir: Cardinal) -> i32 {
        if dir.is_x_axis() { self.corner_x } else { self.corner_z }
    }

    /// Tower corner on the axis perpendicular to `dir`.
    #[inline]
    pub fn cross_corner(&self, dir: Cardinal) -> i32 {
        if dir.is_x_axis() { self.corner_z } else { self.corner_x }
    }

    /// Along-axis coordinate of the tower wall facing `dir`.
    #[inline]
    pub fn tower_edge(&self, dir: Cardinal) -> i32 {
        self.platform_edge(dir, 0)
    }

    /// Along-axis coordinate of the platform rim facing `dir`.
    #[inline]
    pub fn platform_edge(&self, dir: Cardinal, extra: i32) -> i32 {
        if dir.sign() > 0 {
            self.along_corner(dir) + self.width - 1 + extra
        } else {
            self.along_corner(dir) - extra
        }
    }

    /// Last along-axis coordinate inside the chunk toward `dir`.
    #[inline]
    pub fn chunk_edge(&self, dir: Cardinal) -> i32 {
        let base = if dir.is_x_axis() { self.base_x } else { self.base_z };
        if dir.sign() > 0 { base + CHUNK_SIZE - 1 } else { base }
    }

    /// World position of `(along, cross)` for a run heading `dir`.
    #[inline]
    pub fn at(&self, dir: Cardinal, along: i32, cross: i32, y: i32) -> BlockPos {
        if dir.is_x_axis() {
            BlockPos::new(along, y, cross)
        } else {
            BlockPos::new(cross, y, along)
        }
    }
}

/// Along-axis coordinates from `from` to `to` inclusive, stepping toward `to`.
pub(crate) fn walk(from: i32, to: i32, step: i32) -> impl Iterator<Item = i32> {
    let n = if (to - from) * step >= 0 { (to - from) * step + 1 } else { 0 };
    (0..n).map(move |i| from + i * step)
}

/// Per-call rendering state: the chunk's stream, layout and accessor.
pub(crate) struct ChunkPainter<'a> {
    pub access: &'a mut dyn BlockAccess,
    pub rng: SeededStream,
    pub site: Site,
}

pub struct SkyBridgeRenderer<'a> {
    pub cfg: &'a SkyBridgeConfig,
    pub palette: &'a SkyBridgePalette,
    pub loot: &'a SkyBridgeLoot,
    pub items: &'a dyn ItemCatalog,
}

impl SkyBridgeRenderer<'_> {
    /// Paints chunk `(cx, cz)`. Writes stay inside the chunk's columns.
    pub fn render_chunk(
        &self,
        graph: &FeatureGraph,
        world: &WorldInfo,
        cx: i32,
        cz: i32,
        access: &mut dyn BlockAccess,
    ) {
        let feature = graph.get_feature(cx, cz);
        if feature.is_none() {
            return;
        }
        let dirs = connections(graph, cx, cz);
        log::trace!("sky bridge chunk ({cx}, {cz}): {feature:?} toward {dirs:?}");

        let mut p = ChunkPainter {
            access,
            rng: SeededStream::new(chunk_seed(world.seed, cx, cz)),
            site: Site::new(cx, cz, graph.width(), graph.height()),
        };

        if feature == SkyBridgeFeature::BrokenBridge {
            self.broken_tower(&mut p);
            for &dir in &dirs {
                self.rubble_toward(&mut p, dir);
                self.residual_deck(&mut p, dir);
            }
            return;
        }

        self.tower_shell(&mut p, feature);
        let extra = match feature {
            SkyBridgeFeature::Bridge if dirs.len() == 1 => {
                self.end_platform(&mut p);
                self.cfg.end_platform_extra_width
            }
            SkyBridgeFeature::Bridge => {
                self.platform(&mut p, 0, false);
                0
            }
            SkyBridgeFeature::Tower => {
                self.store_room(&mut p);
                self.cfg.store_room_platform_extra_width
            }
            SkyBridgeFeature::Building => {
                self.barracks(&mut p);
                self.cfg.barracks_platform_extra_width
            }
            SkyBridgeFeature::Center => {
                self.center(&mut p);
                self.cfg.center_platform_extra_width
            }
            SkyBridgeFeature::None | SkyBridgeFeature::BrokenBridge => 0,
        };
        for &dir in &dirs {
            self.span(&mut p, dir, extra);
        }
    }

    /// Hollow square shell from just below platform height to the ground.
    fn tower_shell(&self, p: &mut ChunkPainter<'_>, feature: SkyBridgeFeature) {
        let s = p.site;
        let w = s.width;
        for i in 0..w {
            for k in 0..w {
                if i != 0 && i != w - 1 && k != 0 && k != w - 1 {
                    continue;
                }
                let (x, z) = (s.corner_x + i, s.corner_z + k);
                let ground = paint::place_column_to_ground(p.access, x, s.height - 1, z, self.palette.cobble);
                if feature == SkyBridgeFeature::Tower && k == w / 2 {
                    paint::place_column(p.access, x, z, ground, ground + 2, Block::AIR, true);
                }
            }
        }
    }
}
