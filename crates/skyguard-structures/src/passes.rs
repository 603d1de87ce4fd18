//! Generation passes the host runs per chunk, in phase then priority order.

use std::sync::Arc;

use skyguard_blocks::{BlockAccess, BlockRegistry, ItemCatalog};
use skyguard_world::region::cells_per_region;
use skyguard_world::worldgen::WorldGenConfig;
use skyguard_world::{FeatureGraph, QuarryPlan, RegionCache, RegionCacheStats, RegionKey, WorldInfo};

use crate::palette::{QuarryPalette, SkyBridgePalette};
use crate::quarry::QuarryRenderer;
use crate::skybridge::{SkyBridgeLoot, SkyBridgeRenderer};

/// Coarse ordering bucket; passes in an earlier phase always run first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenPhase {
    Terrain,
    TerrainFeatures,
    Vegetation,
}

/// Per-chunk inputs handed to every pass.
pub struct ChunkGenContext<'a> {
    pub cx: i32,
    pub cz: i32,
    pub items: &'a dyn ItemCatalog,
}

pub trait GenerationPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn phase(&self) -> GenPhase;
    /// Lower runs earlier within a phase.
    fn priority(&self) -> f64;
    fn generate_chunk(&self, ctx: &ChunkGenContext<'_>, access: &mut dyn BlockAccess);
}

#[derive(Default)]
pub struct PassRegistry {
    passes: Vec<Box<dyn GenerationPass>>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `pass` after every pass that sorts at or before it.
    pub fn register(&mut self, pass: Box<dyn GenerationPass>) {
        let key = (pass.phase(), pass.priority());
        let at = self.passes.partition_point(|p| {
            let k = (p.phase(), p.priority());
            k.0 < key.0 || (k.0 == key.0 && k.1.total_cmp(&key.1).is_le())
        });
        log::debug!("registered pass `{}` ({:?}, {})", pass.name(), key.0, key.1);
        self.passes.insert(at, pass);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn run_chunk(&self, ctx: &ChunkGenContext<'_>, access: &mut dyn BlockAccess) {
        for pass in &self.passes {
            pass.generate_chunk(ctx, access);
        }
    }

    /// Quarry then sky-bridge, both bound to `world`.
    pub fn with_default_passes(cfg: &Arc<WorldGenConfig>, blocks: &BlockRegistry, world: WorldInfo) -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(QuarryPass::new(Arc::clone(cfg), blocks, world)));
        reg.register(Box::new(SkyBridgePass::new(Arc::clone(cfg), blocks, world)));
        reg
    }
}

fn make_cache<T>(capacity: usize) -> Option<RegionCache<T>> {
    (capacity > 0).then(|| RegionCache::new(capacity))
}

/// Looks `key` up in `cache`, or builds it fresh when caching is off.
fn cached<T>(cache: &Option<RegionCache<T>>, key: RegionKey, build: impl FnOnce() -> T) -> Arc<T> {
    match cache {
        Some(c) => c.get_or_insert_with(key, build),
        None => Arc::new(build()),
    }
}

pub struct QuarryPass {
    cfg: Arc<WorldGenConfig>,
    palette: QuarryPalette,
    world: WorldInfo,
    cache: Option<RegionCache<QuarryPlan>>,
}

impl QuarryPass {
    pub const PRIORITY: f64 = 0.38;

    pub fn new(cfg: Arc<WorldGenConfig>, blocks: &BlockRegistry, world: WorldInfo) -> Self {
        let cache = make_cache(cfg.cache.region_capacity);
        Self {
            palette: QuarryPalette::resolve(blocks),
            cfg,
            world,
            cache,
        }
    }

    /// Plan for the region owning chunk `(cx, cz)`.
    pub fn plan_for_chunk(&self, cx: i32, cz: i32) -> Arc<QuarryPlan> {
        let region = &self.cfg.quarry_region;
        let key = RegionKey::containing(cx, cz, cells_per_region(region.region_size));
        cached(&self.cache, key, || QuarryPlan::for_region(region, &self.world, key))
    }

    pub fn cache_stats(&self) -> Option<RegionCacheStats> {
        self.cache.as_ref().map(RegionCache::snapshot)
    }
}

impl GenerationPass for QuarryPass {
    fn name(&self) -> &'static str {
        "quarry"
    }

    fn phase(&self) -> GenPhase {
        GenPhase::TerrainFeatures
    }

    fn priority(&self) -> f64 {
        Self::PRIORITY
    }

    fn generate_chunk(&self, ctx: &ChunkGenContext<'_>, access: &mut dyn BlockAccess) {
        let plan = self.plan_for_chunk(ctx.cx, ctx.cz);
        let renderer = QuarryRenderer {
            cfg: &self.cfg.quarry,
            palette: &self.palette,
        };
        renderer.render_chunk(&plan, &self.world, ctx.cx, ctx.cz, access);
    }
}

pub struct SkyBridgePass {
    cfg: Arc<WorldGenConfig>,
    palette: SkyBridgePalette,
    loot: SkyBridgeLoot,
    world: WorldInfo,
    cache: Option<RegionCache<FeatureGraph>>,
}

impl SkyBridgePass {
    pub const PRIORITY: f64 = 0.39;

    pub fn new(cfg: Arc<WorldGenConfig>, blocks: &BlockRegistry, world: WorldInfo) -> Self {
        let cache = make_cache(cfg.cache.region_capacity);
        Self {
            palette: SkyBridgePalette::resolve(blocks),
            loot: SkyBridgeLoot::from_config(&cfg.skybridge),
            cfg,
            world,
            cache,
        }
    }

    pub fn graph_for_chunk(&self, cx: i32, cz: i32) -> Arc<FeatureGraph> {
        let region = &self.cfg.skybridge_region;
        let key = RegionKey::containing(cx, cz, cells_per_region(region.region_size));
        cached(&self.cache, key, || FeatureGraph::for_region(region, &self.world, key))
    }

    pub fn cache_stats(&self) -> Option<RegionCacheStats> {
        self.cache.as_ref().map(RegionCache::snapshot)
    }
}

impl GenerationPass for SkyBridgePass {
    fn name(&self) -> &'static str {
        "sky-bridge"
    }

    fn phase(&self) -> GenPhase {
        GenPhase::TerrainFeatures
    }

    fn priority(&self) -> f64 {
        Self::PRIORITY
    }

    fn generate_chunk(&self, ctx: &ChunkGenContext<'_>, access: &mut dyn BlockAccess) {
        let graph = self.graph_for_chunk(ctx.cx, ctx.cz);
        if !graph.is_active() {
            return;
        }
        let renderer = SkyBridgeRenderer {
            cfg: &self.cfg.skybridge,
            palette: &self.palette,
            loot: &self.loot,
            items: ctx.items,
        };
        renderer.render_chunk(&graph, &self.world, ctx.cx, ctx.cz, access);
    }
}
