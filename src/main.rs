mod terrain;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use hashbrown::HashMap;
use rayon::prelude::*;
use skyguard_blocks::{BlockRegistry, ItemRegistry};
use skyguard_edit::SparseWorld;
use skyguard_structures::{ChunkGenContext, PassRegistry, QuarryPass, SkyBridgePass};
use skyguard_world::worldgen::{WorldGenConfig, load_config_from_path};
use skyguard_world::{CHUNK_SIZE, FeatureGraph, QuarryPlan, RegionKey, RegionCacheStats, WorldInfo};
use skyguard_world::region::cells_per_region;

use terrain::NoiseTerrain;

#[derive(Parser)]
#[command(name = "skyguard", about = "Sky-bridge and quarry generation over a sparse voxel world")]
struct Cli {
    /// Worldgen TOML; defaults apply when the file is missing
    #[arg(long, global = true, default_value = "assets/worldgen/skyguard.toml")]
    config: PathBuf,
    /// Block catalog TOML
    #[arg(long, global = true, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Item catalog TOML
    #[arg(long, global = true, default_value = "assets/items.toml")]
    items: PathBuf,
    #[arg(long, global = true, default_value_t = 1337, allow_hyphen_values = true)]
    seed: i64,
    /// World height in blocks
    #[arg(long, global = true, default_value_t = 256)]
    height: i32,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sky-bridge grid and quarry plan of one region
    Map {
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        region_x: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        region_z: i32,
    },
    /// Derive plans for every region within `radius` and tally them
    Scan {
        #[arg(long, default_value_t = 2)]
        radius: i32,
    },
    /// Generate a chunk range and report what was written
    Generate {
        /// First chunk as X,Z
        #[arg(long, value_parser = parse_chunk, allow_hyphen_values = true)]
        from: (i32, i32),
        /// Last chunk as X,Z (inclusive)
        #[arg(long, value_parser = parse_chunk, allow_hyphen_values = true)]
        to: (i32, i32),
    },
    /// Generate a chunk range in both orders and compare the results
    Verify {
        #[arg(long, value_parser = parse_chunk, allow_hyphen_values = true)]
        from: (i32, i32),
        #[arg(long, value_parser = parse_chunk, allow_hyphen_values = true)]
        to: (i32, i32),
    },
}

fn parse_chunk(s: &str) -> Result<(i32, i32), String> {
    let (x, z) = s.split_once(',').ok_or_else(|| format!("expected X,Z, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad chunk x `{x}`: {e}"))?;
    let z = z.trim().parse().map_err(|e| format!("bad chunk z `{z}`: {e}"))?;
    Ok((x, z))
}

/// Everything a subcommand needs, loaded once.
struct Host {
    cfg: Arc<WorldGenConfig>,
    blocks: Arc<BlockRegistry>,
    items: ItemRegistry,
    world: WorldInfo,
}

impl Host {
    fn load(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let cfg = if cli.config.exists() {
            load_config_from_path(&cli.config)?
        } else {
            log::warn!("{} not found; using built-in worldgen defaults", cli.config.display());
            WorldGenConfig::default()
        };
        let blocks = BlockRegistry::load_from_path(&cli.blocks)?;
        let items = ItemRegistry::load_from_path(&cli.items)?;
        if cli.height < 16 {
            return Err(format!("world height {} is too low", cli.height).into());
        }
        log::info!(
            "seed {} height {} ({} blocks from {})",
            cli.seed,
            cli.height,
            blocks.blocks.len(),
            display(&cli.blocks)
        );
        Ok(Self {
            cfg: Arc::new(cfg),
            blocks: Arc::new(blocks),
            items,
            world: WorldInfo::new(cli.seed, cli.height),
        })
    }

    fn passes(&self) -> PassRegistry {
        PassRegistry::with_default_passes(&self.cfg, &self.blocks, self.world)
    }

    fn generate(&self, passes: &PassRegistry, chunks: &[(i32, i32)]) -> SparseWorld {
        let terrain = NoiseTerrain::new(&self.cfg.terrain, &self.blocks, self.world.seed, self.world.height);
        let mut world = SparseWorld::new(Arc::clone(&self.blocks), self.world.height, terrain);
        for &(cx, cz) in chunks {
            let ctx = ChunkGenContext {
                cx,
                cz,
                items: &self.items,
            };
            passes.run_chunk(&ctx, &mut world);
        }
        world
    }
}

fn display(p: &Path) -> String {
    p.display().to_string()
}

fn chunk_range(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
    let (z0, z1) = (from.1.min(to.1), from.1.max(to.1));
    (x0..=x1).flat_map(|x| (z0..=z1).map(move |z| (x, z))).collect()
}

fn map(host: &Host, rx: i32, rz: i32) {
    let region = &host.cfg.skybridge_region;
    let n = cells_per_region(region.region_size);
    let graph = FeatureGraph::for_region(region, &host.world, RegionKey::new(rx * n, rz * n));
    println!(
        "sky-bridge region ({rx}, {rz}) base chunk ({}, {})",
        graph.key().base_cx,
        graph.key().base_cz
    );
    if graph.is_active() {
        let (cx, cz) = graph.center();
        println!(
            "  height {} width {} center ({cx}, {cz}) heads {:?}",
            graph.height(),
            graph.width(),
            graph.head_lengths()
        );
        for z in 0..n {
            let row: String = (0..n).map(|x| graph.cell(x, z).glyph()).collect();
            println!("  {row}");
        }
    } else {
        println!("  inactive");
    }

    let region = &host.cfg.quarry_region;
    let n = cells_per_region(region.region_size);
    let plan = QuarryPlan::for_region(region, &host.world, RegionKey::new(rx * n, rz * n));
    if plan.has_quarry {
        println!(
            "quarry at ({}, {}) {}x{} depth {} step {} flooded {} stubs {} box ({}, {})..=({}, {})",
            plan.base_x,
            plan.base_z,
            plan.width_x,
            plan.width_z,
            plan.depth,
            plan.step_depth,
            plan.flooded,
            plan.stubs.len(),
            plan.min_x,
            plan.min_z,
            plan.max_x,
            plan.max_z
        );
    } else {
        println!("no quarry");
    }
}

fn scan(host: &Host, radius: i32) {
    let started = Instant::now();
    let bridges = SkyBridgePass::new(Arc::clone(&host.cfg), &host.blocks, host.world);
    let quarries = QuarryPass::new(Arc::clone(&host.cfg), &host.blocks, host.world);
    let n = cells_per_region(host.cfg.skybridge_region.region_size);

    let regions: Vec<(i32, i32)> = (-radius..=radius)
        .flat_map(|x| (-radius..=radius).map(move |z| (x, z)))
        .collect();
    // Walk every chunk of each region so lookups go through the shared caches
    // the same way generation does.
    let tally = regions
        .par_iter()
        .map(|&(rx, rz)| {
            let mut counts: HashMap<&'static str, usize> = HashMap::new();
            for cx in rx * n..(rx + 1) * n {
                for cz in rz * n..(rz + 1) * n {
                    let graph = bridges.graph_for_chunk(cx, cz);
                    if graph.is_active() && cx == graph.key().base_cx && cz == graph.key().base_cz {
                        *counts.entry("active sky-bridge regions").or_default() += 1;
                    }
                    let label = feature_label(graph.get_feature(cx, cz));
                    if let Some(label) = label {
                        *counts.entry(label).or_default() += 1;
                    }
                    if quarries.plan_for_chunk(cx, cz).touches_chunk(cx, cz) {
                        *counts.entry("quarry chunks").or_default() += 1;
                    }
                }
            }
            counts
        })
        .reduce(HashMap::new, |mut a, b| {
            for (k, v) in b {
                *a.entry(k).or_default() += v;
            }
            a
        });

    println!(
        "scanned {} regions ({} chunks) in {:.2?}",
        regions.len(),
        regions.len() as i64 * (n * n) as i64,
        started.elapsed()
    );
    let mut rows: Vec<_> = tally.into_iter().collect();
    rows.sort();
    for (label, count) in rows {
        println!("  {label:<26} {count}");
    }
    print_cache("sky-bridge", bridges.cache_stats());
    print_cache("quarry", quarries.cache_stats());
}

fn feature_label(f: skyguard_world::SkyBridgeFeature) -> Option<&'static str> {
    use skyguard_world::SkyBridgeFeature as F;
    match f {
        F::None => None,
        F::Bridge => Some("bridge chunks"),
        F::BrokenBridge => Some("broken chunks"),
        F::Building => Some("building chunks"),
        F::Tower => Some("tower chunks"),
        F::Center => Some("center chunks"),
    }
}

fn print_cache(name: &str, stats: Option<RegionCacheStats>) {
    match stats {
        Some(s) => println!(
            "  {name} cache: {} hits, {} misses, {} evictions, {} entries",
            s.hits, s.misses, s.evictions, s.entries
        ),
        None => println!("  {name} cache: disabled"),
    }
}

fn generate(host: &Host, from: (i32, i32), to: (i32, i32)) {
    let chunks = chunk_range(from, to);
    let passes = host.passes();
    log::debug!("passes: {:?}", passes.names());
    let started = Instant::now();
    let world = host.generate(&passes, &chunks);
    let stats = world.stats();
    println!(
        "generated {} chunks in {:.2?}: {} writes, {} edited blocks in {} chunk columns, {} containers",
        chunks.len(),
        started.elapsed(),
        stats.writes,
        stats.block_edits,
        stats.chunk_entries,
        stats.containers
    );
    let filled = world.containers().filter(|(_, c)| c.filled_slots() > 0).count();
    println!("  {filled} containers hold loot");
}

fn verify(host: &Host, from: (i32, i32), to: (i32, i32)) -> Result<(), Box<dyn Error>> {
    let forward = chunk_range(from, to);
    let mut backward = forward.clone();
    backward.reverse();
    let passes = host.passes();
    let a = host.generate(&passes, &forward);
    let b = host.generate(&passes, &backward);
    let diff = a.diff(&b);
    if !diff.is_empty() {
        for pos in diff.iter().take(8) {
            log::error!("order-dependent block at {pos:?}");
        }
        return Err(format!("{} blocks differ between chunk orders", diff.len()).into());
    }
    println!(
        "{} chunks identical in both orders ({} edited blocks)",
        forward.len(),
        a.stats().block_edits
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let host = Host::load(&cli)?;
    log::debug!("chunk size {CHUNK_SIZE}, sea level {}", host.world.estimated_sea_level());
    match cli.command {
        Command::Map { region_x, region_z } => map(&host, region_x, region_z),
        Command::Scan { radius } => scan(&host, radius.max(0)),
        Command::Generate { from, to } => generate(&host, from, to),
        Command::Verify { from, to } => verify(&host, from, to)?,
    }
    Ok(())
}
