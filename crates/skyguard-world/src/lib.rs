//! Region planning for sky bridges and quarries: seeded streams, worldgen
//! parameters, feature graphs, quarry plans, and the region cache.
#![forbid(unsafe_code)]

pub mod noise;
pub mod quarry;
pub mod region;
pub mod region_cache;
pub mod rng;
pub mod skybridge;
pub mod worldgen;

pub use quarry::{PathStub, QuarryPlan};
pub use region::{CHUNK_SIZE, RegionKey, WorldInfo};
pub use region_cache::{RegionCache, RegionCacheStats};
pub use rng::SeededStream;
pub use skybridge::{FeatureGraph, SkyBridgeFeature};
pub use worldgen::{ConfigError, WorldGenConfig};
