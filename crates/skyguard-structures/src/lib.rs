//! Painting primitives, loot, block palettes, and the chunk renderers for
//! sky bridges and quarries, wired into ordered generation passes.
#![forbid(unsafe_code)]

pub mod loot;
pub mod paint;
pub mod palette;
pub mod passes;
pub mod quarry;
pub mod skybridge;

pub use loot::LootTable;
pub use palette::{QuarryPalette, SkyBridgePalette};
pub use passes::{ChunkGenContext, GenPhase, GenerationPass, PassRegistry, QuarryPass, SkyBridgePass};
pub use quarry::{ErosionField, QuarryRenderer, carve_top};
pub use skybridge::{SPAN_ORDER, SkyBridgeLoot, SkyBridgeRenderer, connections, connects_to};
