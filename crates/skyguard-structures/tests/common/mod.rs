#![allow(dead_code)]

use std::sync::Arc;

use skyguard_blocks::{Block, BlockRegistry, ItemRegistry};
use skyguard_edit::{FlatTerrain, SparseWorld};

pub const CATALOG: &str = r#"
[[blocks]]
name = "rock-granite"

[[blocks]]
name = "water-still-7"
liquid = true
replaceable = 9500

[[blocks]]
name = "tallgrass"
replaceable = 6500

[[blocks]]
name = "cobblestone-granite"

[[blocks]]
name = "planks-aged"

[[blocks]]
name = "ladder-north"

[[blocks]]
name = "cobblestonestairs-granite-down-north-free"

[[blocks]]
name = "cobblestonestairs-granite-down-south-free"

[[blocks]]
name = "cobblestonestairs-granite-down-east-free"

[[blocks]]
name = "cobblestonestairs-granite-down-west-free"

[[blocks]]
name = "bed-wood-head-east"

[[blocks]]
name = "bed-wood-feet-east"

[[blocks]]
name = "bed-wood-head-west"

[[blocks]]
name = "bed-wood-feet-west"

[[blocks]]
name = "woodencrate-opened"

[[blocks]]
name = "torch-burnedout-east"

[[blocks]]
name = "torch-burnedout-west"

[[blocks]]
name = "torch-burnedout-south"

[[blocks]]
name = "table-aged"

[[blocks]]
name = "chair-aged"

[[blocks]]
name = "chest-north"
container_slots = 16

[[blocks]]
name = "metalpartpile-small"

[[blocks]]
name = "metalpartpile-medium"

[[blocks]]
name = "loosegears-1"

[[blocks]]
name = "loosegears-3"

[[blocks]]
name = "woodenpath-ns"

[[blocks]]
name = "woodenpath-we"
"#;

pub fn registry() -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::from_toml_str(CATALOG).unwrap())
}

pub fn block(reg: &BlockRegistry, name: &str) -> Block {
    reg.make_block_by_name(name).unwrap()
}

pub fn items() -> ItemRegistry {
    ItemRegistry::from_toml_str(
        r#"
        [[items]]
        code = "rope"
        [[items]]
        code = "gear-rusty"
        max_stack = 4
        "#,
    )
    .unwrap()
}

/// Granite up to and including `top`, air above.
pub fn flat_world(reg: &Arc<BlockRegistry>, height: i32, top: i32) -> SparseWorld {
    let fill = block(reg, "rock-granite");
    SparseWorld::new(Arc::clone(reg), height, FlatTerrain { top, fill })
}
