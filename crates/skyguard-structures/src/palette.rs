use skyguard_blocks::{Block, BlockRegistry};
use skyguard_geom::Cardinal;

/// Blocks the sky-bridge renderer places, resolved once per registry.
#[derive(Clone, Debug)]
pub struct SkyBridgePalette {
    pub cobble: Block,
    pub planks: Block,
    pub ladder: Block,
    // Indexed like `Cardinal::ALL`; each stair faces the named direction.
    stairs: [Block; 4],
    pub bed_head_east: Block,
    pub bed_foot_east: Block,
    pub bed_head_west: Block,
    pub bed_foot_west: Block,
    pub crate_block: Block,
    pub torch_east: Block,
    pub torch_west: Block,
    pub torch_south: Block,
    pub table: Block,
    pub chair: Block,
    pub chest: Block,
}

impl SkyBridgePalette {
    pub fn resolve(reg: &BlockRegistry) -> Self {
        let b = |name: &str| reg.resolve_or_fallback(name);
        Self {
            cobble: b("cobblestone-granite"),
            planks: b("planks-aged"),
            ladder: b("ladder-north"),
            stairs: Cardinal::ALL.map(|facing| b(&format!("cobblestonestairs-granite-down-{}-free", facing_name(facing)))),
            bed_head_east: b("bed-wood-head-east"),
            bed_foot_east: b("bed-wood-feet-east"),
            bed_head_west: b("bed-wood-head-west"),
            bed_foot_west: b("bed-wood-feet-west"),
            crate_block: b("woodencrate-opened"),
            torch_east: b("torch-burnedout-east"),
            torch_west: b("torch-burnedout-west"),
            torch_south: b("torch-burnedout-south"),
            table: b("table-aged"),
            chair: b("chair-aged"),
            chest: b("chest-north"),
        }
    }

    /// Arch stair facing `facing`.
    #[inline]
    pub fn stair(&self, facing: Cardinal) -> Block {
        self.stairs[facing as usize]
    }
}

fn facing_name(c: Cardinal) -> &'static str {
    match c {
        Cardinal::North => "north",
        Cardinal::South => "south",
        Cardinal::East => "east",
        Cardinal::West => "west",
    }
}

/// Blocks the quarry renderer places.
#[derive(Clone, Debug)]
pub struct QuarryPalette {
    pub water: Block,
    pub metal_parts_small: Block,
    pub metal_parts_medium: Block,
    pub gears_small: Block,
    pub gears_medium: Block,
    pub path_ns: Block,
    pub path_we: Block,
}

impl QuarryPalette {
    pub fn resolve(reg: &BlockRegistry) -> Self {
        let b = |name: &str| reg.resolve_or_fallback(name);
        Self {
            water: b("water-still-7"),
            metal_parts_small: b("metalpartpile-small"),
            metal_parts_medium: b("metalpartpile-medium"),
            gears_small: b("loosegears-1"),
            gears_medium: b("loosegears-3"),
            path_ns: b("woodenpath-ns"),
            path_we: b("woodenpath-we"),
        }
    }
}
