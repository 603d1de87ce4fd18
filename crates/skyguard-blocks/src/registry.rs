use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::types::{Block, BlockId};

/// Blocks whose replaceable value reaches this give way to lower-valued blocks.
pub const REPLACEABLE_THRESHOLD: u32 = 6000;
/// Replaceable value assigned to `air` when the catalog does not override it.
pub const AIR_REPLACEABLE: u32 = 9999;

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub liquid: bool,
    pub replaceable: u32,
    pub container_slots: u16,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            liquid: false,
            replaceable: 0,
            container_slots: 0,
        }
    }

    fn air() -> Self {
        BlockType {
            id: 0,
            name: "air".into(),
            solid: false,
            liquid: false,
            replaceable: AIR_REPLACEABLE,
            container_slots: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub unknown_block_id: Option<BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn make_block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::from_id)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    /// Builds the registry. Id 0 is always `air`; blocks without an explicit
    /// id take the next free slot in declaration order.
    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            blocks: vec![BlockType::air()],
            by_name: HashMap::new(),
            unknown_block_id: None,
        };
        for def in cfg.blocks.into_iter() {
            if def.name == "air" {
                if def.id.is_some_and(|id| id != 0) {
                    return Err("block `air` must use id 0".into());
                }
                reg.blocks[0] = compile_def(0, def);
                continue;
            }
            let id = match def.id {
                Some(0) => return Err(format!("block `{}` cannot take id 0", def.name).into()),
                Some(id) => id,
                None => reg.blocks.len() as BlockId,
            };
            let idx = id as usize;
            if idx >= reg.blocks.len() {
                let start = reg.blocks.len();
                for fill in start..=idx {
                    reg.blocks.push(BlockType::placeholder(fill as BlockId));
                }
            } else if !reg.blocks[idx].name.is_empty() {
                return Err(format!(
                    "block `{}` reuses id {} already taken by `{}`",
                    def.name, id, reg.blocks[idx].name
                )
                .into());
            }
            reg.blocks[idx] = compile_def(id, def);
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();
        if let Some(name) = cfg.unknown_block {
            reg.unknown_block_id = reg.id_by_name(&name);
        }
        Ok(reg)
    }

    /// Resolves a name, falling back to the configured unknown block, then air.
    pub fn resolve_or_fallback(&self, name: &str) -> Block {
        match self.id_by_name(name) {
            Some(id) => Block::from_id(id),
            None => {
                log::warn!("block `{}` not in catalog; using fallback", name);
                Block::from_id(self.unknown_block_id.unwrap_or(0))
            }
        }
    }

    #[inline]
    pub fn is_liquid(&self, b: Block) -> bool {
        self.get(b.id).is_some_and(|t| t.liquid)
    }

    #[inline]
    pub fn replaceable(&self, b: Block) -> u32 {
        self.get(b.id).map(|t| t.replaceable).unwrap_or(0)
    }

    /// Whether `replacement` may overwrite `existing`: the existing block must
    /// be a liquid or soft enough, and strictly softer than the replacement.
    pub fn is_replaceable_by(&self, existing: Block, replacement: Block) -> bool {
        let current = self.replaceable(existing);
        (self.is_liquid(existing) || current >= REPLACEABLE_THRESHOLD)
            && self.replaceable(replacement) < current
    }

    #[inline]
    pub fn container_slots(&self, b: Block) -> u16 {
        self.get(b.id).map(|t| t.container_slots).unwrap_or(0)
    }
}

fn compile_def(id: BlockId, def: BlockDef) -> BlockType {
    let liquid = def.liquid.unwrap_or(false);
    let default_replaceable = if def.name == "air" { AIR_REPLACEABLE } else { 0 };
    if def.container_slots == Some(0) {
        log::warn!("block `{}` declares a container with no slots", def.name);
    }
    BlockType {
        id,
        solid: def.solid.unwrap_or(!liquid),
        liquid,
        replaceable: def.replaceable.unwrap_or(default_replaceable),
        container_slots: def.container_slots.unwrap_or(0),
        name: def.name,
    }
}
