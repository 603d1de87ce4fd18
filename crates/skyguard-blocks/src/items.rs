use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

/// A quantity of one item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item: ItemId,
    pub size: u32,
}

impl ItemStack {
    #[inline]
    pub const fn new(item: ItemId, size: u32) -> Self {
        Self { item, size }
    }
}

/// Resolves item codes to placeable items.
pub trait ItemCatalog {
    fn resolve_item(&self, code: &str) -> Option<ItemId>;

    fn max_stack(&self, _item: ItemId) -> u32 {
        u32::MAX
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ItemsConfig {
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemDef {
    pub code: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

fn default_max_stack() -> u32 {
    64
}

#[derive(Clone, Debug)]
pub struct ItemType {
    pub id: ItemId,
    pub code: String,
    pub max_stack: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    pub items: Vec<ItemType>,
    pub by_code: HashMap<String, ItemId>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: ItemsConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = ItemRegistry::new();
        for def in cfg.items {
            if reg.by_code.contains_key(&def.code) {
                return Err(format!("item `{}` declared twice", def.code).into());
            }
            let id = ItemId(reg.items.len() as u32);
            reg.by_code.insert(def.code.clone(), id);
            reg.items.push(ItemType {
                id,
                code: def.code,
                max_stack: def.max_stack.max(1),
            });
        }
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ItemsConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&ItemType> {
        self.items.get(id.0 as usize)
    }
}

impl ItemCatalog for ItemRegistry {
    fn resolve_item(&self, code: &str) -> Option<ItemId> {
        self.by_code.get(code).copied()
    }

    fn max_stack(&self, item: ItemId) -> u32 {
        self.get(item).map(|t| t.max_stack).unwrap_or(1)
    }
}
