use serde::Deserialize;

// Top-level blocks catalog file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    // Block used when a requested name is unavailable. Falls back to `air`.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub liquid: Option<bool>,
    // Replacement resistance: blocks at or above REPLACEABLE_THRESHOLD give way
    // to anything with a lower value.
    #[serde(default)]
    pub replaceable: Option<u32>,
    // Number of item slots when the block carries a container entity.
    #[serde(default)]
    pub container_slots: Option<u16>,
}

impl BlockDef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            solid: None,
            liquid: None,
            replaceable: None,
            container_slots: None,
        }
    }
}
