//! In-memory sparse voxel world: base terrain plus chunk-keyed edits and
//! container entities.
#![forbid(unsafe_code)]

use skyguard_blocks::{Block, BlockAccess, BlockRegistry, Container, ItemStack};
use skyguard_geom::BlockPos;
use skyguard_world::CHUNK_SIZE;
use std::collections::HashMap;
use std::sync::Arc;

/// Block a world holds before any edit.
pub trait BaseTerrain: Send + Sync {
    fn base_block(&self, pos: BlockPos) -> Block;
}

impl<F> BaseTerrain for F
where
    F: Fn(BlockPos) -> Block + Send + Sync,
{
    fn base_block(&self, pos: BlockPos) -> Block {
        self(pos)
    }
}

/// Solid `fill` up to and including `top`, air above.
#[derive(Clone, Copy, Debug)]
pub struct FlatTerrain {
    pub top: i32,
    pub fill: Block,
}

impl BaseTerrain for FlatTerrain {
    fn base_block(&self, pos: BlockPos) -> Block {
        if pos.y <= self.top { self.fill } else { Block::AIR }
    }
}

/// Slot inventory stored by [`SparseWorld`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChestContainer {
    initialized: bool,
    slots: Vec<Option<ItemStack>>,
    dirty: Vec<bool>,
}

impl ChestContainer {
    pub fn new(slot_count: usize) -> Self {
        Self {
            initialized: false,
            slots: vec![None; slot_count],
            dirty: vec![false; slot_count],
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn is_dirty(&self, slot: usize) -> bool {
        self.dirty.get(slot).copied().unwrap_or(false)
    }

    pub fn filled_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl Container for ChestContainer {
    fn initialize(&mut self) {
        self.initialized = true;
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn set_slot(&mut self, slot: usize, stack: ItemStack) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = Some(stack);
        }
    }

    fn mark_slot_dirty(&mut self, slot: usize) {
        if let Some(d) = self.dirty.get_mut(slot) {
            *d = true;
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseWorldStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
    pub containers: usize,
    pub writes: u64,
}

/// Voxel world holding only what generation changed on top of a base terrain.
pub struct SparseWorld {
    registry: Arc<BlockRegistry>,
    height: i32,
    base: Box<dyn BaseTerrain>,
    // Per chunk column (cx, cz): world position -> block
    edits: HashMap<(i32, i32), HashMap<BlockPos, Block>>,
    containers: HashMap<BlockPos, ChestContainer>,
    writes: u64,
}

impl SparseWorld {
    pub fn new(registry: Arc<BlockRegistry>, height: i32, base: impl BaseTerrain + 'static) -> Self {
        Self {
            registry,
            height,
            base: Box::new(base),
            edits: HashMap::new(),
            containers: HashMap::new(),
            writes: 0,
        }
    }

    /// All-air world.
    pub fn empty(registry: Arc<BlockRegistry>, height: i32) -> Self {
        Self::new(registry, height, |_: BlockPos| Block::AIR)
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[inline]
    fn chunk_key(pos: BlockPos) -> (i32, i32) {
        (pos.x.div_euclid(CHUNK_SIZE), pos.z.div_euclid(CHUNK_SIZE))
    }

    #[inline]
    fn in_range(&self, pos: BlockPos) -> bool {
        pos.y >= 0 && pos.y < self.height
    }

    /// Number of `set_block` calls that landed inside the world.
    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn reset_write_count(&mut self) {
        self.writes = 0;
    }

    pub fn stats(&self) -> SparseWorldStats {
        SparseWorldStats {
            chunk_entries: self.edits.len(),
            block_edits: self.edits.values().map(|m| m.len()).sum(),
            containers: self.containers.len(),
            writes: self.writes,
        }
    }

    pub fn container(&self, pos: BlockPos) -> Option<&ChestContainer> {
        self.containers.get(&pos)
    }

    pub fn containers(&self) -> impl Iterator<Item = (&BlockPos, &ChestContainer)> {
        self.containers.iter()
    }

    /// Edited voxels of one chunk column, sorted by position.
    pub fn snapshot_for_chunk(&self, cx: i32, cz: i32) -> Vec<(BlockPos, Block)> {
        let mut out: Vec<(BlockPos, Block)> = self
            .edits
            .get(&(cx, cz))
            .map(|m| m.iter().map(|(p, b)| (*p, *b)).collect())
            .unwrap_or_default();
        out.sort_unstable_by_key(|(p, _)| *p);
        out
    }

    /// Edits that actually differ from the base terrain, sorted by position.
    pub fn effective_edits(&self) -> Vec<(BlockPos, Block)> {
        let mut out: Vec<(BlockPos, Block)> = self
            .edits
            .values()
            .flat_map(|m| m.iter())
            .filter(|(p, b)| self.base.base_block(**p) != **b)
            .map(|(p, b)| (*p, *b))
            .collect();
        out.sort_unstable_by_key(|(p, _)| *p);
        out
    }

    /// Positions whose block or container contents differ between two worlds.
    pub fn diff(&self, other: &SparseWorld) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self
            .edits
            .values()
            .chain(other.edits.values())
            .flat_map(|m| m.keys().copied())
            .chain(self.containers.keys().copied())
            .chain(other.containers.keys().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions.retain(|p| {
            self.block(*p) != other.block(*p) || self.containers.get(p) != other.containers.get(p)
        });
        positions
    }
}

impl BlockAccess for SparseWorld {
    fn world_height(&self) -> i32 {
        self.height
    }

    fn block(&self, pos: BlockPos) -> Block {
        if !self.in_range(pos) {
            return Block::AIR;
        }
        self.edits
            .get(&Self::chunk_key(pos))
            .and_then(|m| m.get(&pos).copied())
            .unwrap_or_else(|| self.base.base_block(pos))
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) {
        if !self.in_range(pos) {
            return;
        }
        self.writes += 1;
        if self.registry.container_slots(block) == 0 {
            self.containers.remove(&pos);
        }
        self.edits
            .entry(Self::chunk_key(pos))
            .or_default()
            .insert(pos, block);
    }

    fn is_replaceable_by(&self, existing: Block, replacement: Block) -> bool {
        self.registry.is_replaceable_by(existing, replacement)
    }

    fn is_liquid(&self, block: Block) -> bool {
        self.registry.is_liquid(block)
    }

    fn place_container(&mut self, pos: BlockPos, block: Block) -> Option<&mut dyn Container> {
        if !self.in_range(pos) {
            return None;
        }
        self.set_block(pos, block);
        let slots = self.registry.container_slots(block) as usize;
        if slots == 0 {
            log::debug!("block {:?} at {:?} carries no container", block, pos);
            return None;
        }
        self.containers.insert(pos, ChestContainer::new(slots));
        self.containers
            .get_mut(&pos)
            .map(|c| c as &mut dyn Container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_blocks::ItemId;

    fn registry() -> Arc<BlockRegistry> {
        Arc::new(
            BlockRegistry::from_toml_str(
                r#"
                [[blocks]]
                name = "stone"
                [[blocks]]
                name = "chest"
                container_slots = 4
                "#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn reads_fall_back_to_base() {
        let reg = registry();
        let stone = reg.make_block_by_name("stone").unwrap();
        let mut w = SparseWorld::new(reg, 64, FlatTerrain { top: 10, fill: stone });
        assert_eq!(w.block(BlockPos::new(3, 10, -40)), stone);
        assert_eq!(w.block(BlockPos::new(3, 11, -40)), Block::AIR);
        w.set_block(BlockPos::new(3, 10, -40), Block::AIR);
        assert_eq!(w.block(BlockPos::new(3, 10, -40)), Block::AIR);
        assert_eq!(w.snapshot_for_chunk(0, -2).len(), 1);
        assert_eq!(w.writes(), 1);
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut w = SparseWorld::empty(registry(), 16);
        w.set_block(BlockPos::new(0, 16, 0), Block::from_id(1));
        w.set_block(BlockPos::new(0, -1, 0), Block::from_id(1));
        assert_eq!(w.writes(), 0);
        assert_eq!(w.block(BlockPos::new(0, -1, 0)), Block::AIR);
    }

    #[test]
    fn container_lifecycle() {
        let reg = registry();
        let chest = reg.make_block_by_name("chest").unwrap();
        let stone = reg.make_block_by_name("stone").unwrap();
        let mut w = SparseWorld::empty(reg, 32);
        let pos = BlockPos::new(1, 2, 3);
        {
            let c = w.place_container(pos, chest).unwrap();
            c.initialize();
            c.set_slot(1, ItemStack::new(ItemId(0), 5));
            c.mark_slot_dirty(1);
            c.set_slot(9, ItemStack::new(ItemId(0), 5));
        }
        let c = w.container(pos).unwrap();
        assert!(c.is_initialized() && c.is_dirty(1));
        assert_eq!(c.filled_slots(), 1);
        assert!(w.place_container(BlockPos::new(0, 0, 0), stone).is_none());
        w.set_block(pos, stone);
        assert!(w.container(pos).is_none());
    }

    #[test]
    fn diff_ignores_write_order() {
        let reg = registry();
        let mut a = SparseWorld::empty(Arc::clone(&reg), 32);
        let mut b = SparseWorld::empty(reg, 32);
        let (p, q) = (BlockPos::new(0, 1, 0), BlockPos::new(40, 1, 0));
        a.set_block(p, Block::from_id(1));
        a.set_block(q, Block::from_id(1));
        b.set_block(q, Block::from_id(1));
        b.set_block(p, Block::from_id(1));
        assert!(a.diff(&b).is_empty());
        b.set_block(q, Block::AIR);
        assert_eq!(a.diff(&b), vec![q]);
        assert_eq!(b.effective_edits().len(), 1);
    }
}
