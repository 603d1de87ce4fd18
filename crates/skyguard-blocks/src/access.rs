use skyguard_geom::BlockPos;

use crate::items::ItemStack;
use crate::types::Block;

/// Voxel access granted to a generator for the duration of one chunk callback.
///
/// Reads outside the world's vertical range return air and writes there are
/// dropped, so generators never need to bounds-check heights themselves.
pub trait BlockAccess {
    fn world_height(&self) -> i32;

    fn block(&self, pos: BlockPos) -> Block;

    fn set_block(&mut self, pos: BlockPos, block: Block);

    fn is_replaceable_by(&self, existing: Block, replacement: Block) -> bool;

    fn is_liquid(&self, block: Block) -> bool;

    /// Places `block` and returns its container entity, if the block carries
    /// one and the placement succeeded.
    fn place_container(&mut self, pos: BlockPos, block: Block) -> Option<&mut dyn Container>;
}

/// Slot inventory attached to a placed block.
pub trait Container {
    /// Binds the entity to the world. Must be called before slots are written.
    fn initialize(&mut self);

    fn slot_count(&self) -> usize;

    fn set_slot(&mut self, slot: usize, stack: ItemStack);

    fn mark_slot_dirty(&mut self, slot: usize);
}
