use skyguard_blocks::{Container, ItemCatalog, ItemStack};
use skyguard_world::SeededStream;
use skyguard_world::worldgen::LootTableConfig;

/// Weighted item pool; an item with weight `n` appears `n` times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LootTable {
    pool: Vec<String>,
    min_items: i32,
    max_items: i32,
}

impl LootTable {
    /// Mismatched array lengths give an empty table.
    pub fn new(items: &[String], weights: &[u32]) -> Self {
        if items.len() != weights.len() {
            log::warn!(
                "loot table has {} items but {} weights; leaving it empty",
                items.len(),
                weights.len()
            );
            return Self::default();
        }
        let pool = items
            .iter()
            .zip(weights)
            .flat_map(|(item, &w)| std::iter::repeat_n(item.clone(), w as usize))
            .collect();
        Self {
            pool,
            min_items: 0,
            max_items: 0,
        }
    }

    pub fn from_config(cfg: &LootTableConfig) -> Self {
        Self {
            min_items: cfg.min_items,
            max_items: cfg.max_items,
            ..Self::new(&cfg.items, &cfg.weights)
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn sample(&self, rng: &mut SeededStream) -> Option<&str> {
        if self.pool.is_empty() {
            return None;
        }
        let idx = rng.next_int(self.pool.len() as i32) as usize;
        Some(self.pool[idx].as_str())
    }

    /// Fills with the table's configured item count range.
    pub fn fill_default(&self, container: &mut dyn Container, items: &dyn ItemCatalog, rng: &mut SeededStream) {
        self.fill(container, self.min_items, self.max_items, items, rng);
    }

    /// Draws `min + next_int(max - min)` items and commits one stack per
    /// distinct item, in first-drawn order.
    pub fn fill(
        &self,
        container: &mut dyn Container,
        min: i32,
        max: i32,
        items: &dyn ItemCatalog,
        rng: &mut SeededStream,
    ) {
        container.initialize();
        if self.pool.is_empty() {
            return;
        }
        let count = rng.range(min, max);
        let mut stacks: Vec<(&str, ItemStack)> = Vec::new();
        for _ in 0..count {
            let Some(code) = self.sample(rng) else { break };
            if let Some((_, stack)) = stacks.iter_mut().find(|(c, _)| *c == code) {
                if stack.size < items.max_stack(stack.item) {
                    stack.size += 1;
                }
                continue;
            }
            match items.resolve_item(code) {
                Some(item) => stacks.push((code, ItemStack::new(item, 1))),
                None => log::debug!("loot item `{}` is unknown; skipped", code),
            }
        }
        commit_stacks(container, stacks.into_iter().map(|(_, s)| s));
    }
}

/// Writes stacks into consecutive slots from 0, piling overflow into the last slot.
pub(crate) fn commit_stacks(container: &mut dyn Container, stacks: impl IntoIterator<Item = ItemStack>) {
    let slots = container.slot_count();
    if slots == 0 {
        log::debug!("container has no slots; loot dropped");
        return;
    }
    let mut cursor = 0usize;
    for stack in stacks {
        let slot = cursor.min(slots - 1);
        container.set_slot(slot, stack);
        container.mark_slot_dirty(slot);
        cursor = slot + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_blocks::ItemId;

    #[derive(Default)]
    struct Slots {
        init: bool,
        slots: Vec<Option<ItemStack>>,
        dirty: Vec<usize>,
    }

    impl Container for Slots {
        fn initialize(&mut self) {
            self.init = true;
        }
        fn slot_count(&self) -> usize {
            self.slots.len()
        }
        fn set_slot(&mut self, slot: usize, stack: ItemStack) {
            self.slots[slot] = Some(stack);
        }
        fn mark_slot_dirty(&mut self, slot: usize) {
            self.dirty.push(slot);
        }
    }

    struct Catalog;

    impl ItemCatalog for Catalog {
        fn resolve_item(&self, code: &str) -> Option<ItemId> {
            match code {
                "rope" => Some(ItemId(1)),
                "gear" => Some(ItemId(2)),
                _ => None,
            }
        }

        fn max_stack(&self, _item: ItemId) -> u32 {
            3
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn weights_expand_into_pool() {
        let t = LootTable::new(&strings(&["a", "b", "c"]), &[2, 0, 3]);
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn mismatch_is_empty() {
        let t = LootTable::new(&strings(&["a", "b"]), &[1]);
        assert!(t.is_empty());
        let mut rng = SeededStream::new(1);
        assert_eq!(t.sample(&mut rng), None);

        let mut c = Slots {
            slots: vec![None; 2],
            ..Default::default()
        };
        let mut twin = SeededStream::new(1);
        t.fill(&mut c, 1, 5, &Catalog, &mut rng);
        assert!(c.init);
        assert!(c.slots.iter().all(Option::is_none));
        // No draws were consumed.
        assert_eq!(rng.next_int(1000), twin.next_int(1000));
    }

    #[test]
    fn overflow_lands_in_last_slot() {
        let mut c = Slots {
            slots: vec![None; 2],
            ..Default::default()
        };
        let stacks = (0..4).map(|i| ItemStack::new(ItemId(i), 1));
        commit_stacks(&mut c, stacks);
        assert_eq!(c.slots[0], Some(ItemStack::new(ItemId(0), 1)));
        assert_eq!(c.slots[1], Some(ItemStack::new(ItemId(3), 1)));
        assert_eq!(c.dirty, vec![0, 1, 1, 1]);
    }

    #[test]
    fn fill_skips_unknown_and_caps_stacks() {
        let t = LootTable::new(&strings(&["rope", "mystery"]), &[1, 1]);
        let mut c = Slots {
            slots: vec![None; 4],
            ..Default::default()
        };
        let mut rng = SeededStream::new(42);
        t.fill(&mut c, 24, 24, &Catalog, &mut rng);
        let filled: Vec<_> = c.slots.iter().flatten().collect();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].item, ItemId(1));
        assert!(filled[0].size <= 3);
    }
}
