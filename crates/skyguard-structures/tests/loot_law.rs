mod common;

use proptest::prelude::*;
use skyguard_blocks::{BlockAccess, ItemCatalog};
use skyguard_edit::ChestContainer;
use skyguard_geom::BlockPos;
use skyguard_structures::LootTable;
use skyguard_world::SeededStream;

use common::{block, flat_world, items, registry};

fn table(items: &[&str], weights: &[u32]) -> LootTable {
    let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    LootTable::new(&items, weights)
}

#[test]
fn weights_three_to_one() {
    let t = table(&["a", "b"], &[3, 1]);
    let mut rng = SeededStream::new(2024);
    let n = 40_000;
    let a = (0..n).filter(|_| t.sample(&mut rng) == Some("a")).count();
    let ratio = a as f64 / (n - a) as f64;
    // sd of the share of `a` is ~0.0022 at this n; allow five of them.
    assert!((2.8..3.2).contains(&ratio), "ratio {ratio}");
}

#[test]
fn chest_without_slots_only_gets_the_block() {
    let reg = registry();
    let mut world = flat_world(&reg, 64, 10);
    let pos = BlockPos::new(3, 11, 3);
    let crate_block = block(&reg, "woodencrate-opened");
    assert!(world.place_container(pos, crate_block).is_none());
    assert_eq!(world.block(pos), crate_block);
    assert!(world.container(pos).is_none());
}

proptest! {
    #[test]
    fn stacks_respect_max_and_slots(seed in any::<i64>(), slots in 1usize..4, count in 0i32..40) {
        let items = items();
        let t = table(&["rope", "gear-rusty", "unknown-thing"], &[1, 2, 1]);
        let mut chest = ChestContainer::new(slots);
        let mut rng = SeededStream::new(seed);
        t.fill(&mut chest, count, count, &items, &mut rng);

        prop_assert!(chest.is_initialized());
        prop_assert!(chest.filled_slots() <= slots.min(2));
        let gear = items.resolve_item("gear-rusty").unwrap();
        for (i, stack) in chest.slots().iter().enumerate() {
            if let Some(s) = stack {
                prop_assert!(s.size >= 1);
                prop_assert!(s.size <= items.max_stack(s.item));
                if s.item == gear {
                    prop_assert!(s.size <= 4);
                }
                prop_assert!(chest.is_dirty(i));
            }
        }
    }
}
