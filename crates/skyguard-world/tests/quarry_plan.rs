use proptest::prelude::*;
use skyguard_world::region::WorldInfo;
use skyguard_world::worldgen::QuarryRegionConfig;
use skyguard_world::{CHUNK_SIZE, QuarryPlan, RegionKey};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stubs_stay_inside_their_region(seed in any::<i64>(), rx in -20i32..20, rz in -20i32..20) {
        let cfg = QuarryRegionConfig::default();
        let cells = cfg.region_size / CHUNK_SIZE;
        let key = RegionKey::new(rx * cells, rz * cells);
        let plan = QuarryPlan::for_region(&cfg, &WorldInfo::new(seed, 256), key);
        let (ox, oz) = key.block_origin();
        let (ex, ez) = (ox + cfg.region_size - 1, oz + cfg.region_size - 1);
        for s in &plan.stubs {
            prop_assert!(s.min_x() >= ox && s.max_x() <= ex, "{s:?} outside x {ox}..={ex}");
            prop_assert!(s.min_z() >= oz && s.max_z() <= ez, "{s:?} outside z {oz}..={ez}");
            prop_assert!(plan.min_x <= s.min_x() && plan.max_x >= s.max_x());
            prop_assert!(plan.min_z <= s.min_z() && plan.max_z >= s.max_z());
        }
        prop_assert!(plan.base_x - ox >= cfg.max_path_stub_length);
        prop_assert!(plan.base_z - oz >= cfg.max_path_stub_length);
    }

    #[test]
    fn plan_is_a_pure_function_of_region(seed in any::<i64>(), cx in -300i32..300, cz in -300i32..300) {
        let cfg = QuarryRegionConfig::default();
        let world = WorldInfo::new(seed, 256);
        let a = QuarryPlan::resolve(&cfg, &world, cx, cz);
        let b = QuarryPlan::for_region(&cfg, &world, a.key);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn ranges_follow_config(seed in any::<i64>()) {
        let cfg = QuarryRegionConfig::default();
        let plan = QuarryPlan::for_region(&cfg, &WorldInfo::new(seed, 256), RegionKey::new(0, 0));
        prop_assert!((cfg.min_depth..cfg.max_depth).contains(&plan.depth));
        prop_assert!((cfg.min_step_depth..cfg.max_step_depth).contains(&plan.step_depth));
        prop_assert!(plan.stubs.len() < cfg.max_path_stubs as usize);
        if !plan.flooded {
            prop_assert_eq!(plan.flooding_depth, 0);
        }
    }
}

#[test]
fn chunk_touch_test_uses_bounding_box() {
    let cfg = QuarryRegionConfig::default();
    let plan = QuarryPlan::for_region(&cfg, &WorldInfo::new(8, 256), RegionKey::new(0, 0));
    let inside = (plan.base_x / CHUNK_SIZE, plan.base_z / CHUNK_SIZE);
    assert!(plan.touches_chunk(inside.0, inside.1));
    assert!(!plan.touches_chunk(-5, -5));
    assert!(!plan.touches_chunk(plan.max_x / CHUNK_SIZE + 1, inside.1));
}
