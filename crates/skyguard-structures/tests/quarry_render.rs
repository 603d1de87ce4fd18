mod common;

use proptest::prelude::*;
use skyguard_blocks::{Block, BlockAccess};
use skyguard_geom::{BlockPos, Cardinal};
use skyguard_structures::{ErosionField, QuarryPalette, QuarryRenderer, carve_top};
use skyguard_world::worldgen::QuarryConfig;
use skyguard_world::{PathStub, QuarryPlan, RegionKey, WorldInfo};

use common::{block, flat_world, registry};

const HEIGHT: i32 = 128;
const GROUND: i32 = 80;

/// No noise, no scrap: the pit is exactly the stepped plan.
fn quiet() -> QuarryConfig {
    QuarryConfig {
        chance_of_metal_parts_in_chunk: 0.0,
        chance_of_gears_in_chunk: 0.0,
        path_fade_length: 0.0,
        local_noise_amp: vec![],
        local_noise_freq: vec![],
        erosion_map_noise_amp: vec![],
        erosion_map_noise_freq: vec![],
        erosion_negative_mod: 0.0,
        ..QuarryConfig::default()
    }
}

fn plan(step_depth: i32, flooded: bool, stubs: Vec<PathStub>) -> QuarryPlan {
    QuarryPlan {
        key: RegionKey::new(0, 0),
        region_seed: 17,
        has_quarry: true,
        base_x: 40,
        base_z: 40,
        width_x: 20,
        width_z: 20,
        depth: 10,
        step_depth,
        flooded,
        flooding_depth: 4,
        min_x: 0,
        min_z: 0,
        max_x: 100,
        max_z: 100,
        stubs,
    }
}

fn render(cfg: &QuarryConfig, plan: &QuarryPlan, world: &mut skyguard_edit::SparseWorld, chunks: &[(i32, i32)]) {
    let palette = QuarryPalette::resolve(world.registry());
    let renderer = QuarryRenderer { cfg, palette: &palette };
    let info = WorldInfo::new(7, HEIGHT);
    for &(cx, cz) in chunks {
        renderer.render_chunk(plan, &info, cx, cz, world);
    }
}

#[test]
fn center_column_is_cut_to_full_depth() {
    let reg = registry();
    let mut world = flat_world(&reg, HEIGHT, GROUND);
    let p = plan(2, false, vec![]);
    render(&quiet(), &p, &mut world, &[(1, 1)]);

    // Sea level 55, depth 10: rock up to 44, air from 45.
    let rock = block(&reg, "rock-granite");
    assert_eq!(world.block(BlockPos::new(50, 44, 50)), rock);
    assert_eq!(world.block(BlockPos::new(50, 45, 50)), Block::AIR);
    assert_eq!(world.block(BlockPos::new(50, GROUND, 50)), Block::AIR);
    // One block outside the rectangle the floor steps up by `step_depth`.
    assert_eq!(world.block(BlockPos::new(61, 46, 50)), rock);
    assert_eq!(world.block(BlockPos::new(61, 47, 50)), Block::AIR);
}

#[test]
fn flooded_center_fills_with_water() {
    let reg = registry();
    let mut world = flat_world(&reg, HEIGHT, GROUND);
    let p = plan(2, true, vec![]);
    render(&quiet(), &p, &mut world, &[(1, 1)]);

    let water = block(&reg, "water-still-7");
    for y in 45..=49 {
        assert_eq!(world.block(BlockPos::new(50, y, 50)), water, "y={y}");
    }
    assert_eq!(world.block(BlockPos::new(50, 50, 50)), Block::AIR);
    // Slope columns stay dry.
    assert_eq!(world.block(BlockPos::new(61, 47, 50)), Block::AIR);
}

#[test]
fn missing_or_distant_quarry_writes_nothing() {
    let reg = registry();
    let mut world = flat_world(&reg, HEIGHT, GROUND);
    let mut p = plan(2, false, vec![]);
    render(&quiet(), &p, &mut world, &[(5, 5), (-1, 0)]);
    assert_eq!(world.writes(), 0);

    p.has_quarry = false;
    render(&quiet(), &p, &mut world, &[(1, 1), (0, 0)]);
    assert_eq!(world.writes(), 0);
}

#[test]
fn path_survives_beyond_the_slope() {
    let reg = registry();
    let mut world = flat_world(&reg, HEIGHT, GROUND);
    let stub = PathStub {
        x: 61,
        z: 45,
        dir: Cardinal::East,
        length: 10,
        width: 2,
    };
    // A steep step puts the first slope column's cut above the ground.
    let p = plan(40, false, vec![stub]);
    render(&quiet(), &p, &mut world, &[(1, 1), (2, 1)]);

    let tile = block(&reg, "woodenpath-we");
    for x in 61..=71 {
        for z in 45..=47 {
            assert_eq!(world.block(BlockPos::new(x, GROUND + 1, z)), tile, "x={x} z={z}");
        }
    }
    assert_eq!(world.block(BlockPos::new(72, GROUND + 1, 46)), Block::AIR);
}

#[test]
fn paths_never_land_on_water() {
    let reg = registry();
    let water = block(&reg, "water-still-7");
    let rock = block(&reg, "rock-granite");
    let lake = move |pos: BlockPos| {
        if pos.y < GROUND {
            rock
        } else if pos.y == GROUND {
            water
        } else {
            Block::AIR
        }
    };
    let mut world = skyguard_edit::SparseWorld::new(reg.clone(), HEIGHT, lake);
    let stub = PathStub {
        x: 61,
        z: 45,
        dir: Cardinal::East,
        length: 10,
        width: 2,
    };
    let p = plan(40, false, vec![stub]);
    render(&quiet(), &p, &mut world, &[(2, 1)]);
    assert_eq!(world.block(BlockPos::new(66, GROUND + 1, 46)), Block::AIR);
}

proptest! {
    #[test]
    fn far_columns_are_skipped(overflow in 60i32..2000, along_z in any::<bool>()) {
        let p = plan(2, false, vec![]);
        let field = ErosionField::new(&quiet(), p.region_seed);
        let sea = WorldInfo::new(7, HEIGHT).estimated_sea_level();
        let (x, z) = if along_z { (50, 60 + overflow) } else { (60 + overflow, 50) };
        // depth - 2 * overflow sinks the cut top above the world.
        prop_assert_eq!(carve_top(&p, &field, sea, HEIGHT, x, z), None);
    }

    #[test]
    fn zero_overflow_cuts_depth_plus_erosion(x in 40i32..=60, z in 40i32..=60) {
        let cfg = QuarryConfig::default();
        let p = plan(3, false, vec![]);
        let field = ErosionField::new(&cfg, p.region_seed);
        let sea = WorldInfo::new(7, HEIGHT).estimated_sea_level();
        let expected = sea - (p.depth + field.sample(x, z).floor() as i32);
        prop_assert_eq!(carve_top(&p, &field, sea, HEIGHT, x, z), Some(expected));
    }
}
