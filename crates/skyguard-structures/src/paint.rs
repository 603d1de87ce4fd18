//! Voxel writing helpers shared by the renderers.
//!
//! Every helper writes through [`BlockAccess`] and, unless `force` is set,
//! only replaces blocks the catalog allows `block` to replace.

use skyguard_blocks::{Block, BlockAccess};
use skyguard_geom::{BlockBox, BlockPos};

#[inline]
fn put(access: &mut dyn BlockAccess, pos: BlockPos, block: Block, force: bool) {
    if force || access.is_replaceable_by(access.block(pos), block) {
        access.set_block(pos, block);
    }
}

/// Writes `block` at a single position.
#[inline]
pub fn place_block(access: &mut dyn BlockAccess, pos: BlockPos, block: Block, force: bool) {
    put(access, pos, block, force);
}

/// Fills `y_start..=y_end` of column `(x, z)`, clamped to the world. A forced
/// column writes every cell; otherwise cells already holding `block` are left
/// untouched.
pub fn place_column(
    access: &mut dyn BlockAccess,
    x: i32,
    z: i32,
    y_start: i32,
    y_end: i32,
    block: Block,
    force: bool,
) {
    let top = y_end.min(access.world_height() - 1);
    for y in y_start.max(0)..=top {
        let pos = BlockPos::new(x, y, z);
        if force {
            access.set_block(pos, block);
            continue;
        }
        let existing = access.block(pos);
        if existing != block && access.is_replaceable_by(existing, block) {
            access.set_block(pos, block);
        }
    }
}

/// Writes downward from `y_start` while the cell gives way to `block`.
/// Returns the height of the first cell above the blocking one.
pub fn place_column_to_ground(access: &mut dyn BlockAccess, x: i32, y_start: i32, z: i32, block: Block) -> i32 {
    let mut y = y_start.min(access.world_height() - 1);
    while y > 0 {
        let pos = BlockPos::new(x, y, z);
        if !access.is_replaceable_by(access.block(pos), block) {
            break;
        }
        access.set_block(pos, block);
        y -= 1;
    }
    y + 1
}

/// Height of the first air cell above the topmost non-air cell at or below `y_start`.
pub fn find_ground_height(access: &dyn BlockAccess, x: i32, y_start: i32, z: i32) -> i32 {
    let mut y = y_start.min(access.world_height() - 1);
    while y > 0 && access.block(BlockPos::new(x, y, z)).is_air() {
        y -= 1;
    }
    y + 1
}

pub fn place_box(access: &mut dyn BlockAccess, bounds: BlockBox, block: Block, force: bool) {
    for x in bounds.min.x..=bounds.max.x {
        for y in bounds.min.y..=bounds.max.y {
            for z in bounds.min.z..=bounds.max.z {
                put(access, BlockPos::new(x, y, z), block, force);
            }
        }
    }
}

/// Fills every cell with `dx²/rx² + dy²/ry² + dz²/rz² <= 1`. A zero radius
/// collapses that axis onto the center plane.
pub fn place_ellipsoid(
    access: &mut dyn BlockAccess,
    center: BlockPos,
    radii: (i32, i32, i32),
    block: Block,
    force: bool,
) {
    let (rx, ry, rz) = (radii.0.abs(), radii.1.abs(), radii.2.abs());
    let term = |d: i32, r: i32| -> f32 {
        if r == 0 {
            if d == 0 { 0.0 } else { f32::INFINITY }
        } else {
            (d * d) as f32 / (r * r) as f32
        }
    };
    for x in center.x - rx..=center.x + rx {
        for y in center.y - ry..=center.y + ry {
            for z in center.z - rz..=center.z + rz {
                let d = term(x - center.x, rx) + term(y - center.y, ry) + term(z - center.z, rz);
                if d <= 1.0 {
                    put(access, BlockPos::new(x, y, z), block, force);
                }
            }
        }
    }
}

/// Rasterises `from..=to`, stepping one cell per unit along the axis with the
/// largest delta and rounding the other two.
pub fn place_line(access: &mut dyn BlockAccess, from: BlockPos, to: BlockPos, block: Block, force: bool) {
    for pos in line_cells(from, to) {
        put(access, pos, block, force);
    }
}

pub(crate) fn line_cells(from: BlockPos, to: BlockPos) -> Vec<BlockPos> {
    let start = [from.x, from.y, from.z];
    let delta = [to.x - from.x, to.y - from.y, to.z - from.z];
    let mut major = 0;
    for axis in 1..3 {
        if delta[axis].abs() > delta[major].abs() {
            major = axis;
        }
    }
    let steps = delta[major];
    if steps == 0 {
        return Vec::new();
    }
    let sign = steps.signum();
    let mut out = Vec::with_capacity(steps.unsigned_abs() as usize + 1);
    let mut t = 0;
    loop {
        let mut c = [0i32; 3];
        for axis in 0..3 {
            c[axis] = if axis == major {
                start[axis] + t
            } else {
                let g = delta[axis] as f32 / steps as f32;
                (start[axis] as f32 + t as f32 * g + 0.5).floor() as i32
            };
        }
        out.push(BlockPos::new(c[0], c[1], c[2]));
        if t == steps {
            break;
        }
        t += sign;
    }
    out
}

/// Re-writes each cell of `y_start..=y_end` with its current block so the host
/// re-evaluates it (liquid flow, lighting).
pub fn refresh_column(access: &mut dyn BlockAccess, x: i32, z: i32, y_start: i32, y_end: i32) {
    let top = y_end.min(access.world_height() - 1);
    for y in y_start.max(0)..=top {
        let pos = BlockPos::new(x, y, z);
        let current = access.block(pos);
        access.set_block(pos, current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyguard_blocks::BlockRegistry;
    use skyguard_edit::{FlatTerrain, SparseWorld};
    use std::sync::Arc;

    fn world() -> (SparseWorld, Block, Block) {
        let reg = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "stone"
            [[blocks]]
            name = "cobble"
            [[blocks]]
            name = "grass"
            replaceable = 7000
            "#,
        )
        .unwrap();
        let stone = reg.make_block_by_name("stone").unwrap();
        let cobble = reg.make_block_by_name("cobble").unwrap();
        (
            SparseWorld::new(Arc::new(reg), 64, FlatTerrain { top: 9, fill: stone }),
            stone,
            cobble,
        )
    }

    #[test]
    fn column_to_ground_stops_on_solid() {
        let (mut w, _, cobble) = world();
        let ground = place_column_to_ground(&mut w, 0, 20, 0, cobble);
        assert_eq!(ground, 10);
        assert_eq!(w.writes(), 11);
        assert_eq!(w.block(BlockPos::new(0, 10, 0)), cobble);
        assert_eq!(find_ground_height(&w, 0, 40, 0), 21);
    }

    #[test]
    fn unforced_column_respects_replaceability() {
        let (mut w, stone, cobble) = world();
        place_column(&mut w, 3, 3, 5, 12, cobble, false);
        assert_eq!(w.block(BlockPos::new(3, 9, 3)), stone);
        assert_eq!(w.block(BlockPos::new(3, 10, 3)), cobble);
        assert_eq!(w.writes(), 3);
        place_column(&mut w, 3, 3, 5, 12, cobble, true);
        assert_eq!(w.block(BlockPos::new(3, 5, 3)), cobble);
        assert_eq!(w.writes(), 11);
    }

    #[test]
    fn forced_column_rewrites_matching_cells() {
        let (mut w, _, cobble) = world();
        place_column(&mut w, 1, 1, 20, 24, cobble, true);
        assert_eq!(w.writes(), 5);
        place_column(&mut w, 1, 1, 20, 24, cobble, true);
        assert_eq!(w.writes(), 10);

        // Grass gives way to cobble, but an unforced pass skips cells that already match.
        let grass = w.registry().make_block_by_name("grass").unwrap();
        place_column(&mut w, 1, 1, 25, 26, grass, true);
        place_column(&mut w, 1, 1, 20, 26, cobble, false);
        assert_eq!(w.writes(), 14);
        assert_eq!(w.block(BlockPos::new(1, 26, 1)), cobble);
    }

    #[test]
    fn ellipsoid_with_flat_axis_is_a_disc() {
        let (mut w, _, cobble) = world();
        place_ellipsoid(&mut w, BlockPos::new(0, 30, 0), (2, 0, 2), cobble, false);
        assert_eq!(w.block(BlockPos::new(2, 30, 0)), cobble);
        assert_eq!(w.block(BlockPos::new(2, 30, 2)), Block::AIR);
        assert_eq!(w.block(BlockPos::new(0, 31, 0)), Block::AIR);
        assert_eq!(w.writes(), 13);
    }

    #[test]
    fn line_follows_major_axis() {
        let cells = line_cells(BlockPos::new(0, 0, 0), BlockPos::new(4, 2, -1));
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], BlockPos::new(0, 0, 0));
        assert_eq!(cells[4], BlockPos::new(4, 2, -1));
        assert!(line_cells(BlockPos::new(1, 1, 1), BlockPos::new(1, 1, 1)).is_empty());
        let down = line_cells(BlockPos::new(0, 5, 0), BlockPos::new(0, 0, 0));
        assert_eq!(down.last(), Some(&BlockPos::new(0, 0, 0)));
    }

    #[test]
    fn box_and_refresh_count_writes() {
        let (mut w, stone, cobble) = world();
        let b = BlockBox::new(BlockPos::new(0, 9, 0), BlockPos::new(1, 10, 1));
        place_box(&mut w, b, cobble, false);
        assert_eq!(w.writes(), 4);
        assert_eq!(w.block(BlockPos::new(1, 9, 1)), stone);
        w.reset_write_count();
        refresh_column(&mut w, 0, 0, 8, 11);
        assert_eq!(w.writes(), 4);
        assert_eq!(w.block(BlockPos::new(0, 10, 0)), cobble);
    }
}
