use skyguard_blocks::Block;
use skyguard_geom::BlockPos;

use super::{ChunkPainter, SkyBridgeRenderer};
use crate::loot::LootTable;
use crate::paint;

/// Platform rectangle after widening the tower footprint by `extra` on every side.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Platform {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
    pub size: i32,
    pub y: i32,
}

impl Platform {
    fn around(p: &ChunkPainter<'_>, extra: i32) -> Self {
        let s = p.site;
        Self {
            min_x: s.corner_x - extra,
            min_z: s.corner_z - extra,
            max_x: s.corner_x + s.width - 1 + extra,
            max_z: s.corner_z + s.width - 1 + extra,
            size: s.width - 1 + 2 * extra,
            y: s.height,
        }
    }

    #[inline]
    fn on_rim(&self, x: i32, z: i32, inset: i32) -> bool {
        x == self.min_x + inset || x == self.max_x - inset || z == self.min_z + inset || z == self.max_z - inset
    }

    #[inline]
    fn middle(&self) -> BlockPos {
        BlockPos::new(self.min_x + self.size / 2, self.y + 1, self.min_z + self.size / 2)
    }
}

impl SkyBridgeRenderer<'_> {
    /// Lays the platform deck with a two-high rim. Stone platforms also get
    /// stepped support rings underneath.
    pub(super) fn platform(&self, p: &mut ChunkPainter<'_>, extra: i32, stone: bool) -> Platform {
        let pf = Platform::around(p, extra);
        let cobble = self.palette.cobble;
        let floor = if stone { cobble } else { self.palette.planks };
        for x in pf.min_x..=pf.max_x {
            for z in pf.min_z..=pf.max_z {
                if pf.on_rim(x, z, 0) {
                    paint::place_block(p.access, BlockPos::new(x, pf.y, z), cobble, true);
                    paint::place_block(p.access, BlockPos::new(x, pf.y + 1, z), cobble, true);
                } else {
                    paint::place_block(p.access, BlockPos::new(x, pf.y, z), floor, true);
                }
            }
        }
        if stone {
            for j in 1..extra {
                for x in pf.min_x + j..=pf.max_x - j {
                    for z in pf.min_z + j..=pf.max_z - j {
                        if pf.on_rim(x, z, j) {
                            paint::place_block(p.access, BlockPos::new(x, pf.y - j, z), cobble, true);
                        }
                    }
                }
            }
        }
        pf
    }

    fn table_and_chairs(&self, p: &mut ChunkPainter<'_>, pf: &Platform) {
        let at = pf.middle();
        paint::place_block(p.access, at, self.palette.table, true);
        for (dx, dz) in [(1, 0), (-1, 0), (0, -1), (0, 1)] {
            paint::place_block(p.access, at.offset(dx, 0, dz), self.palette.chair, true);
        }
    }

    /// Places a chest and fills it. Hosts that refuse the container get the
    /// block only.
    fn chest(&self, p: &mut ChunkPainter<'_>, pos: BlockPos, loot: &LootTable) {
        match p.access.place_container(pos, self.palette.chest) {
            Some(container) => loot.fill_default(container, self.items, &mut p.rng),
            None => log::debug!("no container at {pos:?}; chest left empty"),
        }
    }

    /// Dead-end bridge: wider plank platform with a table and four chairs.
    pub(super) fn end_platform(&self, p: &mut ChunkPainter<'_>) {
        let pf = self.platform(p, self.cfg.end_platform_extra_width, false);
        self.table_and_chairs(p, &pf);
    }

    /// Tower cell: stone platform with a roofed store room, ladder, and chest.
    pub(super) fn store_room(&self, p: &mut ChunkPainter<'_>) {
        self.platform(p, self.cfg.store_room_platform_extra_width, true);
        let s = p.site;
        let w = s.width;
        let room = p.rng.range(self.cfg.store_room_height_min, self.cfg.store_room_height_max);
        for i in 0..w {
            for k in 0..w {
                let (x, z) = (s.corner_x + i, s.corner_z + k);
                let wall = i == 0 || i == w - 1 || k == 0 || k == w - 1;
                if wall && k != w - 2 {
                    let lip = i32::from(k == w - 1);
                    paint::place_column_to_ground(p.access, x, s.height + room + lip, z, self.palette.cobble);
                } else {
                    paint::place_block(p.access, BlockPos::new(x, s.height + room - 1, z), self.palette.planks, true);
                }
            }
        }

        let hatch = BlockPos::new(s.corner_x + 1, s.height, s.corner_z + 1);
        paint::place_block(p.access, hatch, Block::AIR, true);
        paint::place_block(p.access, hatch.offset(0, 2, 0), self.palette.torch_south, true);
        paint::place_column_to_ground(p.access, hatch.x, hatch.y, hatch.z, self.palette.ladder);

        let chest = BlockPos::new(s.corner_x + w - 2, s.height + 1, s.corner_z + 1);
        self.chest(p, chest, &self.loot.tower);
    }

    /// Building cell: stone platform with crates, an optional chest, and a
    /// walled barracks lined with beds.
    pub(super) fn barracks(&self, p: &mut ChunkPainter<'_>) {
        let cfg = self.cfg;
        let pf = self.platform(p, cfg.barracks_platform_extra_width, true);
        let inner = pf.size - 6;

        let crates = p.rng.range(cfg.barracks_min_crates, cfg.barracks_max_crates);
        for _ in 0..crates {
            let x = p.rng.next_int(inner) + pf.min_x + 3;
            let z = p.rng.next_int(inner) + pf.min_z + 3;
            paint::place_block(p.access, BlockPos::new(x, pf.y + 1, z), self.palette.crate_block, true);
        }

        if p.rng.chance(cfg.barracks_chest_chance) {
            let x = p.rng.next_int(inner) + pf.min_x + 3;
            self.chest(p, BlockPos::new(x, pf.y + 1, pf.min_z + 3), &self.loot.barracks);
        }

        let room = p.rng.range(cfg.barracks_height_min, cfg.barracks_height_max);
        let last = pf.size - 2;
        for i in 2..=last {
            for k in 2..=last {
                let (x, z) = (pf.min_x + i, pf.min_z + k);
                let wall = i == 2 || i == last || k == 2 || k == last;
                if !wall || k == pf.size - 3 {
                    paint::place_block(p.access, BlockPos::new(x, pf.y + room - 1, z), self.palette.planks, true);
                    continue;
                }
                paint::place_column_to_ground(p.access, x, pf.y + room, z, self.palette.cobble);

                let bed_row = k % 2 == 0 && k > 2 && k < last;
                if i == 2 && bed_row && p.rng.chance(cfg.barracks_bed_chance) {
                    self.bed(p, BlockPos::new(x + 1, pf.y + 1, z), 1);
                }
                if i == last && bed_row && p.rng.chance(cfg.barracks_bed_chance) {
                    self.bed(p, BlockPos::new(x - 1, pf.y + 1, z), -1);
                }
            }
        }
    }

    /// Bed head at `head` with its foot one step further along `step` on X,
    /// and a burned-out torch above the head.
    fn bed(&self, p: &mut ChunkPainter<'_>, head: BlockPos, step: i32) {
        let pal = self.palette;
        let (torch, head_block, foot_block) = if step > 0 {
            (pal.torch_east, pal.bed_head_east, pal.bed_foot_east)
        } else {
            (pal.torch_west, pal.bed_head_west, pal.bed_foot_west)
        };
        paint::place_block(p.access, head.offset(0, 1, 0), torch, true);
        paint::place_block(p.access, head, head_block, true);
        paint::place_block(p.access, head.offset(step, 0, 0), foot_block, true);
    }

    /// Center cell: the widest stone platform, a possible chest, crates, and a table.
    pub(super) fn center(&self, p: &mut ChunkPainter<'_>) {
        let cfg = self.cfg;
        let pf = self.platform(p, cfg.center_platform_extra_width, true);

        if p.rng.chance(cfg.center_chest_chance) {
            let x = p.rng.next_int(pf.size - 6) + pf.min_x + 3;
            self.chest(p, BlockPos::new(x, pf.y + 1, pf.min_z + 1), &self.loot.center);
        }

        let crates = p.rng.range(cfg.barracks_min_crates, cfg.barracks_max_crates);
        for _ in 0..crates {
            let x = p.rng.next_int(pf.size - 2) + pf.min_x + 1;
            let z = p.rng.next_int(pf.size - 2) + pf.min_z + 1;
            paint::place_block(p.access, BlockPos::new(x, pf.y + 1, z), self.palette.crate_block, true);
        }

        self.table_and_chairs(p, &pf);
    }
}
