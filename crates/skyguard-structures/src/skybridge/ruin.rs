use skyguard_geom::{BlockPos, Cardinal};
use skyguard_world::CHUNK_SIZE;

use super::{ChunkPainter, SkyBridgeRenderer};
use crate::paint;

// Rails of a snapped span sag this many blocks at the break.
const RESIDUAL_SIDE_DEPTH: f32 = 4.0;

impl SkyBridgeRenderer<'_> {
    /// Ragged wall stubs standing on whatever ground lies under the footprint.
    pub(super) fn broken_tower(&self, p: &mut ChunkPainter<'_>) {
        let s = p.site;
        let w = s.width;
        for i in 0..w {
            for k in 0..w {
                if i != 0 && i != w - 1 && k != 0 && k != w - 1 {
                    continue;
                }
                let (x, z) = (s.corner_x + i, s.corner_z + k);
                let stub = p.rng.range(self.cfg.min_tower_stub_size, self.cfg.max_tower_stub_size);
                let ground = paint::find_ground_height(p.access, x, s.height, z);
                paint::place_column_to_ground(p.access, x, ground + stub, z, self.palette.cobble);
            }
        }
    }

    /// Heaps of fallen masonry between the tower and the chunk edge facing `dir`.
    pub(super) fn rubble_toward(&self, p: &mut ChunkPainter<'_>, dir: Cardinal) {
        let cfg = self.cfg;
        let s = p.site;
        let piles = p.rng.range(cfg.min_rubble_piles, cfg.max_rubble_piles);
        for _ in 0..piles {
            let along = p.rng.next_int(CHUNK_SIZE / 2 - s.width / 2);
            let size = p.rng.range(cfg.min_bridge_rubble_pile_size, cfg.max_bridge_rubble_pile_size);
            let center = s.at(
                dir,
                s.chunk_edge(dir) - dir.sign() * along,
                s.cross_corner(dir) + s.width / 2,
                s.height,
            );
            let (ext_x, ext_z) = if dir.is_x_axis() { (size, s.width) } else { (s.width, size) };
            self.pile(p, center, ext_x, ext_z);
        }
    }

    /// Elliptical scatter of short columns. Cells outside the chunk are skipped
    /// without drawing.
    fn pile(&self, p: &mut ChunkPainter<'_>, center: BlockPos, ext_x: i32, ext_z: i32) {
        let cfg = self.cfg;
        let s = p.site;
        let (sq_x, sq_z) = ((ext_x * ext_x) as f32, (ext_z * ext_z) as f32);
        let xs = (center.x - ext_x / 2).max(s.base_x)..(center.x + ext_x / 2).min(s.base_x + CHUNK_SIZE);
        for x in xs {
            let zs = (center.z - ext_z / 2).max(s.base_z)..(center.z + ext_z / 2).min(s.base_z + CHUNK_SIZE);
            for z in zs {
                let (dx, dz) = (x - center.x, z - center.z);
                let dist = (dx * dx) as f32 / sq_x + (dz * dz) as f32 / sq_z;
                if p.rng.next_float() < (1.0 - dist) * cfg.rubble_base_chance {
                    let height = p.rng.range(cfg.min_rubble_height, cfg.max_rubble_height);
                    let ground = paint::find_ground_height(p.access, x, center.y, z);
                    paint::place_column_to_ground(p.access, x, ground + height, z, self.palette.cobble);
                }
            }
        }
    }

    /// Snapped span end hanging in from the chunk edge: tapering rails and a
    /// few loose planks between them.
    pub(super) fn residual_deck(&self, p: &mut ChunkPainter<'_>, dir: Cardinal) {
        let cfg = self.cfg;
        let s = p.site;
        let h = s.height;
        let left = s.cross_corner(dir);
        let right = left + s.width - 1;
        let first = p.rng.range(cfg.residual_length_min, cfg.residual_length_max);
        let second = p.rng.range(cfg.residual_length_min, cfg.residual_length_max);
        let sag = |t: i32, len: i32| ((1.0 - (t as f32 / len as f32).max(0.0)) * RESIDUAL_SIDE_DEPTH) as i32;

        for t in 0..first.max(second) {
            let along = s.chunk_edge(dir) - dir.sign() * t;
            let (d1, d2) = (sag(t, first), sag(t, second));
            for j in 0..d1 {
                paint::place_block(p.access, s.at(dir, along, left, h + 1 - j), self.palette.cobble, true);
            }
            for j in 0..d2 {
                paint::place_block(p.access, s.at(dir, along, right, h + 1 - j), self.palette.cobble, true);
            }
            if d1 > 1 {
                let planks = p.rng.next_int(s.width / 2);
                for i in 0..planks {
                    paint::place_block(p.access, s.at(dir, along, left + 1 + i, h), self.palette.planks, true);
                }
            }
            if d2 > 1 {
                let planks = p.rng.next_int(s.width / 2);
                for i in 0..planks {
                    paint::place_block(p.access, s.at(dir, along, right - 1 - i, h), self.palette.planks, true);
                }
            }
        }
    }
}
