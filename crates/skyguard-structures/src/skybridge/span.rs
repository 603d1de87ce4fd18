use skyguard_blocks::Block;
use skyguard_geom::Cardinal;

use super::{ChunkPainter, SkyBridgeRenderer, walk};
use crate::paint;

// First arch piece drops this many blocks below the rails before stepping up.
const ARCH_START_DEPTH: i32 = 3;

// Lowest first-piece bottom that keeps its stair above y = 0.
const MIN_ARCH_BOTTOM: i32 = 2;

/// Stepped underside of a span. Pieces shrink from `ARCH_START_DEPTH` down to
/// single steps, then single steps run progressively longer.
#[derive(Clone, Copy, Debug)]
struct Arch {
    depth: i32,
    piece_run: i32,
    run: i32,
    bottom: i32,
    start: i32,
}

impl Arch {
    fn below(deck: i32) -> Self {
        let d = ARCH_START_DEPTH;
        let bottom = deck - 3 - d * (d + 1) / 2 - d / 2;
        Self {
            depth: d,
            piece_run: 1,
            run: 0,
            bottom,
            start: bottom,
        }
    }

    /// Whether this column gets a stair, then advances to the next column.
    fn step(&mut self) -> bool {
        if self.depth != 1 {
            self.bottom += self.depth;
            self.depth -= 1;
            return true;
        }
        let stair = self.run == 0;
        self.run += 1;
        if self.run == self.piece_run {
            self.bottom += self.depth;
            self.piece_run += 1;
            self.run = 0;
        }
        stair
    }
}

impl SkyBridgeRenderer<'_> {
    /// Deck, rails, and arch from the platform out to the chunk edge facing `dir`.
    pub(super) fn span(&self, p: &mut ChunkPainter<'_>, dir: Cardinal, extra: i32) {
        let s = p.site;
        let h = s.height;
        let step = dir.sign();
        let tower = s.tower_edge(dir);
        let rim = s.platform_edge(dir, extra);
        let edge = s.chunk_edge(dir);
        let left = s.cross_corner(dir);
        let right = left + s.width - 1;
        let pal = self.palette;

        for along in walk(tower + step, edge, step) {
            for cross in left + 1..right {
                paint::place_block(p.access, s.at(dir, along, cross, h), pal.planks, false);
            }
        }
        for cross in left + 1..right {
            paint::place_block(p.access, s.at(dir, rim, cross, h + 1), Block::AIR, true);
        }
        for along in walk(rim + step, edge, step) {
            for cross in [left, right] {
                for y in h - 2..=h + 1 {
                    paint::place_block(p.access, s.at(dir, along, cross, y), pal.cobble, false);
                }
            }
        }

        let stair = pal.stair(dir.opposite());
        let mut arch = Arch::below(h);
        if arch.start < MIN_ARCH_BOTTOM {
            return;
        }
        for along in walk(tower + step, edge, step) {
            for cross in [left, right] {
                let col = s.at(dir, along, cross, 0);
                paint::place_column(p.access, col.x, col.z, arch.bottom, h, pal.cobble, false);
            }
            let under = arch.bottom - 1;
            if arch.step() {
                for cross in [left, right] {
                    paint::place_block(p.access, s.at(dir, along, cross, under), stair, true);
                }
            }
            if arch.bottom - arch.start >= h - 3 {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_rises_in_shrinking_then_lengthening_steps() {
        let mut arch = Arch::below(150);
        assert_eq!(arch.bottom, 140);
        let mut bottoms = Vec::new();
        let mut stairs = Vec::new();
        for _ in 0..8 {
            stairs.push(arch.step());
            bottoms.push(arch.bottom);
        }
        assert_eq!(bottoms, vec![143, 145, 146, 146, 147, 147, 147, 148]);
        assert_eq!(stairs, vec![true, true, true, true, false, true, false, false]);
    }

    #[test]
    fn lowest_arch_starts_at_deck_twelve() {
        assert_eq!(Arch::below(12).start, MIN_ARCH_BOTTOM);
        assert!(Arch::below(11).start < MIN_ARCH_BOTTOM);
    }
}
