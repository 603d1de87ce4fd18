//! Integer block geometry shared by the generation crates.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Sub, SubAssign};

/// World-space voxel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Steps `n` blocks toward `dir` on the horizontal plane.
    #[inline]
    pub fn step(self, dir: Cardinal, n: i32) -> Self {
        let (dx, dz) = dir.delta();
        self.offset(dx * n, 0, dz * n)
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for BlockPos {
    #[inline]
    fn add_assign(&mut self, rhs: BlockPos) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for BlockPos {
    #[inline]
    fn sub_assign(&mut self, rhs: BlockPos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

/// Axis-aligned box of voxels; both corners are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBox {
    /// Builds a box from any two corners, ordering each axis.
    #[inline]
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn intersects(&self, other: &BlockBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Overlapping part of two boxes, if any.
    pub fn intersection(&self, other: &BlockBox) -> Option<BlockBox> {
        if !self.intersects(other) {
            return None;
        }
        Some(BlockBox {
            min: BlockPos::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        })
    }

    #[inline]
    pub fn union(&self, other: &BlockBox) -> BlockBox {
        BlockBox {
            min: BlockPos::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Grows (or shrinks, for negative `by`) the box horizontally.
    #[inline]
    pub fn inflate_xz(&self, by: i32) -> BlockBox {
        BlockBox {
            min: self.min.offset(-by, 0, -by),
            max: self.max.offset(by, 0, by),
        }
    }

    #[inline]
    pub fn size_x(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    #[inline]
    pub fn size_y(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    #[inline]
    pub fn size_z(&self) -> i32 {
        self.max.z - self.min.z + 1
    }

    /// True when `(x, z)` lies on the horizontal outline of the box.
    #[inline]
    pub fn on_xz_edge(&self, x: i32, z: i32) -> bool {
        x == self.min.x || x == self.max.x || z == self.min.z || z == self.max.z
    }
}

/// Horizontal compass direction. North is -Z and east is +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::South,
        Cardinal::East,
        Cardinal::West,
    ];

    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::South => (0, 1),
            Cardinal::East => (1, 0),
            Cardinal::West => (-1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Cardinal {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::South => Cardinal::North,
            Cardinal::East => Cardinal::West,
            Cardinal::West => Cardinal::East,
        }
    }

    /// Moves along the X axis.
    #[inline]
    pub const fn is_x_axis(self) -> bool {
        matches!(self, Cardinal::East | Cardinal::West)
    }

    /// +1 for directions pointing toward increasing coordinates.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Cardinal::South | Cardinal::East => 1,
            Cardinal::North | Cardinal::West => -1,
        }
    }

    pub fn from_delta(dx: i32, dz: i32) -> Option<Cardinal> {
        match (dx.signum(), dz.signum()) {
            (0, -1) => Some(Cardinal::North),
            (0, 1) => Some(Cardinal::South),
            (1, 0) => Some(Cardinal::East),
            (-1, 0) => Some(Cardinal::West),
            _ => None,
        }
    }
}
