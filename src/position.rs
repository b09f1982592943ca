use serde::{Deserialize, Serialize};

/// Width and depth of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Number of block columns in a chunk (16 x 16, row-major).
pub const COLUMNS_PER_CHUNK: usize = 256;

/// Absolute block position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Row-major column index of this position within its chunk, 0..256.
    pub fn column(&self) -> usize {
        ((self.x & 15) | ((self.z & 15) << 4)) as usize
    }
}

/// Horizontal chunk coordinate. One chunk is the unit of land ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing the given block position.
    pub fn containing(pos: BlockPos) -> Self {
        Self {
            x: pos.x >> 4,
            z: pos.z >> 4,
        }
    }
}

impl std::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
