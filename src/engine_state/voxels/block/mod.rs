//! # Block Module
//!
//! This module provides the block entity stored in the world: a unit cube sitting
//! on an integer grid cell, identified by a [`BlockId`] handed out by the world.

use cgmath::{Point3, Vector3};

pub use block_type::BlockKind;

pub mod block_type;

/// Identifier of a block, unique for the lifetime of the process.
///
/// Two blocks placed at the same grid cell still receive distinct ids, so
/// removing one of them never touches the other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// A single unit-cube block in the world.
///
/// The block occupies `[x - 0.5, x + 0.5] x [y, y + 1] x [z - 0.5, z + 0.5]`:
/// its footprint is centred on the grid cell and its base rests on `y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Block {
    /// Identifier assigned by the world when the block was inserted
    pub id: BlockId,
    /// Integer grid cell of the block
    pub position: Point3<i32>,
    /// What kind of block this is
    pub kind: BlockKind,
}

impl Block {
    /// Half the edge length of a block.
    pub const HALF_EXTENT: f32 = 0.5;

    /// Creates a new block of the given kind at a grid cell.
    ///
    /// # Arguments
    /// * `id` - Identifier handed out by the world
    /// * `position` - Grid cell of the block
    /// * `kind` - The kind of block to create
    pub fn new(id: BlockId, position: Point3<i32>, kind: BlockKind) -> Self {
        Self { id, position, kind }
    }

    /// Whether the player may break this block.
    pub fn is_breakable(&self) -> bool {
        self.kind.is_breakable()
    }

    /// World-space centre of the cube.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            self.position.x as f32,
            self.position.y as f32 + Self::HALF_EXTENT,
            self.position.z as f32,
        )
    }

    /// Minimum and maximum corners of the cube's axis-aligned bounds.
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let center = self.center();
        let half = Vector3::new(Self::HALF_EXTENT, Self::HALF_EXTENT, Self::HALF_EXTENT);
        (center - half, center + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_rests_on_its_grid_cell() {
        let block = Block::new(BlockId(0), Point3::new(2, 0, -3), BlockKind::Breakable);
        let (min, max) = block.bounds();

        assert_eq!(min, Point3::new(1.5, 0.0, -3.5));
        assert_eq!(max, Point3::new(2.5, 1.0, -2.5));
        assert!(block.is_breakable());
    }
}
