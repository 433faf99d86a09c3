//! # World Module
//!
//! This module provides the `World` struct, the authoritative store of every live
//! block. Blocks are kept in insertion order and referred to by [`BlockId`].
//!
//! ## Generation
//!
//! The starting world is a square grid of cells on the ground plane, each filled
//! with a breakable block with a configurable probability.
//!
//! ## Duplicates
//!
//! The world does not index blocks by position. Placing a block on an occupied
//! cell yields a second block at the same cell with its own id, and each one has
//! to be broken separately.

use cgmath::Point3;
use log::debug;

use crate::config::WorldConfig;
use crate::engine_state::voxels::block::{Block, BlockId, BlockKind};

/// The collection of all live blocks.
///
/// # Examples
///
/// ```ignore
/// let mut world = World::new();
/// let id = world.add_block(Point3::new(0, 0, 0), BlockKind::Breakable);
/// assert!(world.get_block(id).is_some());
/// world.remove_block(id);
/// assert!(world.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct World {
    /// Blocks in insertion order
    blocks: Vec<Block>,
    /// Id handed to the next inserted block
    next_id: u64,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world populated by the grid generator.
    ///
    /// Every cell with `x` and `z` in `-grid_radius..=grid_radius` on the ground
    /// layer is visited once, row by row. A cell receives a block when a uniform
    /// sample in `[0, 1)` exceeds `1 - fill_probability`.
    ///
    /// # Arguments
    /// * `config` - Grid radius, fill probability and optional seed
    pub fn generate(config: &WorldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let threshold = 1.0 - config.fill_probability;
        let radius = config.grid_radius;

        let mut world = Self::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                if rng.f32() > threshold {
                    world.add_block(Point3::new(x, 0, z), BlockKind::Breakable);
                }
            }
        }

        debug!("Generated world with {} blocks", world.len());
        world
    }

    /// Appends a new block and returns its id.
    ///
    /// No check is made for an existing block at the same cell.
    pub fn add_block(&mut self, position: Point3<i32>, kind: BlockKind) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push(Block::new(id, position, kind));
        id
    }

    /// Removes the block with the given id, returning it if it was present.
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.id == id)?;
        Some(self.blocks.remove(index))
    }

    /// Looks up a block by id.
    pub fn get_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Iterates over all blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// All blocks occupying the given cell, in insertion order.
    pub fn blocks_at(&self, position: Point3<i32>) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |block| block.position == position)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
