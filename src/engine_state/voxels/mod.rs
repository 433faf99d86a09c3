//! # Voxels
//!
//! Block entities and the world store that owns them.
//!
//! * **Block**: a unit cube on an integer grid cell, identified by a `BlockId`
//! * **World**: the insertion-ordered collection of every live block, plus the
//!   grid generator that populates the starting world

pub mod block;
pub mod world;
