//! # Block Type Module
//!
//! This module defines the kinds of blocks that can exist in the world.

/// Enumerates the kinds of blocks in the world.
///
/// Every block the sandbox creates today is breakable. The enum leaves room for
/// terrain the player cannot destroy without changing how blocks are stored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A block the player can break by holding the primary button on it.
    #[default]
    Breakable,
}

impl BlockKind {
    /// Whether the player may destroy a block of this kind.
    pub fn is_breakable(&self) -> bool {
        matches!(self, BlockKind::Breakable)
    }

    /// Base colour used by the renderer, as sRGB RGBA.
    pub fn base_color(&self) -> [f32; 4] {
        match self {
            // 0x8B4513
            BlockKind::Breakable => [0.545, 0.271, 0.075, 1.0],
        }
    }
}
