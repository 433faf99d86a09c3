//! # Look-Target Resolver
//!
//! Finds the block the avatar is looking at by casting a ray from the body
//! centre along the facing direction and keeping the nearest block within reach.
//!
//! Intersection is a linear scan over the world using the slab test against each
//! block's cube. Only hits where the ray enters a cube count: a ray that starts
//! inside a block does not see that block.

use cgmath::{InnerSpace, Point3, Vector3};
use web_time::Instant;

use crate::engine_state::voxels::{block::BlockId, world::World};

/// The nearest block hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block: BlockId,
    /// Distance from the ray origin to the entry point
    pub distance: f32,
}

/// What the avatar is currently looking at, and how long it has been breaking it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookTargetState {
    /// Block under the crosshair, if one is within reach
    pub target: Option<BlockId>,
    /// When the primary button went down, while it is held
    pub break_started_at: Option<Instant>,
}

impl LookTargetState {
    /// Recomputes the target for this frame.
    ///
    /// A block becomes the target when the nearest hit is strictly closer than
    /// `reach`. Otherwise the target is cleared and any break in progress is
    /// abandoned with it.
    ///
    /// # Returns
    /// The nearest hit, whether or not it is within reach
    pub fn resolve(
        &mut self,
        origin: Point3<f32>,
        facing: Vector3<f32>,
        world: &World,
        reach: f32,
    ) -> Option<RayHit> {
        let hit = cast_ray(origin, facing, world);

        match hit {
            Some(hit) if hit.distance < reach => self.target = Some(hit.block),
            _ => {
                self.target = None;
                self.break_started_at = None;
            }
        }

        hit
    }

    /// Drops both the target and any break in progress.
    pub fn clear(&mut self) {
        self.target = None;
        self.break_started_at = None;
    }
}

/// Casts a ray against every block and returns the nearest entering hit.
///
/// Ties are won by the block inserted first. A zero direction hits nothing.
pub fn cast_ray(origin: Point3<f32>, direction: Vector3<f32>, world: &World) -> Option<RayHit> {
    if direction.magnitude2() == 0.0 {
        return None;
    }
    let direction = direction.normalize();

    let mut nearest: Option<RayHit> = None;
    for block in world.blocks() {
        let (min, max) = block.bounds();
        let Some(distance) = ray_box_entry(origin, direction, min, max) else {
            continue;
        };
        if nearest.map_or(true, |best| distance < best.distance) {
            nearest = Some(RayHit {
                block: block.id,
                distance,
            });
        }
    }
    nearest
}

/// Distance along the ray at which it enters an axis-aligned box.
///
/// # Returns
/// `None` if the ray misses, the box is behind the origin, or the origin is
/// inside the box
fn ray_box_entry(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    min: Point3<f32>,
    max: Point3<f32>,
) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let start = origin[axis];
        let step = direction[axis];

        if step == 0.0 {
            if start < min[axis] || start > max[axis] {
                return None;
            }
            continue;
        }

        let t1 = (min[axis] - start) / step;
        let t2 = (max[axis] - start) / step;
        let (enter, exit) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        t_near = t_near.max(enter);
        t_far = t_far.min(exit);
        if t_near > t_far {
            return None;
        }
    }

    if t_near < 0.0 {
        return None;
    }
    Some(t_near)
}
