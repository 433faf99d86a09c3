//! # Break/Place Controller
//!
//! Holding the primary button starts a break timer. The targeted block is removed
//! once the timer has run for the full break duration while the block stays in
//! sight. Releasing the button, or looking away, abandons the break.
//!
//! Releasing the secondary button while a block is targeted places a new block
//! in front of the avatar. Placement never checks whether the cell is occupied.

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::{Duration, Instant};

use crate::config::InteractionConfig;
use crate::engine_state::voxels::{
    block::{Block, BlockId, BlockKind},
    world::World,
};

use super::look_target::LookTargetState;

/// Timed breaking and one-shot placement of blocks.
#[derive(Debug, Clone)]
pub struct InteractionController {
    break_duration: Duration,
    place_distance: f32,
}

impl InteractionController {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            break_duration: Duration::from_millis(config.break_duration_ms),
            place_distance: config.place_distance,
        }
    }

    pub fn break_duration(&self) -> Duration {
        self.break_duration
    }

    /// Primary button down: start timing, whether or not anything is targeted.
    pub fn begin_break(&self, look: &mut LookTargetState, now: Instant) {
        look.break_started_at = Some(now);
    }

    /// Primary button up: stop timing.
    pub fn cancel_break(&self, look: &mut LookTargetState) {
        look.break_started_at = None;
    }

    /// Removes the targeted block once it has been held for the break duration.
    ///
    /// On removal both the target and the timer are cleared, so the same block
    /// cannot be removed twice.
    ///
    /// # Returns
    /// The removed block, if this frame completed a break
    pub fn update_break(
        &self,
        look: &mut LookTargetState,
        world: &mut World,
        now: Instant,
    ) -> Option<Block> {
        let (Some(started_at), Some(target)) = (look.break_started_at, look.target) else {
            return None;
        };

        if now.saturating_duration_since(started_at) < self.break_duration {
            return None;
        }

        if !world.get_block(target)?.is_breakable() {
            return None;
        }

        let removed = world.remove_block(target);
        look.clear();
        if let Some(block) = &removed {
            debug!("Broke block {:?} at {:?}", block.id, block.position);
        }
        removed
    }

    /// Fraction of the break duration elapsed for the current target, in `[0, 1]`.
    pub fn break_progress(&self, look: &LookTargetState, now: Instant) -> f32 {
        match (look.break_started_at, look.target) {
            (Some(started_at), Some(_)) => {
                let elapsed = now.saturating_duration_since(started_at).as_secs_f32();
                (elapsed / self.break_duration.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Secondary button up: place a block in front of the avatar.
    ///
    /// Nothing happens unless a block is currently targeted.
    ///
    /// # Returns
    /// The id of the new block, if one was placed
    pub fn place_block(
        &self,
        look: &LookTargetState,
        world: &mut World,
        origin: Point3<f32>,
        facing: Vector3<f32>,
    ) -> Option<BlockId> {
        look.target?;

        let cell = self.placement_cell(origin, facing);
        let id = world.add_block(cell, BlockKind::Breakable);
        debug!("Placed block {:?} at {:?}", id, cell);
        Some(id)
    }

    /// Grid cell a placement would use: the point `place_distance` along the
    /// facing direction, floored, then raised by one cell.
    pub fn placement_cell(&self, origin: Point3<f32>, facing: Vector3<f32>) -> Point3<i32> {
        let point = origin + facing * self.place_distance;
        Point3::new(
            point.x.floor() as i32,
            point.y.floor() as i32 + 1,
            point.z.floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACING_NEG_Z: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

    fn controller() -> InteractionController {
        InteractionController::new(&InteractionConfig::default())
    }

    fn targeted_world() -> (World, BlockId, LookTargetState) {
        let mut world = World::new();
        let block = world.add_block(Point3::new(0, 0, -2), BlockKind::Breakable);
        let look = LookTargetState {
            target: Some(block),
            break_started_at: None,
        };
        (world, block, look)
    }

    #[test]
    fn break_needs_the_full_duration() {
        let controller = controller();
        let (mut world, block, mut look) = targeted_world();
        let start = Instant::now();

        controller.begin_break(&mut look, start);
        let early = controller.update_break(&mut look, &mut world, start + Duration::from_millis(3499));
        assert!(early.is_none());
        assert!(world.get_block(block).is_some());

        let done = controller.update_break(&mut look, &mut world, start + Duration::from_millis(3500));
        assert_eq!(done.map(|b| b.id), Some(block));
        assert!(world.is_empty());
        assert_eq!(look, LookTargetState::default());

        let again = controller.update_break(&mut look, &mut world, start + Duration::from_secs(10));
        assert!(again.is_none());
    }

    #[test]
    fn releasing_the_button_cancels_the_break() {
        let controller = controller();
        let (mut world, block, mut look) = targeted_world();
        let start = Instant::now();

        controller.begin_break(&mut look, start);
        controller.cancel_break(&mut look);

        let result = controller.update_break(&mut look, &mut world, start + Duration::from_secs(5));
        assert!(result.is_none());
        assert_eq!(look.target, Some(block));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn break_without_target_does_nothing() {
        let controller = controller();
        let mut world = World::new();
        world.add_block(Point3::new(0, 0, -2), BlockKind::Breakable);
        let mut look = LookTargetState::default();
        let start = Instant::now();

        controller.begin_break(&mut look, start);
        assert_eq!(look.break_started_at, Some(start));

        let result = controller.update_break(&mut look, &mut world, start + Duration::from_secs(5));
        assert!(result.is_none());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn progress_tracks_elapsed_time() {
        let controller = controller();
        let (_, _, mut look) = targeted_world();
        let start = Instant::now();

        assert_eq!(controller.break_progress(&look, start), 0.0);
        controller.begin_break(&mut look, start);
        let half = controller.break_progress(&look, start + Duration::from_millis(1750));
        assert!((half - 0.5).abs() < 1e-4);
        assert_eq!(controller.break_progress(&look, start + Duration::from_secs(9)), 1.0);
    }

    #[test]
    fn placement_cell_is_floored_and_raised() {
        let controller = controller();
        let cell = controller.placement_cell(Point3::new(0.0, 0.75, 0.0), FACING_NEG_Z);
        assert_eq!(cell, Point3::new(0, 1, -2));

        let cell = controller.placement_cell(Point3::new(0.3, 0.75, 0.2), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(cell, Point3::new(1, 1, 0));
    }

    #[test]
    fn placing_twice_creates_duplicates() {
        let controller = controller();
        let (mut world, _, look) = targeted_world();
        let origin = Point3::new(0.0, 0.75, 0.0);

        let first = controller.place_block(&look, &mut world, origin, FACING_NEG_Z).unwrap();
        let second = controller.place_block(&look, &mut world, origin, FACING_NEG_Z).unwrap();

        assert_ne!(first, second);
        assert_eq!(world.blocks_at(Point3::new(0, 1, -2)).count(), 2);
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn placing_without_target_is_ignored() {
        let controller = controller();
        let mut world = World::new();
        let look = LookTargetState::default();

        let placed = controller.place_block(
            &look,
            &mut world,
            Point3::new(0.0, 0.75, 0.0),
            FACING_NEG_Z,
        );

        assert!(placed.is_none());
        assert!(world.is_empty());
    }
}
