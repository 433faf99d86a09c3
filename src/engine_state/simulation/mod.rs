//! # Simulation
//!
//! The movement and interaction state machine of the sandbox. Everything here is
//! plain data advanced once per frame, independent of the window and the GPU:
//!
//! * `avatar` - per-frame movement and jumping of the player body
//! * `look_target` - ray cast from the avatar to the nearest block within reach
//! * `interaction` - timed breaking and one-shot placement of blocks
//!
//! ## Frame order
//!
//! 1. Button actions that happened since the last frame (break start/stop, place)
//! 2. Jump request and avatar movement
//! 3. Look target resolution from the new position
//! 4. Break timer check
//!
//! Button actions use the target from the previous frame, the one that was under
//! the crosshair when the button changed.

use cgmath::Vector3;
use log::debug;
use web_time::Instant;

use crate::config::DemoConfig;

use avatar::Avatar;
use interaction::InteractionController;
use look_target::LookTargetState;

use super::voxels::{block::BlockId, world::World};

pub mod avatar;
pub mod interaction;
pub mod look_target;

/// Player intent for one frame.
///
/// Movement and `primary_held` describe the state at the time of the snapshot.
/// The remaining flags record button changes since the previous frame and are
/// cleared once a frame consumes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Jump key pressed or held
    pub jump: bool,
    /// Primary button went down
    pub primary_pressed: bool,
    /// Primary button went up
    pub primary_released: bool,
    /// Primary button is down at the time of the snapshot
    pub primary_held: bool,
    /// Secondary button went up
    pub secondary_released: bool,
}

impl InputIntent {
    /// Folds a newer snapshot into this one.
    ///
    /// Held state is taken from the newer snapshot; one-shot flags accumulate so
    /// a click between two frames is not lost.
    pub fn merge(&mut self, newer: InputIntent) {
        self.move_forward = newer.move_forward;
        self.move_backward = newer.move_backward;
        self.move_left = newer.move_left;
        self.move_right = newer.move_right;
        self.primary_held = newer.primary_held;
        self.jump |= newer.jump;
        self.primary_pressed |= newer.primary_pressed;
        self.primary_released |= newer.primary_released;
        self.secondary_released |= newer.secondary_released;
    }

    /// Clears the flags a frame consumes.
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.primary_pressed = false;
        self.primary_released = false;
        self.secondary_released = false;
    }
}

/// A change to the world made during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    Added(BlockId),
    Removed(BlockId),
}

/// All mutable game state, owned by the frame driver.
#[derive(Debug)]
pub struct SimulationState {
    pub avatar: Avatar,
    pub world: World,
    pub look: LookTargetState,
    pub controller: InteractionController,
    reach: f32,
}

impl SimulationState {
    /// Creates the simulation with a freshly generated world.
    pub fn new(config: &DemoConfig) -> Self {
        Self::with_world(config, World::generate(&config.world))
    }

    /// Creates the simulation around an existing world.
    pub fn with_world(config: &DemoConfig, world: World) -> Self {
        Self {
            avatar: Avatar::new(config.player.clone()),
            world,
            look: LookTargetState::default(),
            controller: InteractionController::new(&config.interaction),
            reach: config.interaction.reach,
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// # Arguments
    /// * `intent` - Player intent gathered since the previous frame
    /// * `facing` - Unit vector the camera looks along
    /// * `now` - Timestamp of this frame
    ///
    /// # Returns
    /// The blocks added and removed during the frame, in order
    pub fn tick(
        &mut self,
        intent: &InputIntent,
        facing: Vector3<f32>,
        now: Instant,
    ) -> Vec<WorldEvent> {
        let mut events = Vec::new();

        self.apply_button_actions(intent, facing, now, &mut events);

        if intent.jump {
            self.avatar.request_jump();
        }
        self.avatar.step(intent, facing);

        self.look
            .resolve(self.avatar.position, facing, &self.world, self.reach);

        if let Some(block) = self
            .controller
            .update_break(&mut self.look, &mut self.world, now)
        {
            events.push(WorldEvent::Removed(block.id));
        }

        events
    }

    /// Break progress of the current target, in `[0, 1]`.
    pub fn break_progress(&self, now: Instant) -> f32 {
        self.controller.break_progress(&self.look, now)
    }

    fn apply_button_actions(
        &mut self,
        intent: &InputIntent,
        facing: Vector3<f32>,
        now: Instant,
        events: &mut Vec<WorldEvent>,
    ) {
        // A button that is down after both a press and a release was released
        // first, so the press is the one that sticks.
        if intent.primary_held {
            if intent.primary_released {
                self.controller.cancel_break(&mut self.look);
            }
            if intent.primary_pressed {
                self.controller.begin_break(&mut self.look, now);
            }
        } else {
            if intent.primary_pressed {
                self.controller.begin_break(&mut self.look, now);
            }
            if intent.primary_released {
                self.controller.cancel_break(&mut self.look);
            }
        }

        if intent.secondary_released {
            if let Some(id) =
                self.controller
                    .place_block(&self.look, &mut self.world, self.avatar.position, facing)
            {
                events.push(WorldEvent::Added(id));
            } else {
                debug!("Secondary release with nothing targeted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;
    use web_time::Duration;

    use super::*;
    use crate::engine_state::voxels::block::BlockKind;

    const FACING_NEG_Z: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);
    const FACING_POS_Z: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);
    const FRAME: Duration = Duration::from_millis(16);

    fn state_with_block_ahead() -> (SimulationState, BlockId) {
        let mut world = World::new();
        world.add_block(Point3::new(4, 0, 4), BlockKind::Breakable);
        let target = world.add_block(Point3::new(0, 0, -2), BlockKind::Breakable);
        world.add_block(Point3::new(-4, 0, 4), BlockKind::Breakable);
        (SimulationState::with_world(&DemoConfig::default(), world), target)
    }

    fn press_primary() -> InputIntent {
        InputIntent {
            primary_pressed: true,
            primary_held: true,
            ..Default::default()
        }
    }

    fn hold_primary() -> InputIntent {
        InputIntent {
            primary_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn holding_primary_on_a_block_breaks_it_once() {
        let (mut state, target) = state_with_block_ahead();
        let start = Instant::now();
        let before = state.world.len();

        let mut removed = Vec::new();
        removed.extend(state.tick(&press_primary(), FACING_NEG_Z, start));
        assert_eq!(state.look.target, Some(target));

        let mut now = start;
        while now < start + Duration::from_millis(4000) {
            now += FRAME;
            removed.extend(state.tick(&hold_primary(), FACING_NEG_Z, now));
        }

        assert_eq!(removed, vec![WorldEvent::Removed(target)]);
        assert_eq!(state.world.len(), before - 1);
        assert!(state.world.get_block(target).is_none());
        assert_eq!(state.look.break_started_at, None);
    }

    #[test]
    fn break_starts_before_a_target_exists() {
        let (mut state, target) = state_with_block_ahead();
        let start = Instant::now();

        state.tick(&press_primary(), FACING_POS_Z, start);
        assert_eq!(state.look.target, None);
        // Nothing in sight, so the timer is dropped by the resolver.
        assert_eq!(state.look.break_started_at, None);

        let events = state.tick(&hold_primary(), FACING_NEG_Z, start + Duration::from_secs(5));
        assert!(events.is_empty());
        assert_eq!(state.look.target, Some(target));
    }

    #[test]
    fn looking_away_loses_progress() {
        let (mut state, target) = state_with_block_ahead();
        let start = Instant::now();

        state.tick(&press_primary(), FACING_NEG_Z, start);
        state.tick(&hold_primary(), FACING_POS_Z, start + Duration::from_millis(2000));
        let events = state.tick(&hold_primary(), FACING_NEG_Z, start + Duration::from_millis(3600));

        assert!(events.is_empty());
        assert!(state.world.get_block(target).is_some());
        assert_eq!(state.look.break_started_at, None);
    }

    #[test]
    fn click_within_one_frame_does_not_break() {
        let (mut state, target) = state_with_block_ahead();
        let start = Instant::now();
        let click = InputIntent {
            primary_pressed: true,
            primary_released: true,
            ..Default::default()
        };

        state.tick(&click, FACING_NEG_Z, start);
        assert_eq!(state.look.break_started_at, None);

        let events = state.tick(&InputIntent::default(), FACING_NEG_Z, start + Duration::from_secs(4));
        assert!(events.is_empty());
        assert!(state.world.get_block(target).is_some());
    }

    #[test]
    fn release_then_press_restarts_the_timer() {
        let (mut state, _) = state_with_block_ahead();
        let start = Instant::now();
        state.tick(&press_primary(), FACING_NEG_Z, start);

        let later = start + Duration::from_millis(500);
        let regrab = InputIntent {
            primary_pressed: true,
            primary_released: true,
            primary_held: true,
            ..Default::default()
        };
        state.tick(&regrab, FACING_NEG_Z, later);

        assert_eq!(state.look.break_started_at, Some(later));
    }

    #[test]
    fn secondary_release_places_using_the_previous_target() {
        let (mut state, _) = state_with_block_ahead();
        let start = Instant::now();
        let place = InputIntent {
            secondary_released: true,
            ..Default::default()
        };

        // No target resolved yet on the very first frame.
        assert!(state.tick(&place, FACING_NEG_Z, start).is_empty());

        let events = state.tick(&place, FACING_NEG_Z, start + FRAME);
        let [WorldEvent::Added(id)] = events.as_slice() else {
            panic!("expected one placement, got {events:?}");
        };
        assert_eq!(state.world.get_block(*id).unwrap().position, Point3::new(0, 1, -2));

        state.tick(&place, FACING_NEG_Z, start + FRAME * 2);
        assert_eq!(state.world.blocks_at(Point3::new(0, 1, -2)).count(), 2);
    }

    #[test]
    fn jump_from_rest_returns_to_the_ground() {
        let (mut state, _) = state_with_block_ahead();
        let start = Instant::now();
        let jump = InputIntent {
            jump: true,
            ..Default::default()
        };

        state.tick(&jump, FACING_POS_Z, start);
        assert!(state.avatar.is_jumping);
        assert!(state.avatar.position.y > 0.75);

        let mut frames = 1;
        while state.avatar.is_jumping {
            state.tick(&InputIntent::default(), FACING_POS_Z, start);
            frames += 1;
        }

        assert!((41..=42).contains(&frames));
        assert_eq!(state.avatar.position.y, 0.75);
        assert_eq!(state.avatar.vertical_velocity, 0.2);
    }

    #[test]
    fn merged_intent_keeps_clicks_and_latest_movement() {
        let mut pending = InputIntent {
            move_forward: true,
            primary_pressed: true,
            primary_held: true,
            ..Default::default()
        };
        pending.merge(InputIntent {
            move_left: true,
            primary_released: true,
            ..Default::default()
        });

        assert!(!pending.move_forward);
        assert!(pending.move_left);
        assert!(pending.primary_pressed);
        assert!(pending.primary_released);
        assert!(!pending.primary_held);

        pending.clear_one_shots();
        assert!(pending.move_left);
        assert!(!pending.primary_pressed && !pending.primary_released);
    }
}
