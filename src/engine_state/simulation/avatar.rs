//! # Avatar Kinematics
//!
//! Per-frame movement of the player body. Horizontal motion follows the facing
//! direction flattened onto the ground plane; vertical motion is a fixed-impulse
//! jump decelerated by a constant gravity until the body is back on the ground.
//!
//! All quantities are per frame, not per second. The avatar does not collide
//! with blocks or the world edge.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::config::PlayerConfig;

use super::InputIntent;

/// World up direction.
const UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// The player-controlled body.
#[derive(Debug, Clone)]
pub struct Avatar {
    /// Centre of the body in world space
    pub position: Point3<f32>,
    /// Vertical velocity applied on the next airborne frame
    pub vertical_velocity: f32,
    /// Whether the avatar is in the air
    pub is_jumping: bool,
    params: PlayerConfig,
}

impl Avatar {
    /// Creates an avatar standing at the origin.
    pub fn new(params: PlayerConfig) -> Self {
        Self {
            position: Point3::new(0.0, params.height / 2.0, 0.0),
            vertical_velocity: params.jump_impulse,
            is_jumping: false,
            params,
        }
    }

    pub fn params(&self) -> &PlayerConfig {
        &self.params
    }

    /// Height of the body centre when standing on the ground.
    pub fn ground_height(&self) -> f32 {
        self.params.height / 2.0
    }

    /// Camera position: the top of the body.
    pub fn eye_position(&self) -> Point3<f32> {
        Point3::new(
            self.position.x,
            self.position.y + self.params.height / 2.0,
            self.position.z,
        )
    }

    /// Starts a jump. Ignored while already airborne.
    pub fn request_jump(&mut self) {
        if !self.is_jumping {
            self.is_jumping = true;
            self.vertical_velocity = self.params.jump_impulse;
        }
    }

    /// Advances the avatar by one frame.
    ///
    /// # Arguments
    /// * `intent` - Movement keys held this frame
    /// * `facing` - Unit vector the camera looks along
    pub fn step(&mut self, intent: &InputIntent, facing: Vector3<f32>) {
        let (forward, right) = horizontal_basis(facing);
        let speed = self.params.speed;

        // Each held key contributes on its own; opposite keys are both applied.
        if intent.move_forward {
            self.position += forward * speed;
        }
        if intent.move_backward {
            self.position += forward * -speed;
        }
        if intent.move_left {
            self.position += right * -speed;
        }
        if intent.move_right {
            self.position += right * speed;
        }

        if self.is_jumping {
            self.position.y += self.vertical_velocity;
            self.vertical_velocity -= self.params.gravity;

            let ground = self.ground_height();
            if self.position.y <= ground {
                self.position.y = ground;
                self.is_jumping = false;
                self.vertical_velocity = self.params.jump_impulse;
            }
        }
    }
}

/// Forward and strafe-right directions on the ground plane for a facing vector.
///
/// Forward is the facing vector with its vertical component removed, then
/// normalized. Right is `forward x up`. Looking straight up or down yields zero
/// vectors.
pub fn horizontal_basis(facing: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let forward = normalize_or_zero(Vector3::new(facing.x, 0.0, facing.z));
    let right = normalize_or_zero(forward.cross(UP));
    (forward, right)
}

fn normalize_or_zero(vector: Vector3<f32>) -> Vector3<f32> {
    let magnitude = vector.magnitude();
    if magnitude > 0.0 {
        vector / magnitude
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;
    const FACING_NEG_Z: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

    fn avatar() -> Avatar {
        Avatar::new(PlayerConfig::default())
    }

    fn moved(intent: InputIntent, facing: Vector3<f32>) -> Vector3<f32> {
        let mut avatar = avatar();
        let start = avatar.position;
        avatar.step(&intent, facing);
        avatar.position - start
    }

    #[test]
    fn spawns_standing_on_the_ground() {
        let avatar = avatar();
        assert_eq!(avatar.position, Point3::new(0.0, 0.75, 0.0));
        assert_eq!(avatar.eye_position(), Point3::new(0.0, 1.5, 0.0));
        assert!(!avatar.is_jumping);
    }

    #[test]
    fn forward_follows_facing() {
        let delta = moved(
            InputIntent {
                move_forward: true,
                ..Default::default()
            },
            FACING_NEG_Z,
        );
        assert!((delta - Vector3::new(0.0, 0.0, -0.1)).magnitude() < EPSILON);
    }

    #[test]
    fn right_strafes_to_positive_x_when_facing_negative_z() {
        let right = moved(
            InputIntent {
                move_right: true,
                ..Default::default()
            },
            FACING_NEG_Z,
        );
        let left = moved(
            InputIntent {
                move_left: true,
                ..Default::default()
            },
            FACING_NEG_Z,
        );

        assert!((right - Vector3::new(0.1, 0.0, 0.0)).magnitude() < EPSILON);
        assert!((left - Vector3::new(-0.1, 0.0, 0.0)).magnitude() < EPSILON);
    }

    #[test]
    fn flags_add_without_canceling_logic() {
        let opposed = moved(
            InputIntent {
                move_forward: true,
                move_backward: true,
                ..Default::default()
            },
            FACING_NEG_Z,
        );
        let diagonal = moved(
            InputIntent {
                move_forward: true,
                move_right: true,
                ..Default::default()
            },
            FACING_NEG_Z,
        );

        assert!(opposed.magnitude() < EPSILON);
        assert!((diagonal.magnitude() - 0.1 * 2f32.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn pitch_does_not_change_ground_speed() {
        let facing = Vector3::new(0.0, 0.8, -0.6);
        let delta = moved(
            InputIntent {
                move_forward: true,
                ..Default::default()
            },
            facing,
        );

        assert!(delta.y.abs() < EPSILON);
        assert!((delta.magnitude() - 0.1).abs() < EPSILON);
    }

    #[test]
    fn looking_straight_up_does_not_move() {
        let delta = moved(
            InputIntent {
                move_forward: true,
                move_right: true,
                ..Default::default()
            },
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(delta, Vector3::new(0.0, 0.0, 0.0));
    }

    fn frames_until_landing(avatar: &mut Avatar) -> (usize, f32) {
        let idle = InputIntent::default();
        let mut frames = 0;
        let mut peak = avatar.position.y;
        avatar.request_jump();
        while avatar.is_jumping {
            avatar.step(&idle, FACING_NEG_Z);
            peak = peak.max(avatar.position.y);
            frames += 1;
            assert!(frames < 1000, "avatar never landed");
        }
        (frames, peak)
    }

    #[test]
    fn jump_lands_exactly_on_the_ground() {
        let mut avatar = avatar();
        let (frames, peak) = frames_until_landing(&mut avatar);

        assert!(peak > 0.75 + 1.9);
        assert!((41..=42).contains(&frames));
        assert_eq!(avatar.position.y, 0.75);
        assert_eq!(avatar.vertical_velocity, 0.2);
        assert!(!avatar.is_jumping);

        let (again, _) = frames_until_landing(&mut Avatar::new(PlayerConfig::default()));
        assert_eq!(frames, again);
    }

    #[test]
    fn jumping_again_in_the_air_is_ignored() {
        let mut avatar = avatar();
        avatar.request_jump();
        for _ in 0..5 {
            avatar.step(&InputIntent::default(), FACING_NEG_Z);
        }
        let velocity = avatar.vertical_velocity;
        let height = avatar.position.y;

        avatar.request_jump();

        assert_eq!(avatar.vertical_velocity, velocity);
        assert_eq!(avatar.position.y, height);
        assert!(avatar.is_jumping);
    }

    #[test]
    fn idle_avatar_stays_put() {
        let delta = moved(InputIntent::default(), FACING_NEG_Z);
        assert_eq!(delta, Vector3::new(0.0, 0.0, 0.0));
    }
}
