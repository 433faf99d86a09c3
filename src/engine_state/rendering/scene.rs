//! Scene contents as box instances.
//!
//! `Scene` keeps one instance per block, kept in step with the world through
//! `WorldEvent`s, and adds the ground slab and the avatar body when a frame's
//! instance list is assembled.

use web_time::Instant;

use crate::engine_state::{
    simulation::{SimulationState, WorldEvent},
    voxels::{block::{Block, BlockId}, world::World},
};

use super::vertex::Instance;

/// 0x228B22
const GROUND_COLOR: [f32; 4] = [0.133, 0.545, 0.133, 1.0];
/// 0x00FF00
const AVATAR_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
/// The ground is a slab whose top face is y = 0.
const GROUND_THICKNESS: f32 = 0.1;
/// Share of a block's brightness lost at full break progress.
const BREAK_DARKENING: f32 = 0.6;

/// Converts an sRGB colour to the linear space the shader works in.
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    let channel = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(color[0]), channel(color[1]), channel(color[2]), color[3]]
}

fn block_instance(block: &Block) -> Instance {
    let center = block.center();
    let size = Block::HALF_EXTENT * 2.0;
    Instance {
        offset: center.into(),
        scale: [size, size, size],
        color: srgb_to_linear(block.kind.base_color()),
    }
}

/// The drawable contents of the world.
#[derive(Debug)]
pub struct Scene {
    ground: Instance,
    blocks: Vec<(BlockId, Instance)>,
}

impl Scene {
    /// Creates a scene mirroring every block currently in `world`.
    ///
    /// # Arguments
    /// * `world` - The world to mirror
    /// * `ground_size` - Edge length of the square ground plane
    pub fn new(world: &World, ground_size: f32) -> Self {
        let ground = Instance {
            offset: [0.0, -GROUND_THICKNESS / 2.0, 0.0],
            scale: [ground_size, GROUND_THICKNESS, ground_size],
            color: srgb_to_linear(GROUND_COLOR),
        };
        let blocks = world
            .blocks()
            .map(|block| (block.id, block_instance(block)))
            .collect();

        Self { ground, blocks }
    }

    /// Applies the world changes of one frame.
    pub fn apply_events(&mut self, events: &[WorldEvent], world: &World) {
        for event in events {
            match *event {
                WorldEvent::Added(id) => match world.get_block(id) {
                    Some(block) => self.blocks.push((id, block_instance(block))),
                    None => log::warn!("Added block {id:?} is not in the world"),
                },
                WorldEvent::Removed(id) => self.blocks.retain(|(block_id, _)| *block_id != id),
            }
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Builds the instance list for one frame: ground, avatar, then blocks.
    ///
    /// The targeted block darkens as breaking progresses.
    pub fn instances(&self, simulation: &SimulationState, now: Instant) -> Vec<Instance> {
        let mut instances = Vec::with_capacity(self.blocks.len() + 2);
        instances.push(self.ground);

        let avatar = &simulation.avatar;
        let params = avatar.params();
        instances.push(Instance {
            offset: avatar.position.into(),
            scale: [params.width, params.height, params.width],
            color: srgb_to_linear(AVATAR_COLOR),
        });

        let target = simulation.look.target;
        let brightness = 1.0 - BREAK_DARKENING * simulation.break_progress(now);
        instances.extend(self.blocks.iter().map(|(id, instance)| {
            let mut instance = *instance;
            if Some(*id) == target {
                for channel in &mut instance.color[..3] {
                    *channel *= brightness;
                }
            }
            instance
        }));

        instances
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};
    use web_time::Duration;

    use super::*;
    use crate::{
        config::DemoConfig,
        engine_state::{simulation::InputIntent, voxels::block::BlockKind},
    };

    fn simulation() -> SimulationState {
        let mut world = World::new();
        world.add_block(Point3::new(0, 0, -2), BlockKind::Breakable);
        world.add_block(Point3::new(3, 0, 3), BlockKind::Breakable);
        SimulationState::with_world(&DemoConfig::default(), world)
    }

    #[test]
    fn scene_holds_ground_avatar_and_every_block() {
        let simulation = simulation();
        let scene = Scene::new(&simulation.world, 50.0);
        let instances = scene.instances(&simulation, Instant::now());

        assert_eq!(instances.len(), 4);
        assert_eq!(instances[0].scale, [50.0, GROUND_THICKNESS, 50.0]);
        assert_eq!(instances[0].offset[1] + GROUND_THICKNESS / 2.0, 0.0);
        assert_eq!(instances[1].scale, [0.5, 1.5, 0.5]);
        assert_eq!(instances[2].offset, [0.0, 0.5, -2.0]);
    }

    #[test]
    fn world_events_keep_the_scene_in_step() {
        let mut simulation = simulation();
        let mut scene = Scene::new(&simulation.world, 50.0);
        let start = Instant::now();
        let facing = Vector3::new(0.0, 0.0, -1.0);

        let press = InputIntent {
            primary_pressed: true,
            primary_held: true,
            ..Default::default()
        };
        let hold = InputIntent {
            primary_held: true,
            ..Default::default()
        };
        let place = InputIntent {
            secondary_released: true,
            ..Default::default()
        };

        let events = simulation.tick(&press, facing, start);
        scene.apply_events(&events, &simulation.world);
        let events = simulation.tick(&place, facing, start + Duration::from_millis(16));
        scene.apply_events(&events, &simulation.world);
        assert_eq!(scene.block_count(), 3);

        let events = simulation.tick(&hold, facing, start + Duration::from_secs(4));
        scene.apply_events(&events, &simulation.world);
        assert_eq!(scene.block_count(), simulation.world.len());
    }

    #[test]
    fn targeted_block_darkens_while_breaking() {
        let mut simulation = simulation();
        let scene = Scene::new(&simulation.world, 50.0);
        let start = Instant::now();
        let press = InputIntent {
            primary_pressed: true,
            primary_held: true,
            ..Default::default()
        };
        simulation.tick(&press, Vector3::new(0.0, 0.0, -1.0), start);

        let fresh = scene.instances(&simulation, start);
        let halfway = scene.instances(&simulation, start + Duration::from_millis(1750));

        assert_eq!(fresh[2].color, srgb_to_linear(BlockKind::Breakable.base_color()));
        assert!(halfway[2].color[0] < fresh[2].color[0]);
        // The other block is untouched.
        assert_eq!(halfway[3].color, fresh[3].color);
    }

    #[test]
    fn srgb_conversion_keeps_the_endpoints() {
        assert_eq!(srgb_to_linear([0.0, 1.0, 0.0, 0.5]), [0.0, 1.0, 0.0, 0.5]);
    }
}
