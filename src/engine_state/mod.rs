//! # Engine State Module
//!
//! The frame driver of the sandbox.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the game state and the renderer, runs one frame per redraw
//! * `SandboxState` - Everything a frame advances that does not touch the GPU
//! * `buffer_state` - Named GPU buffers
//! * `camera_state` - Mouse look and the view/projection matrices
//! * `rendering` - Surface, pipeline and scene instances
//! * `simulation` - Avatar movement, look target, breaking and placing
//! * `voxels` - Blocks and the world that stores them
//!
//! ## Frame order
//!
//! 1. Apply the mouse motion gathered since the last frame
//! 2. Tick the simulation with the pending intent
//! 3. Move the eye to the avatar
//! 4. Mirror world changes into the scene
//! 5. Draw

use camera_state::CameraState;
use log::{debug, info};
use rendering::{Scene, SceneRenderer};
use simulation::{InputIntent, SimulationState, WorldEvent};
use web_time::Instant;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{application_state::input_state::ProcessedInputState, config::DemoConfig};

mod buffer_state;
mod camera_state;
mod rendering;
pub mod simulation;
pub mod voxels;

/// Translates a snapshot of the input devices into player intent.
///
/// W/S/A/D move, Space jumps, the left button breaks and the right button
/// places on release.
pub fn translate_processed_input(input: &ProcessedInputState) -> InputIntent {
    InputIntent {
        move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
        move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
        move_left: input.get_key_state(KeyCode::KeyA).is_active(),
        move_right: input.get_key_state(KeyCode::KeyD).is_active(),
        jump: input.get_key_state(KeyCode::Space).is_active() || input.key_went_down(KeyCode::Space),
        primary_pressed: input.mouse_button_went_down(MouseButton::Left),
        primary_released: input.mouse_button_went_up(MouseButton::Left),
        primary_held: input.get_mouse_button_state(MouseButton::Left).is_active(),
        secondary_released: input.mouse_button_went_up(MouseButton::Right),
    }
}

/// Game state advanced by each frame: simulation, camera and the input not
/// yet consumed.
pub struct SandboxState {
    pub camera_state: CameraState,
    pub simulation: SimulationState,
    pending_intent: InputIntent,
    pending_mouse_delta: Option<(f64, f64)>,
}

impl SandboxState {
    /// Creates the game state with a freshly generated world.
    ///
    /// # Arguments
    /// * `config` - Tunables for every subsystem
    /// * `width` - Surface width in pixels
    /// * `height` - Surface height in pixels
    pub fn new(config: &DemoConfig, width: u32, height: u32) -> Self {
        Self::with_simulation(config, SimulationState::new(config), width, height)
    }

    pub fn with_simulation(
        config: &DemoConfig,
        simulation: SimulationState,
        width: u32,
        height: u32,
    ) -> Self {
        let camera_state = CameraState::new(
            &config.camera,
            simulation.avatar.eye_position(),
            width,
            height,
        );

        Self {
            camera_state,
            simulation,
            pending_intent: InputIntent::default(),
            pending_mouse_delta: None,
        }
    }

    /// Queues an input snapshot for the next frame.
    ///
    /// Several snapshots may arrive between two frames; clicks and mouse motion
    /// from all of them are kept.
    pub fn set_input_commands(&mut self, input: &ProcessedInputState) {
        self.pending_intent.merge(translate_processed_input(input));

        if let Some((x, y)) = input.get_mouse_delta() {
            let (old_x, old_y) = self.pending_mouse_delta.unwrap_or((0.0, 0.0));
            self.pending_mouse_delta = Some((old_x + x, old_y + y));
        }
    }

    /// Runs the non-rendering part of a frame.
    ///
    /// # Returns
    /// The world changes made during the frame
    pub fn advance(&mut self, now: Instant) -> Vec<WorldEvent> {
        self.camera_state
            .intake_mouse_delta(self.pending_mouse_delta.take());
        let facing = self.camera_state.facing();

        let events = self.simulation.tick(&self.pending_intent, facing, now);
        self.pending_intent.clear_one_shots();

        for event in &events {
            debug!("World changed: {event:?}, {} blocks", self.simulation.world.len());
        }

        self.camera_state
            .follow(self.simulation.avatar.eye_position());
        events
    }
}

/// The main state container: game state plus the renderer that draws it.
pub struct EngineState {
    pub sandbox: SandboxState,
    pub render_manager: SceneRenderer,
}

impl EngineState {
    /// Creates the engine for an already configured surface.
    ///
    /// # Arguments
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `config` - Tunables for every subsystem
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &DemoConfig,
    ) -> Self {
        let mut sandbox = SandboxState::new(config, surface_config.width, surface_config.height);
        info!(
            "Generated world with {} blocks",
            sandbox.simulation.world.len()
        );

        let scene = Scene::new(&sandbox.simulation.world, config.world.ground_size);
        let camera_uniform = *sandbox.camera_state.update_uniform();
        let render_manager =
            SceneRenderer::new(surface, surface_config, device, queue, &camera_uniform, scene);

        Self {
            sandbox,
            render_manager,
        }
    }

    /// Resizes the rendering surface when the window size changes.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if self.render_manager.resize_surface(size) {
            self.sandbox.camera_state.resize(size.width, size.height);
        }
    }

    /// Turns mouse look on or off with the pointer lock.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.sandbox.camera_state.set_look_enabled(locked);
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.sandbox.camera_state.is_look_enabled()
    }

    /// Sets the input commands for the next frame.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.sandbox.set_input_commands(&input);
    }

    /// Advances the game by one frame and draws it.
    pub fn frame(&mut self, now: Instant) {
        let events = self.sandbox.advance(now);

        let camera_uniform = *self.sandbox.camera_state.update_uniform();
        self.render_manager.update_camera(&camera_uniform);
        self.render_manager
            .apply_world_events(&events, &self.sandbox.simulation.world);
        self.render_manager.render(&self.sandbox.simulation, now);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cgmath::{InnerSpace, Point3};
    use web_time::Duration;

    use super::*;
    use crate::{
        application_state::input_state::{InputEdges, RawInputState},
        engine_state::voxels::{block::BlockKind, world::World},
    };

    fn snapshot(
        keys: &[(KeyCode, RawInputState)],
        buttons: &[(MouseButton, RawInputState)],
    ) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect::<HashMap<_, _>>(),
            mouse_button_states: buttons.iter().copied().collect::<HashMap<_, _>>(),
            keyboard_edges: InputEdges::default(),
            mouse_button_edges: InputEdges::default(),
            mouse_delta: None,
        }
    }

    fn sandbox_with_block_ahead() -> SandboxState {
        let config = DemoConfig::default();
        let mut world = World::new();
        world.add_block(Point3::new(0, 0, -2), BlockKind::Breakable);
        SandboxState::with_simulation(&config, SimulationState::with_world(&config, world), 800, 600)
    }

    #[test]
    fn keys_and_buttons_map_to_intent() {
        let input = snapshot(
            &[
                (KeyCode::KeyW, RawInputState::Held),
                (KeyCode::KeyD, RawInputState::Pressed),
                (KeyCode::KeyA, RawInputState::Released),
                (KeyCode::Space, RawInputState::Pressed),
            ],
            &[
                (MouseButton::Left, RawInputState::Pressed),
                (MouseButton::Right, RawInputState::Released),
            ],
        );

        let intent = translate_processed_input(&input);

        assert!(intent.move_forward && intent.move_right && intent.jump);
        assert!(!intent.move_left && !intent.move_backward);
        assert!(intent.primary_pressed && intent.primary_held);
        assert!(!intent.primary_released);
        assert!(intent.secondary_released);
    }

    #[test]
    fn click_between_frames_reaches_the_simulation() {
        let mut sandbox = sandbox_with_block_ahead();
        let start = Instant::now();
        sandbox.advance(start);

        let mut click = snapshot(&[], &[]);
        click.mouse_button_edges.record(MouseButton::Right, true);
        click.mouse_button_edges.record(MouseButton::Right, false);
        sandbox.set_input_commands(&click);
        sandbox.set_input_commands(&snapshot(&[], &[]));

        let events = sandbox.advance(start + Duration::from_millis(16));
        assert!(matches!(events.as_slice(), [WorldEvent::Added(_)]));

        // Consumed: the next frame places nothing.
        assert!(sandbox.advance(start + Duration::from_millis(32)).is_empty());
    }

    #[test]
    fn eye_follows_the_avatar_each_frame() {
        let mut sandbox = sandbox_with_block_ahead();
        sandbox.set_input_commands(&snapshot(&[(KeyCode::KeyS, RawInputState::Pressed)], &[]));
        sandbox.advance(Instant::now());

        let eye = sandbox.camera_state.camera.position;
        assert_eq!(eye, sandbox.simulation.avatar.eye_position());
        assert!((eye.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn mouse_motion_turns_the_view_only_when_locked() {
        let mut sandbox = sandbox_with_block_ahead();
        let mut motion = snapshot(&[], &[]);
        motion.mouse_delta = Some((400.0, 0.0));

        sandbox.set_input_commands(&motion);
        sandbox.advance(Instant::now());
        assert!((sandbox.camera_state.facing() - cgmath::Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);

        sandbox.camera_state.set_look_enabled(true);
        sandbox.set_input_commands(&motion);
        sandbox.advance(Instant::now());
        assert!(sandbox.camera_state.facing().x > 0.5);
    }
}
