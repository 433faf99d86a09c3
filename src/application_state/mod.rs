//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling and pointer lock
//! - Application lifecycle events
//! - State transitions between initialization and running states

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{config::DemoConfig, engine_state::EngineState};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics resources,
/// input handling, and window management. It implements `ApplicationHandler` to handle
/// window and device events.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready, or moved into the engine
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Cached window size for web platforms during initialization
    pub web_window_size: Option<PhysicalSize<u32>>,

    config: DemoConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The game and the renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,
}

impl InitializedApplicationState {
    /// Grabs and hides the cursor, enabling mouse look.
    ///
    /// Tries a locked cursor first and falls back to one confined to the window.
    fn lock_pointer(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.engine_state.set_pointer_locked(true);
                info!("Pointer locked");
            }
            Err(err) => warn!("Could not grab the cursor: {err}"),
        }
    }

    /// Releases the cursor and stops mouse look.
    fn unlock_pointer(&mut self) {
        if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Could not release the cursor: {err}");
        }
        self.window.set_cursor_visible(true);
        self.engine_state.set_pointer_locked(false);
        info!("Pointer unlocked");
    }
}

impl ApplicationState {
    /// Creates the application in its initial, graphics-building state.
    pub fn new(graphics_builder: GraphicsBuilder, config: DemoConfig) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(graphics_builder),
            state: None,
            web_window_size: None,
            config,
        }
    }

    /// Handles window resize events during the initialization phase.
    ///
    /// Configures the surface with its first real size and starts the
    /// application.
    fn resized(&mut self, size: PhysicalSize<u32>) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
        gfx.is_surface_configured = true;
        self.initialize_application_state();
    }

    /// Moves the graphics resources into a new engine and starts running.
    fn initialize_application_state(&mut self) {
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return;
        };

        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            ..
        } = gfx;
        let engine_state = EngineState::new(surface, surface_config, device, queue, &self.config);
        info!("Click the window to capture the mouse, Escape to release it");

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
        });
    }
}

fn is_escape_press(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::KeyboardInput {
            event: KeyEvent {
                state: ElementState::Pressed,
                physical_key: PhysicalKey::Code(KeyCode::Escape),
                repeat: false,
                ..
            },
            ..
        }
    )
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.state.is_none() {
            match event {
                WindowEvent::Resized(size) => {
                    self.web_window_size = Some(size);
                    self.resized(size);
                }
                WindowEvent::CloseRequested => event_loop.exit(),
                _ => {
                    if is_escape_press(&event) {
                        event_loop.exit();
                    }
                }
            }
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        if is_escape_press(&event) {
            if state.engine_state.is_pointer_locked() {
                state.unlock_pointer();
            } else {
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                if !is_focused {
                    state.input_manager.release_all();
                    if state.engine_state.is_pointer_locked() {
                        state.unlock_pointer();
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !state.engine_state.is_pointer_locked() {
                    state.lock_pointer();
                }
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.frame(web_time::Instant::now());
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    /// Handles device-level input events such as mouse motion.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Starts graphics initialization the first time the application resumes.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the result of graphics initialization.
    ///
    /// A failure is logged and ends the application.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                error!("Graphics initialization failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let is_surface_configured = graphics.is_surface_configured;
        self.graphics = MaybeGraphics::Graphics(graphics);

        if is_surface_configured {
            self.initialize_application_state();
        } else if let Some(size) = self.web_window_size {
            self.resized(size);
        }
    }

    /// Snapshots the input gathered this iteration and asks for the next frame.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.engine_state.set_input_commands(processed_input);
            state.window.request_redraw();
        }
    }
}
