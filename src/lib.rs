#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Block Sandbox
//!
//! A small first-person block world built with Rust and WGPU, running natively
//! and in the browser (WebAssembly).
//!
//! Walk with W/A/S/D, jump with Space, look around with the mouse once the
//! window has captured it. Hold the left button on a block for 3.5 seconds to
//! break it; release the right button to place a block in front of you.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, graphics bring-up, input and pointer lock
//! * `engine_state` - Simulation, camera and rendering, advanced once per frame
//! * `config` - Tunables loaded from an optional JSON file
//! * `error` - Start-up failures
//!
//! ## Usage
//!
//! ```ignore
//! // Native application initialization
//! fn main() {
//!     if let Err(err) = block_sandbox::run() {
//!         log::error!("{err}");
//!     }
//! }
//! ```
//!
//! For web applications, `run_web` is exported to JavaScript and expects a
//! canvas with the id `wgpu-canvas`.

use application_state::{graphics_resources_builder::GraphicsBuilder, ApplicationState};
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

use winit::event_loop::EventLoop;

#[cfg(not(target_family = "wasm"))]
use log::{info, warn};

mod application_state;
pub mod config;
mod engine_state;
pub mod error;

pub use config::DemoConfig;
pub use error::DemoError;

#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "wgpu-canvas";

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        fn init_logger() -> Result<(), log::SetLoggerError> {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info)
        }
    } else {
        fn init_logger() -> Result<(), log::SetLoggerError> {
            env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init()
        }
    }
}

/// Reads the configuration file, falling back to defaults.
///
/// A missing file is not an error. An unreadable or malformed file is
/// reported and ignored.
#[cfg(not(target_family = "wasm"))]
fn load_config() -> DemoConfig {
    let path = DemoConfig::default_path();
    match DemoConfig::load(&path) {
        Ok(Some(config)) => config,
        Ok(None) => DemoConfig::default(),
        Err(err) => {
            warn!("{err}; using default configuration");
            DemoConfig::default()
        }
    }
}

/// Opens the window and runs the sandbox until it is closed.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> Result<(), DemoError> {
    if init_logger().is_ok() {
        info!("Logger initialized");
    }

    let config = load_config();
    let event_loop = EventLoop::with_user_event().build()?;

    let mut state =
        ApplicationState::new(GraphicsBuilder::new(event_loop.create_proxy()), config);

    event_loop.run_app(&mut state)?;
    Ok(())
}

/// Starts the sandbox in the page's canvas.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() -> Result<(), JsValue> {
    use winit::platform::web::EventLoopExtWebSys;

    init_logger().map_err(|err| JsValue::from_str(&err.to_string()))?;

    let event_loop = EventLoop::with_user_event()
        .build()
        .map_err(|err| JsValue::from_str(&DemoError::from(err).to_string()))?;

    let state = ApplicationState::new(
        GraphicsBuilder::new(event_loop.create_proxy()),
        DemoConfig::default(),
    );

    event_loop.spawn_app(state);
    Ok(())
}
