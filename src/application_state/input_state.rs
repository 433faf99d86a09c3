//! # Input State
//!
//! This module defines the input state types used by the input manager.
//! It provides enums and structs for representing the state of input devices.

use std::collections::{HashMap, HashSet};
use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Derives the transition from the previous and current down states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Presses and releases seen between two snapshots.
///
/// A button pressed and released before the next snapshot looks untouched when
/// only the old and new down states are compared, so every edge is recorded.
#[derive(Debug, Clone)]
pub struct InputEdges<T: std::hash::Hash + Eq> {
    pub pressed: HashSet<T>,
    pub released: HashSet<T>,
}

impl<T: std::hash::Hash + Eq> Default for InputEdges<T> {
    fn default() -> Self {
        Self {
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: std::hash::Hash + Eq> InputEdges<T> {
    pub fn record(&mut self, input: T, is_down: bool) {
        if is_down {
            self.pressed.insert(input);
        } else {
            self.released.insert(input);
        }
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

/// A snapshot of the processed input states with state transitions.
///
/// This struct provides access to the processed state of all input devices,
/// with key and button states translated into RawInputState enum values.
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Current state of mouse buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,

    /// Key edges since the previous snapshot
    pub keyboard_edges: InputEdges<KeyCode>,

    /// Mouse button edges since the previous snapshot
    pub mouse_button_edges: InputEdges<MouseButton>,

    /// Accumulated mouse movement since the previous snapshot (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the state of a mouse button
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Whether the key went down at any point since the previous snapshot
    pub fn key_went_down(&self, key: KeyCode) -> bool {
        self.get_key_state(key).is_just_pressed() || self.keyboard_edges.pressed.contains(&key)
    }

    /// Whether the button went down at any point since the previous snapshot
    pub fn mouse_button_went_down(&self, button: MouseButton) -> bool {
        self.get_mouse_button_state(button).is_just_pressed()
            || self.mouse_button_edges.pressed.contains(&button)
    }

    /// Whether the button went up at any point since the previous snapshot
    pub fn mouse_button_went_up(&self, button: MouseButton) -> bool {
        self.get_mouse_button_state(button).is_just_released()
            || self.mouse_button_edges.released.contains(&button)
    }

    /// Gets the mouse movement delta since the last snapshot
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

/// Tracks the state of mouse buttons and movement.
pub struct MouseInput {
    /// Previous state of each mouse button (pressed/released)
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Current state of each mouse button (pressed/released)
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,

    /// Button edges since the last snapshot
    pub mouse_button_edges: InputEdges<MouseButton>,

    /// Mouse movement accumulated since the last snapshot (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}
