//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button and motion tracking
//! - Snapshotting the tracked state once per event-loop iteration

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{InputEdges, MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 5] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
];

const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Key edges since the last snapshot
    pub keyboard_edges: InputEdges<KeyCode>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<_, _> = KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<_, _> =
            MOUSE_BUTTONS.iter().map(|&button| (button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            keyboard_edges: InputEdges::default(),
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_button_edges: InputEdges::default(),
                mouse_delta: None,
            },
        }
    }

    /// Copies the current state into the old state to prepare for the next snapshot.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// Key repeats are ignored. Only tracked keys and buttons are recorded.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key_state) = self.keyboard_inputs_new.get_mut(key) {
                    let is_down = *state == ElementState::Pressed;
                    *key_state = is_down;
                    self.keyboard_edges.record(*key, is_down);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button_state) =
                    self.mouse_inputs.mouse_button_inputs_new.get_mut(button)
                {
                    let is_down = *state == ElementState::Pressed;
                    *button_state = is_down;
                    self.mouse_inputs.mouse_button_edges.record(*button, is_down);
                }
            }
            _ => {}
        }
    }

    /// Adds raw mouse motion to the delta accumulated since the last snapshot.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) movement reported by the device
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the tracked state.
    ///
    /// # Returns
    /// A new `ProcessedInputState` with processed input states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            keyboard_edges: self.keyboard_edges.clone(),
            mouse_button_edges: self.mouse_inputs.mouse_button_edges.clone(),
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns the processed input state and resets per-snapshot state.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Starts a new snapshot period: current states become old, edges and
    /// motion are cleared.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.keyboard_edges.clear();
        self.mouse_inputs.mouse_button_edges.clear();
        self.mouse_inputs.mouse_delta = None;
    }

    /// Releases every key and button, as if they had all been let go.
    ///
    /// Called when the window loses focus, since the release events will
    /// never arrive.
    pub fn release_all(&mut self) {
        for (key, state) in self.keyboard_inputs_new.iter_mut() {
            if *state {
                *state = false;
                self.keyboard_edges.record(*key, false);
            }
        }
        for (button, state) in self.mouse_inputs.mouse_button_inputs_new.iter_mut() {
            if *state {
                *state = false;
                self.mouse_inputs.mouse_button_edges.record(*button, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(manager: &mut InputManager, button: MouseButton, is_down: bool) {
        manager.mouse_inputs.mouse_button_inputs_new.insert(button, is_down);
        manager.mouse_inputs.mouse_button_edges.record(button, is_down);
    }

    #[test]
    fn click_between_snapshots_is_seen() {
        let mut manager = InputManager::new();
        press(&mut manager, MouseButton::Right, true);
        press(&mut manager, MouseButton::Right, false);

        let input = manager.get_and_reset_processed_input();

        assert!(input.mouse_button_went_down(MouseButton::Right));
        assert!(input.mouse_button_went_up(MouseButton::Right));
        assert!(!input.get_mouse_button_state(MouseButton::Right).is_active());

        let next = manager.get_and_reset_processed_input();
        assert!(!next.mouse_button_went_up(MouseButton::Right));
    }

    #[test]
    fn held_button_goes_from_pressed_to_held() {
        let mut manager = InputManager::new();
        press(&mut manager, MouseButton::Left, true);

        let first = manager.get_and_reset_processed_input();
        let second = manager.get_and_reset_processed_input();

        assert_eq!(first.get_mouse_button_state(MouseButton::Left), RawInputState::Pressed);
        assert_eq!(second.get_mouse_button_state(MouseButton::Left), RawInputState::Held);
        assert!(!second.mouse_button_went_down(MouseButton::Left));
    }

    #[test]
    fn mouse_motion_accumulates_until_snapshot() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, -1.0));
        manager.intake_mouse_motion((2.0, 4.0));

        let input = manager.get_and_reset_processed_input();
        assert_eq!(input.get_mouse_delta(), Some((5.0, 3.0)));
        assert_eq!(manager.get_and_reset_processed_input().get_mouse_delta(), None);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut manager = InputManager::new();
        manager.keyboard_inputs_new.insert(KeyCode::KeyW, true);
        press(&mut manager, MouseButton::Left, true);
        manager.get_and_reset_processed_input();

        manager.release_all();
        let input = manager.get_and_reset_processed_input();

        assert!(input.get_key_state(KeyCode::KeyW).is_just_released());
        assert!(input.mouse_button_went_up(MouseButton::Left));
        assert!(!input.get_key_state(KeyCode::KeyW).is_active());
    }
}
