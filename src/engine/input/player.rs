// Per-player input state management

use super::action::Action;
use std::collections::HashSet;

/// Input state for the controlled character
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this frame (release events)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous frame
    previous_pressed: HashSet<Action>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple frames)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Roll over to the next frame.
    /// Call once per fixed step after the game has consumed the input.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
    }

    /// Horizontal intent: -1 (left), 0 (neutral or both), 1 (right)
    pub fn horizontal(&self) -> f32 {
        axis(
            self.is_pressed(Action::MoveLeft),
            self.is_pressed(Action::MoveRight),
        )
    }

    /// Vertical intent: -1 (down), 0 (neutral or both), 1 (up)
    pub fn vertical(&self) -> f32 {
        axis(self.is_pressed(Action::AimDown), self.is_pressed(Action::AimUp))
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}
