//! Polled input for one tick.
//!
//! The simulation never reads devices directly. The world plugin maps the
//! keyboard into an [`InputSnapshot`] each frame; tests build one by hand.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::core::Direction;

/// Abstract player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    Attack,
    FireFlame,
    FrozenBlast,
}

/// Default keyboard bindings.
pub const KEY_BINDINGS: [(KeyCode, InputAction); 11] = [
    (KeyCode::KeyW, InputAction::Up),
    (KeyCode::ArrowUp, InputAction::Up),
    (KeyCode::KeyS, InputAction::Down),
    (KeyCode::ArrowDown, InputAction::Down),
    (KeyCode::KeyA, InputAction::Left),
    (KeyCode::ArrowLeft, InputAction::Left),
    (KeyCode::KeyD, InputAction::Right),
    (KeyCode::ArrowRight, InputAction::Right),
    (KeyCode::Space, InputAction::Attack),
    (KeyCode::KeyJ, InputAction::FireFlame),
    (KeyCode::KeyK, InputAction::FrozenBlast),
];

/// Actions held down and actions newly pressed this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<InputAction>,
    pressed: HashSet<InputAction>,
}

impl InputSnapshot {
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Self {
        let mut snapshot = Self::default();
        for (key, action) in KEY_BINDINGS {
            if keyboard.just_pressed(key) {
                snapshot.press(action);
            } else if keyboard.pressed(key) {
                snapshot.hold(action);
            }
        }
        snapshot
    }

    pub fn hold(&mut self, action: InputAction) -> &mut Self {
        self.held.insert(action);
        self
    }

    /// A press also counts as held.
    pub fn press(&mut self, action: InputAction) -> &mut Self {
        self.held.insert(action);
        self.pressed.insert(action);
        self
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    /// Held movement direction. Down wins over Right, Right over Up, Up
    /// over Left.
    pub fn movement(&self) -> Option<Direction> {
        [
            (InputAction::Down, Direction::Down),
            (InputAction::Right, Direction::Right),
            (InputAction::Up, Direction::Up),
            (InputAction::Left, Direction::Left),
        ]
        .into_iter()
        .find(|(action, _)| self.is_held(*action))
        .map(|(_, direction)| direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_priority() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.movement(), None);

        input.hold(InputAction::Left);
        assert_eq!(input.movement(), Some(Direction::Left));

        input.hold(InputAction::Up);
        assert_eq!(input.movement(), Some(Direction::Up));

        input.hold(InputAction::Right);
        assert_eq!(input.movement(), Some(Direction::Right));

        input.hold(InputAction::Down);
        assert_eq!(input.movement(), Some(Direction::Down));
    }

    #[test]
    fn keyboard_maps_to_actions() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyD);
        keyboard.press(KeyCode::Space);

        let input = InputSnapshot::from_keyboard(&keyboard);
        assert!(input.is_held(InputAction::Right));
        assert!(input.is_pressed(InputAction::Attack));
        assert!(!input.is_held(InputAction::Left));
    }
}
