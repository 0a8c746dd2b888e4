//! Keyboard contract
//!
//! The host polls its window however it likes and fills a [`KeyboardState`]
//! each frame; this module turns that into simulation commands.

use std::collections::HashSet;

use crate::sim::{GridGlide, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    B,
    C,
    Space,
    Return,
    Right,
    Escape,
}

/// Grid cell the player glides to on the glide key
pub const GLIDE_KEY_TARGET: (i32, i32) = (9, 2);
/// Seconds the glide key's glide takes
pub const GLIDE_KEY_SECONDS: f32 = 1.5;

/// Keys held down plus keys pressed since the previous frame
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    pressed: Vec<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget this frame's presses (held keys stay held)
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// The host should close
    pub fn quit_requested(&self) -> bool {
        self.just_pressed(Key::Escape)
    }

    /// Commands for this frame
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            forward: self.is_held(Key::W),
            backward: self.is_held(Key::S),
            turn_left: self.is_held(Key::A),
            turn_right: self.is_held(Key::D),
            strafe_right: self.is_held(Key::E),
            strafe_left: self.is_held(Key::Q),
            fire: self.just_pressed(Key::Space),
            spawn_ball: self.just_pressed(Key::B),
            spawn_bullet: self.just_pressed(Key::C),
            stop: self.just_pressed(Key::Return),
            grid_glide: self.just_pressed(Key::Right).then_some(GridGlide {
                col: GLIDE_KEY_TARGET.0,
                row: GLIDE_KEY_TARGET.1,
                duration: Some(GLIDE_KEY_SECONDS),
            }),
        }
    }
}
