//! Input-state providers
//!
//! The session only asks two questions per key each frame: is it held, and was
//! it pressed this frame. Anything that can answer them can drive the game.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Restart,
    NewStage,
    Share,
    /// Number keys 0-9
    Digit(u8),
}

/// Per-frame key state queries
pub trait InputSource {
    /// Key is currently down
    fn held(&self, key: Key) -> bool;
    /// Key went down this frame
    fn pressed(&self, key: Key) -> bool;

    /// Gameplay part of this frame's input
    fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.held(Key::Left),
            right: self.held(Key::Right),
            jump: self.pressed(Key::Jump),
            idle_mode: false,
        }
    }
}

/// Keyboard state with press-edge tracking.
///
/// Feed it key events during a frame, read it during `update`, then call
/// [`KeyboardState::end_frame`].
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    down: HashSet<Key>,
    down_last_frame: HashSet<Key>,
    /// Pressed and released within one frame
    tapped: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        if self.down.remove(&key) && !self.down_last_frame.contains(&key) {
            self.tapped.insert(key);
        }
    }

    /// Press and release within the current frame
    pub fn tap(&mut self, key: Key) {
        self.key_down(key);
        self.key_up(key);
    }

    pub fn end_frame(&mut self) {
        self.down_last_frame = self.down.clone();
        self.tapped.clear();
    }
}

impl InputSource for KeyboardState {
    fn held(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn pressed(&self, key: Key) -> bool {
        (self.down.contains(&key) && !self.down_last_frame.contains(&key)) || self.tapped.contains(&key)
    }
}

/// A key change scheduled for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
    Tap(Key),
}

/// Timed key events replayed into a [`KeyboardState`], for scripted play.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    /// (frame, event), applied in order
    events: Vec<(u64, KeyEvent)>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event; events for the same frame apply in insertion order
    pub fn at(mut self, frame: u64, event: KeyEvent) -> Self {
        let pos = self.events.partition_point(|(f, _)| *f <= frame);
        self.events.insert(pos, (frame, event));
        self
    }

    /// Hold `key` from `start` until just before `end`
    pub fn hold(self, key: Key, start: u64, end: u64) -> Self {
        self.at(start, KeyEvent::Down(key)).at(end, KeyEvent::Up(key))
    }

    /// Apply this frame's events
    pub fn apply(&self, frame: u64, keyboard: &mut KeyboardState) {
        for (_, event) in self.events.iter().filter(|(f, _)| *f == frame) {
            match *event {
                KeyEvent::Down(key) => keyboard.key_down(key),
                KeyEvent::Up(key) => keyboard.key_up(key),
                KeyEvent::Tap(key) => keyboard.tap(key),
            }
        }
    }

    /// Last frame with a scheduled event
    pub fn last_frame(&self) -> Option<u64> {
        self.events.last().map(|(f, _)| *f)
    }
}
