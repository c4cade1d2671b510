use std::collections::HashSet;

use super::types::{Key, KeyEvent, KeyState};

/// Keyboard state for the window.
///
/// `keys_down` holds keys from press until release. Every fresh press is
/// also latched in `pressed` until [`take_pressed`](Self::take_pressed)
/// polls it, so a key pressed and released between two frames still reads
/// as pressed exactly once.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Fresh presses not yet polled.
    pressed: HashSet<Key>,
}

impl InputState {
    /// Applies a key event. Returns `true` when it changed the held-key set.
    pub fn apply_key(&mut self, ev: &KeyEvent) -> bool {
        match ev.state {
            KeyState::Pressed => {
                if !ev.repeat {
                    self.pressed.insert(ev.key);
                }
                self.keys_down.insert(ev.key)
            }
            KeyState::Released => self.keys_down.remove(&ev.key),
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Releases are not delivered to unfocused windows.
            self.keys_down.clear();
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns whether `key` was pressed since the last poll, and clears the
    /// latch.
    pub fn take_pressed(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_release_tracks_key() {
        let mut s = InputState::default();
        assert!(s.apply_key(&KeyEvent::pressed(Key::Q)));
        assert!(s.key_down(Key::Q));
        assert!(s.apply_key(&KeyEvent::released(Key::Q)));
        assert!(!s.key_down(Key::Q));
    }

    #[test]
    fn repeat_press_does_not_change_state() {
        let mut s = InputState::default();
        s.apply_key(&KeyEvent::pressed(Key::A));
        let repeat = KeyEvent { repeat: true, ..KeyEvent::pressed(Key::A) };
        assert!(!s.apply_key(&repeat));
        assert!(s.key_down(Key::A));
    }

    #[test]
    fn release_of_unheld_key_is_noop() {
        let mut s = InputState::default();
        assert!(!s.apply_key(&KeyEvent::released(Key::Z)));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        s.set_focused(true);
        s.apply_key(&KeyEvent::pressed(Key::Space));
        s.set_focused(false);
        assert!(s.keys_down.is_empty());
        assert!(!s.focused);
    }

    #[test]
    fn press_released_before_poll_is_seen_once() {
        let mut s = InputState::default();
        s.apply_key(&KeyEvent::pressed(Key::Q));
        s.apply_key(&KeyEvent::released(Key::Q));

        assert!(!s.key_down(Key::Q));
        assert!(s.take_pressed(Key::Q));
        assert!(!s.take_pressed(Key::Q));
    }

    #[test]
    fn repeat_does_not_latch_again() {
        let mut s = InputState::default();
        s.apply_key(&KeyEvent::pressed(Key::A));
        assert!(s.take_pressed(Key::A));

        s.apply_key(&KeyEvent { repeat: true, ..KeyEvent::pressed(Key::A) });
        assert!(!s.take_pressed(Key::A));
    }

    #[test]
    fn release_alone_does_not_latch() {
        let mut s = InputState::default();
        s.apply_key(&KeyEvent::released(Key::Q));
        assert!(!s.take_pressed(Key::Q));
    }
}
