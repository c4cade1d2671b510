use lumen_engine::core::AppControl;
use lumen_engine::input::{InputState, Key};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputAction {
    Quit,
    Ignore,
}

/// Maps latched key presses to the demo's actions. Only a press of Q quits.
#[derive(Debug, Copy, Clone)]
pub struct QuitKeys {
    pub quit: Key,
}

impl Default for QuitKeys {
    fn default() -> Self {
        Self { quit: Key::Q }
    }
}

impl QuitKeys {
    /// Consumes a pending press of the quit key.
    pub fn poll(&self, input: &mut InputState) -> InputAction {
        if input.take_pressed(self.quit) {
            InputAction::Quit
        } else {
            InputAction::Ignore
        }
    }
}

pub fn control_for(action: InputAction) -> AppControl {
    match action {
        InputAction::Quit => AppControl::Exit,
        InputAction::Ignore => AppControl::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::input::KeyEvent;

    fn input_after(events: &[KeyEvent]) -> InputState {
        let mut input = InputState::default();
        for ev in events {
            input.apply_key(ev);
        }
        input
    }

    #[test]
    fn q_press_quits_once() {
        let mut input = input_after(&[KeyEvent::pressed(Key::Q)]);
        assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Quit);
        assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Ignore);
    }

    #[test]
    fn q_tapped_between_frames_still_quits() {
        let mut input = input_after(&[KeyEvent::pressed(Key::Q), KeyEvent::released(Key::Q)]);
        assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Quit);
    }

    #[test]
    fn q_release_is_ignored() {
        let mut input = input_after(&[KeyEvent::released(Key::Q)]);
        assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Ignore);
    }

    #[test]
    fn q_repeat_is_ignored() {
        let repeat = KeyEvent { repeat: true, ..KeyEvent::pressed(Key::Q) };
        let mut input = input_after(&[repeat]);
        assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Ignore);
    }

    #[test]
    fn other_keys_are_ignored() {
        for key in [Key::Escape, Key::W, Key::Space, Key::Unknown(7)] {
            let mut input = input_after(&[KeyEvent::pressed(key)]);
            assert_eq!(QuitKeys::default().poll(&mut input), InputAction::Ignore);
        }
    }

    // ── control mapping ───────────────────────────────────────────────────

    #[test]
    fn quit_exits_and_ignore_continues() {
        assert_eq!(control_for(InputAction::Quit), AppControl::Exit);
        assert_eq!(control_for(InputAction::Ignore), AppControl::Continue);
    }
}
