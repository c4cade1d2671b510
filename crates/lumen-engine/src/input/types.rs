/// Keyboard key identifier.
///
/// Covers the keys a demo binds. Everything else maps to `Key::Unknown`
/// carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// One keyboard transition.
///
/// `repeat` is set for auto-repeat presses generated while a key is held.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    pub repeat: bool,
}

impl KeyEvent {
    pub const fn pressed(key: Key) -> Self {
        Self { key, state: KeyState::Pressed, repeat: false }
    }

    pub const fn released(key: Key) -> Self {
        Self { key, state: KeyState::Released, repeat: false }
    }

    /// True for a fresh press (not a release, not an auto-repeat).
    #[inline]
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Pressed && !self.repeat
    }
}
