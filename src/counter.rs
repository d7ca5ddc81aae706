use std::sync::atomic::{AtomicU64, Ordering};

use device_query::Keycode;

/// Global keystroke counter.
///
/// The capture thread increments it while the UI thread reads and resets it,
/// so the value lives in an atomic. The count saturates at `u64::MAX`.
pub struct KeyCounter {
    count: AtomicU64,
}

impl KeyCounter {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    pub fn increment(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                Some(c.saturating_add(1))
            });
    }

    pub fn read(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for KeyCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a key-down counts as a typed character.
///
/// Only keys producing a printable character qualify: letters, digits and
/// punctuation. Space, enter, tab, backspace, modifiers, navigation and
/// function keys do not.
pub fn is_qualifying(key: &Keycode) -> bool {
    matches!(
        key,
        Keycode::A
            | Keycode::B
            | Keycode::C
            | Keycode::D
            | Keycode::E
            | Keycode::F
            | Keycode::G
            | Keycode::H
            | Keycode::I
            | Keycode::J
            | Keycode::K
            | Keycode::L
            | Keycode::M
            | Keycode::N
            | Keycode::O
            | Keycode::P
            | Keycode::Q
            | Keycode::R
            | Keycode::S
            | Keycode::T
            | Keycode::U
            | Keycode::V
            | Keycode::W
            | Keycode::X
            | Keycode::Y
            | Keycode::Z
            | Keycode::Key0
            | Keycode::Key1
            | Keycode::Key2
            | Keycode::Key3
            | Keycode::Key4
            | Keycode::Key5
            | Keycode::Key6
            | Keycode::Key7
            | Keycode::Key8
            | Keycode::Key9
            | Keycode::Grave
            | Keycode::Minus
            | Keycode::Equal
            | Keycode::LeftBracket
            | Keycode::RightBracket
            | Keycode::BackSlash
            | Keycode::Semicolon
            | Keycode::Apostrophe
            | Keycode::Comma
            | Keycode::Dot
            | Keycode::Slash
    )
}
