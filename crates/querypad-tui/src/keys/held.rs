use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldKey {
    Control,
    Shift,
    Alt,
    Code(KeyCode),
}

/// Keys currently held down.
///
/// Filled on press, emptied per key on release. Terminals that never report
/// releases still keep the modifier entries right, because every press
/// re-syncs them from the event's modifier flags.
#[derive(Debug, Default)]
pub struct HeldKeys {
    keys: HashSet<HeldKey>,
}

const MODIFIERS: [(KeyModifiers, HeldKey); 3] = [
    (KeyModifiers::CONTROL, HeldKey::Control),
    (KeyModifiers::SHIFT, HeldKey::Shift),
    (KeyModifiers::ALT, HeldKey::Alt),
];

fn modifier_key(code: ModifierKeyCode) -> Option<HeldKey> {
    match code {
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Some(HeldKey::Control),
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some(HeldKey::Shift),
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Some(HeldKey::Alt),
        _ => None,
    }
}

impl HeldKeys {
    pub fn observe(&mut self, key: &KeyEvent) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                for (flag, held) in MODIFIERS {
                    if key.modifiers.contains(flag) {
                        self.keys.insert(held);
                    } else {
                        self.keys.remove(&held);
                    }
                }
                match key.code {
                    KeyCode::Modifier(m) => {
                        if let Some(held) = modifier_key(m) {
                            self.keys.insert(held);
                        }
                    }
                    code => {
                        self.keys.insert(HeldKey::Code(code));
                    }
                }
            }
            KeyEventKind::Release => match key.code {
                KeyCode::Modifier(m) => {
                    if let Some(held) = modifier_key(m) {
                        self.keys.remove(&held);
                    }
                }
                code => {
                    self.keys.remove(&HeldKey::Code(code));
                }
            },
        }
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn release(&mut self, key: HeldKey) {
        self.keys.remove(&key);
    }

    /// Control+Space: jump from the query editor to the lookup box.
    ///
    /// Some terminals deliver Control+Space as a bare NUL.
    pub fn is_jump_chord(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') => self.is_held(HeldKey::Control),
            KeyCode::Null => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_ctrl_space_from_modifier_flags() {
        let mut held = HeldKeys::default();
        let key = event(KeyCode::Char(' '), KeyModifiers::CONTROL, KeyEventKind::Press);
        held.observe(&key);
        assert!(held.is_jump_chord(&key));
    }

    #[test]
    fn test_plain_space_is_not_a_chord() {
        let mut held = HeldKeys::default();
        let key = event(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Press);
        held.observe(&key);
        assert!(!held.is_jump_chord(&key));
    }

    #[test]
    fn test_release_clears_per_key() {
        let mut held = HeldKeys::default();
        held.observe(&event(
            KeyCode::Modifier(ModifierKeyCode::LeftControl),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        ));
        held.observe(&event(KeyCode::Char('a'), KeyModifiers::CONTROL, KeyEventKind::Press));
        assert!(held.is_held(HeldKey::Control));
        assert!(held.is_held(HeldKey::Code(KeyCode::Char('a'))));

        held.observe(&event(KeyCode::Char('a'), KeyModifiers::CONTROL, KeyEventKind::Release));
        assert!(!held.is_held(HeldKey::Code(KeyCode::Char('a'))));
        assert!(held.is_held(HeldKey::Control));

        held.observe(&event(
            KeyCode::Modifier(ModifierKeyCode::LeftControl),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(!held.is_held(HeldKey::Control));
    }

    #[test]
    fn test_explicit_release_after_jump() {
        let mut held = HeldKeys::default();
        let key = event(KeyCode::Char(' '), KeyModifiers::CONTROL, KeyEventKind::Press);
        held.observe(&key);
        held.release(HeldKey::Control);
        assert!(!held.is_jump_chord(&key));
    }

    #[test]
    fn test_nul_counts_as_chord() {
        let held = HeldKeys::default();
        let key = event(KeyCode::Null, KeyModifiers::NONE, KeyEventKind::Press);
        assert!(held.is_jump_chord(&key));
    }
}
