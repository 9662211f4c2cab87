use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// A raw key event classified once at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// A typed symbol, including the literal space.
    Symbol(char),
    /// Shift, Alt, Control, Meta, CapsLock or a dead key on its own.
    Modifier,
    /// Anything else: empty names, navigation keys, key releases.
    Ignored,
}

const MODIFIER_NAMES: &[&str] = &[
    "Shift",
    "Alt",
    "AltGraph",
    "Control",
    "Meta",
    "OS",
    "CapsLock",
    "Dead",
    "Fn",
];

impl KeyInput {
    /// Classifies a DOM-style key name such as `"a"`, `" "`, `"Shift"` or `"Dead"`.
    pub fn from_key_name(name: &str) -> Self {
        if MODIFIER_NAMES.contains(&name) {
            return KeyInput::Modifier;
        }
        if name == "Space" || name == "Spacebar" {
            return KeyInput::Symbol(' ');
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c == ' ' || !c.is_control() => KeyInput::Symbol(c),
            _ => KeyInput::Ignored,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            KeyInput::Symbol(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<char> for KeyInput {
    fn from(c: char) -> Self {
        if c == ' ' || !c.is_control() {
            KeyInput::Symbol(c)
        } else {
            KeyInput::Ignored
        }
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyInput::Ignored;
        }
        match key.code {
            KeyCode::Char(c) => KeyInput::from(c),
            KeyCode::Modifier(_) | KeyCode::CapsLock => KeyInput::Modifier,
            _ => KeyInput::Ignored,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
}
