use serde::Serialize;

use crate::keyboard::finger::{FingerAssignment, finger_for_key};

pub const SPACE: &str = "Space";
pub const SHIFT_LEFT: &str = "ShiftLeft";
pub const SHIFT_RIGHT: &str = "ShiftRight";
pub const DEAD_ACUTE: &str = "´";

/// Keys typed with the left hand; their capitals use the right shift.
const LEFT_HAND_KEYS: &[char] = &[
    'Q', 'W', 'E', 'R', 'T', 'A', 'S', 'D', 'F', 'G', 'Z', 'X', 'C', 'V', 'B', '1', '2', '3', '4',
    '5', 'º', '<',
];

/// Shifted symbols on a Spanish ISO layout, by base key.
const SHIFTED: &[(char, char)] = &[
    ('!', '1'),
    ('"', '2'),
    ('·', '3'),
    ('$', '4'),
    ('%', '5'),
    ('&', '6'),
    ('/', '7'),
    ('(', '8'),
    (')', '9'),
    ('=', '0'),
    ('?', '\''),
    ('¿', '¡'),
    (';', ','),
    (':', '.'),
    ('_', '-'),
    ('>', '<'),
    ('ª', 'º'),
];

fn shift_for(base: char) -> &'static str {
    if LEFT_HAND_KEYS.contains(&base) {
        SHIFT_RIGHT
    } else {
        SHIFT_LEFT
    }
}

fn strip_acute(c: char) -> Option<char> {
    let base = match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' => 'u',
        'Á' => 'A',
        'É' => 'E',
        'Í' => 'I',
        'Ó' => 'O',
        'Ú' => 'U',
        _ => return None,
    };
    Some(base)
}

/// Physical keys pressed to produce `symbol`, in press order.
pub fn keys_for_symbol(symbol: char) -> Vec<String> {
    if symbol == ' ' {
        return vec![SPACE.to_string()];
    }

    if let Some(base) = strip_acute(symbol) {
        let upper = base.to_ascii_uppercase();
        return if base.is_uppercase() {
            vec![
                shift_for(upper).to_string(),
                DEAD_ACUTE.to_string(),
                upper.to_string(),
            ]
        } else {
            vec![DEAD_ACUTE.to_string(), upper.to_string()]
        };
    }

    if let Some(&(_, base)) = SHIFTED.iter().find(|(shifted, _)| *shifted == symbol) {
        return vec![base.to_string(), shift_for(base).to_string()];
    }

    let is_upper = symbol.is_uppercase();
    let base: String = symbol.to_uppercase().collect();
    if is_upper {
        let shift = base.chars().next().map(shift_for).unwrap_or(SHIFT_LEFT);
        vec![base, shift.to_string()]
    } else {
        vec![base]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    Expected,
    New,
    Learned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HighlightGroup {
    pub symbols: Vec<char>,
    pub style: HighlightStyle,
}

/// What the virtual keyboard should light up. Decided once, where the
/// request is built, so the renderer never inspects the payload shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum HighlightRequest {
    Clear,
    Single(char),
    Many(Vec<char>),
    Grouped(Vec<HighlightGroup>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HighlightedKey {
    pub key: String,
    pub style: HighlightStyle,
    pub finger: Option<FingerAssignment>,
}

impl HighlightRequest {
    pub fn for_symbol(symbol: char) -> Self {
        HighlightRequest::Single(symbol)
    }

    /// Resolves the request to physical keys. A key listed by several
    /// symbols keeps the style of the first group that named it.
    pub fn keys(&self) -> Vec<HighlightedKey> {
        let groups: Vec<(&[char], HighlightStyle)> = match self {
            HighlightRequest::Clear => Vec::new(),
            HighlightRequest::Single(c) => vec![(std::slice::from_ref(c), HighlightStyle::Expected)],
            HighlightRequest::Many(symbols) => vec![(symbols.as_slice(), HighlightStyle::Expected)],
            HighlightRequest::Grouped(groups) => groups
                .iter()
                .map(|g| (g.symbols.as_slice(), g.style))
                .collect(),
        };

        let mut keys: Vec<HighlightedKey> = Vec::new();
        for (symbols, style) in groups {
            for &symbol in symbols {
                for key in keys_for_symbol(symbol) {
                    if keys.iter().any(|k| k.key == key) {
                        continue;
                    }
                    let finger = finger_for_key(&key);
                    keys.push(HighlightedKey { key, style, finger });
                }
            }
        }
        keys
    }
}
