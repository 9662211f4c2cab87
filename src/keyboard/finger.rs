use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerAssignment {
    pub hand: Hand,
    pub finger: Finger,
}

impl FingerAssignment {
    pub fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }
}

/// Finger for a physical key on a Spanish ISO board, by key label
/// (`"A"`, `"Ñ"`, `"Space"`, `"ShiftLeft"`, `"´"`, ...).
pub fn finger_for_key(key: &str) -> Option<FingerAssignment> {
    use Finger::*;
    use Hand::*;

    let assignment = match key {
        "Q" | "A" | "Z" | "1" | "º" | "<" | "Tab" | "ShiftLeft" => FingerAssignment::new(Left, Pinky),
        "W" | "S" | "X" | "2" => FingerAssignment::new(Left, Ring),
        "E" | "D" | "C" | "3" => FingerAssignment::new(Left, Middle),
        "R" | "F" | "V" | "T" | "G" | "B" | "4" | "5" => FingerAssignment::new(Left, Index),
        "Y" | "H" | "N" | "U" | "J" | "M" | "6" | "7" => FingerAssignment::new(Right, Index),
        "I" | "K" | "," | "8" => FingerAssignment::new(Right, Middle),
        "O" | "L" | "." | "9" => FingerAssignment::new(Right, Ring),
        "P" | "Ñ" | "0" | "'" | "¡" | "´" | "`" | "+" | "Ç" | "-" | "Enter" | "Backspace"
        | "ShiftRight" => FingerAssignment::new(Right, Pinky),
        "Space" => FingerAssignment::new(Right, Thumb),
        _ => return None,
    };
    Some(assignment)
}
