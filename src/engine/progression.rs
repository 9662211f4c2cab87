use serde::{Deserialize, Serialize};

use crate::generator::ContentProvider;
use crate::session::Mode;

pub const FIRST_LEVEL: u32 = 1;

/// Where the player is in the curriculum. Only changes between sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    pub mode: Mode,
}

impl LevelState {
    pub fn new(level: u32, mode: Mode) -> Self {
        Self {
            level: level.max(FIRST_LEVEL),
            mode,
        }
    }

    pub fn first() -> Self {
        Self::new(FIRST_LEVEL, Mode::Falling)
    }
}

impl Default for LevelState {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progression {
    Next(LevelState),
    EndOfContent,
}

/// Falling at level L leads to text at L; text at L leads to falling at L + 1
/// unless the curriculum has nothing for L + 1.
pub fn next<P: ContentProvider + ?Sized>(finished: LevelState, provider: &mut P) -> Progression {
    match finished.mode {
        Mode::Falling => Progression::Next(LevelState::new(finished.level, Mode::Text)),
        Mode::Text => match finished.level.checked_add(1) {
            Some(level) if provider.has_content(level) => {
                Progression::Next(LevelState::new(level, Mode::Falling))
            }
            _ => Progression::EndOfContent,
        },
    }
}
