use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ContentError;
use crate::generator::ContentProvider;
use crate::generator::drill_text::{self, RepeatShape};
use crate::generator::letters;

#[derive(Embed)]
#[folder = "assets/levels/"]
struct LevelAssets;

pub const DEFAULT_NEW_SYMBOL_FRACTION: f64 = 0.4;

/// How the text-mode block of a level is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum TextStyle {
    RepeatedWords {
        words_per_group: usize,
        groups_per_line: usize,
        num_lines: usize,
    },
    Phrases {
        lines: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: u32,
    pub name: String,
    pub new_letters: Vec<char>,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    pub text: TextStyle,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct CurriculumFile {
    name: String,
    #[serde(default)]
    levels: Vec<LevelDefinition>,
}

/// A level table plus the randomness used to draw content from it.
pub struct Curriculum {
    name: String,
    levels: Vec<LevelDefinition>,
    new_symbol_fraction: f64,
    rng: SmallRng,
}

impl Curriculum {
    /// Looks in the user config dir first, then in the bundled set.
    pub fn load(name: &str) -> Result<Self, ContentError> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir
                .join("keyfall")
                .join("levels")
                .join(format!("{name}.toml"));
            if user_path.exists() {
                match Self::from_path(&user_path) {
                    Ok(curriculum) => return Ok(curriculum),
                    Err(err) => {
                        warn!(path = %user_path.display(), %err, "ignoring user curriculum");
                    }
                }
            }
        }
        Self::bundled(name)
    }

    pub fn bundled(name: &str) -> Result<Self, ContentError> {
        let filename = format!("{name}.toml");
        let file = LevelAssets::get(&filename)
            .ok_or_else(|| ContentError::MissingCurriculum(name.to_string()))?;
        let content = std::str::from_utf8(file.data.as_ref())?;
        Self::from_toml_str(content)
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ContentError> {
        let file: CurriculumFile = toml::from_str(content)?;
        let mut levels = file.levels;
        levels.sort_by_key(|l| l.level);
        debug!(name = %file.name, levels = levels.len(), "curriculum loaded");
        Ok(Self {
            name: file.name,
            levels,
            new_symbol_fraction: DEFAULT_NEW_SYMBOL_FRACTION,
            rng: SmallRng::from_entropy(),
        })
    }

    pub fn available() -> Vec<String> {
        LevelAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_new_symbol_fraction(mut self, fraction: f64) -> Self {
        self.new_symbol_fraction = fraction;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn level(&self, level: u32) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.level == level)
    }

    pub fn last_level(&self) -> Option<u32> {
        self.levels.last().map(|l| l.level)
    }
}

impl ContentProvider for Curriculum {
    fn letters_for_falling(&mut self, level: u32, count: usize) -> Vec<char> {
        if self.level(level).is_none() {
            return Vec::new();
        }
        let new_symbols = self.new_symbols_for_level(level);
        let pool = self.learned_symbols_up_to(level);
        let letters = letters::mix_letters(
            &mut self.rng,
            &new_symbols,
            &pool,
            count,
            self.new_symbol_fraction,
        );
        debug!(level, count = letters.len(), "falling letters generated");
        letters
    }

    fn text_for_level(&mut self, level: u32) -> String {
        let Some(definition) = self.levels.iter().find(|l| l.level == level) else {
            return String::new();
        };
        let text = match definition.text {
            TextStyle::RepeatedWords {
                words_per_group,
                groups_per_line,
                num_lines,
            } => drill_text::repeated_words(
                &mut self.rng,
                &definition.words,
                RepeatShape {
                    words_per_group,
                    groups_per_line,
                    num_lines,
                },
            ),
            TextStyle::Phrases { lines } => {
                drill_text::phrase_block(&mut self.rng, &definition.phrases, lines)
            }
        };
        if text.is_empty() {
            warn!(level, "level has no material for text mode");
        }
        text
    }

    fn new_symbols_for_level(&self, level: u32) -> Vec<char> {
        self.level(level)
            .map(|l| l.new_letters.clone())
            .unwrap_or_default()
    }

    fn learned_symbols_up_to(&self, level: u32) -> Vec<char> {
        let mut learned: Vec<char> = Vec::new();
        for definition in self.levels.iter().filter(|l| l.level <= level) {
            for &letter in &definition.new_letters {
                if !learned.contains(&letter) {
                    learned.push(letter);
                }
            }
        }
        learned
    }

    fn has_content(&mut self, level: u32) -> bool {
        self.level(level).is_some() && !self.learned_symbols_up_to(level).is_empty()
    }
}
