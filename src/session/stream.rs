use icu_normalizer::ComposingNormalizerBorrowed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// Single symbols for falling mode. Replayed from the start when exhausted.
    Letters,
    /// A block of text typed left to right. Line breaks are layout only.
    Text,
}

/// The expected input for one session. Never changes once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetStream {
    symbols: Vec<char>,
    line_starts: Vec<usize>,
    kind: StreamKind,
}

impl TargetStream {
    pub fn letters<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        let symbols: Vec<char> = symbols
            .into_iter()
            .filter(|&c| c == ' ' || !c.is_control())
            .collect();
        Self {
            line_starts: vec![0],
            symbols,
            kind: StreamKind::Letters,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let normalized = ComposingNormalizerBorrowed::new_nfc().normalize(text);
        let mut symbols = Vec::with_capacity(normalized.len());
        let mut line_starts = vec![0];

        for (i, line) in normalized.lines().enumerate() {
            if i > 0 && line_starts.last() != Some(&symbols.len()) {
                line_starts.push(symbols.len());
            }
            symbols.extend(line.chars().filter(|&c| c == ' ' || !c.is_control()));
        }

        Self {
            symbols,
            line_starts,
            kind: StreamKind::Text,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Index of the first symbol of each displayed line.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    pub fn line_of(&self, index: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= index)
            .saturating_sub(1)
    }

    /// True when the symbol at `index` is the last letter of a word.
    pub fn ends_word(&self, index: usize) -> bool {
        match self.get(index) {
            None | Some(' ') => false,
            Some(_) => {
                let next = index + 1;
                next == self.len()
                    || self.get(next) == Some(' ')
                    || self.line_starts.binary_search(&next).is_ok()
            }
        }
    }

    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }
}
