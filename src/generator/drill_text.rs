use rand::Rng;
use rand::rngs::SmallRng;

/// Shape of a repeated-word drill block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatShape {
    pub words_per_group: usize,
    pub groups_per_line: usize,
    pub num_lines: usize,
}

/// Lines of word groups such as `casa casa casa mesa mesa mesa`.
///
/// A word never fills two neighbouring groups of the same line unless the
/// level only has one word.
pub fn repeated_words(rng: &mut SmallRng, words: &[String], shape: RepeatShape) -> String {
    if words.is_empty() || shape.words_per_group == 0 || shape.groups_per_line == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(shape.num_lines);
    for _ in 0..shape.num_lines {
        let mut groups = Vec::with_capacity(shape.groups_per_line);
        let mut prev: Option<usize> = None;
        for _ in 0..shape.groups_per_line {
            let pick = pick_index_except(rng, words.len(), prev);
            groups.push(vec![words[pick].as_str(); shape.words_per_group].join(" "));
            prev = Some(pick);
        }
        lines.push(groups.join(" "));
    }
    lines.join("\n")
}

/// `lines` phrases, one per line, with no phrase on two lines in a row.
pub fn phrase_block(rng: &mut SmallRng, phrases: &[String], lines: usize) -> String {
    if phrases.is_empty() {
        return String::new();
    }
    let mut picked = Vec::with_capacity(lines);
    let mut prev: Option<usize> = None;
    for _ in 0..lines {
        let pick = pick_index_except(rng, phrases.len(), prev);
        picked.push(phrases[pick].as_str());
        prev = Some(pick);
    }
    picked.join("\n")
}

fn pick_index_except(rng: &mut SmallRng, len: usize, except: Option<usize>) -> usize {
    match except {
        Some(skip) if len > 1 => {
            let pick = rng.gen_range(0..len - 1);
            if pick >= skip { pick + 1 } else { pick }
        }
        _ => rng.gen_range(0..len),
    }
}
