use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Number of draws taken from the new symbols of a level.
///
/// `floor(count * fraction)`, clamped to what the new symbols can fill
/// while no single symbol exceeds [`max_copies`].
pub fn new_draw_count(count: usize, new_fraction: f64, new_available: usize) -> usize {
    if new_available == 0 {
        return 0;
    }
    let fraction = new_fraction.clamp(0.0, 1.0);
    let share = ((count as f64 * fraction).floor() as usize).min(count);
    share.min(new_available.saturating_mul(max_copies(count)))
}

/// Most copies of one symbol a sequence of `count` can hold with no equal neighbours.
pub fn max_copies(count: usize) -> usize {
    count.div_ceil(2)
}

/// Builds a falling-letter sequence of `count` symbols.
///
/// `new_symbols` are the symbols the level introduces, `pool` everything
/// available up to and including the level. The two draws are mixed in a
/// random order in which no symbol follows itself whenever the mix allows it.
pub fn mix_letters(
    rng: &mut SmallRng,
    new_symbols: &[char],
    pool: &[char],
    count: usize,
    new_fraction: f64,
) -> Vec<char> {
    let pool = if pool.is_empty() { new_symbols } else { pool };
    if pool.is_empty() || count == 0 {
        return Vec::new();
    }

    let new_count = new_draw_count(count, new_fraction, new_symbols.len());
    let limit = max_copies(count);
    let mut drawn = Vec::with_capacity(count);
    draw_without_repeats(rng, new_symbols, new_count, limit, &mut drawn);
    draw_without_repeats(rng, pool, count - new_count, limit, &mut drawn);

    let letters = arrange_without_repeats(rng, &drawn);
    let repeats = letters.windows(2).filter(|w| w[0] == w[1]).count();
    if repeats > 0 {
        debug!(repeats, count, "not enough distinct symbols to avoid repeats");
    }
    letters
}

/// Appends `n` draws from `source`. A draw avoids the previous one and any
/// symbol already holding `limit` copies in `out`, relaxing those rules only
/// when `source` leaves no other choice.
fn draw_without_repeats(rng: &mut SmallRng, source: &[char], n: usize, limit: usize, out: &mut Vec<char>) {
    let mut prev: Option<char> = None;
    for _ in 0..n {
        let under_limit = |c: &char| out.iter().filter(|&&o| o == *c).count() < limit;
        let not_prev = |c: &char| Some(*c) != prev;
        let options: Vec<char> = [
            source.iter().copied().filter(under_limit).filter(not_prev).collect::<Vec<_>>(),
            source.iter().copied().filter(under_limit).collect(),
            source.iter().copied().filter(not_prev).collect(),
            source.to_vec(),
        ]
        .into_iter()
        .find(|options| !options.is_empty())
        .unwrap_or_default();
        let Some(&letter) = options.choose(rng) else {
            return;
        };
        out.push(letter);
        prev = Some(letter);
    }
}

/// Random permutation of `letters` with no equal neighbours, if one exists.
///
/// Symbols are picked one at a time weighted by how many copies are left,
/// skipping any pick after which the rest could no longer be separated.
fn arrange_without_repeats(rng: &mut SmallRng, letters: &[char]) -> Vec<char> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for &letter in letters {
        match counts.iter_mut().find(|(c, _)| *c == letter) {
            Some((_, n)) => *n += 1,
            None => counts.push((letter, 1)),
        }
    }

    let mut out = Vec::with_capacity(letters.len());
    let mut prev: Option<char> = None;
    for remaining in (1..=letters.len()).rev() {
        let available = |i: &usize| counts[*i].1 > 0;
        let differs = |i: &usize| Some(counts[*i].0) != prev;
        let mut candidates: Vec<usize> = (0..counts.len())
            .filter(available)
            .filter(differs)
            .filter(|&i| leaves_separable(&counts, i, remaining))
            .collect();
        if candidates.is_empty() {
            candidates = (0..counts.len()).filter(available).filter(differs).collect();
        }
        if candidates.is_empty() {
            candidates = (0..counts.len()).filter(available).collect();
        }

        let total: usize = candidates.iter().map(|&i| counts[i].1).sum();
        let mut roll = rng.gen_range(0..total);
        let mut pick = candidates[candidates.len() - 1];
        for &i in &candidates {
            if roll < counts[i].1 {
                pick = i;
                break;
            }
            roll -= counts[i].1;
        }

        counts[pick].1 -= 1;
        out.push(counts[pick].0);
        prev = Some(counts[pick].0);
    }
    out
}

/// Whether the letters left after taking one copy of `counts[taken]` can
/// still be ordered with no equal neighbours and without starting on the
/// taken symbol.
fn leaves_separable(counts: &[(char, usize)], taken: usize, remaining: usize) -> bool {
    let rest = remaining - 1;
    counts.iter().enumerate().all(|(i, &(_, n))| {
        if i == taken {
            n - 1 <= rest / 2
        } else {
            n <= rest.div_ceil(2)
        }
    })
}
