use std::time::Instant;

/// Hit/miss counters plus the clock used for CPM and WPM.
///
/// The clock starts on the first hit, so idle time before the player's first
/// correct keystroke never drags the rates down.
#[derive(Clone, Debug, Default)]
pub struct ScoreTracker {
    hits: u32,
    misses: u32,
    word_count: u32,
    started_at: Option<Instant>,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self) {
        self.add_success_at(Instant::now());
    }

    pub fn add_success_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.hits += 1;
    }

    pub fn add_miss(&mut self) {
        self.misses += 1;
    }

    pub fn add_word(&mut self) {
        self.word_count += 1;
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn cpm(&self, now: Instant) -> u32 {
        self.per_minute(self.hits, now)
    }

    pub fn wpm(&self, now: Instant) -> u32 {
        self.per_minute(self.word_count, now)
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 100.0;
        }
        self.hits as f64 / total as f64 * 100.0
    }

    fn per_minute(&self, count: u32, now: Instant) -> u32 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let elapsed_minutes = now.saturating_duration_since(start).as_millis() as f64 / 60_000.0;
        if elapsed_minutes <= 0.0 {
            return 0;
        }
        (count as f64 / elapsed_minutes).round() as u32
    }
}
