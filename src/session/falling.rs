use std::time::Duration;

/// The one symbol currently on screen in falling mode.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingSymbol {
    pub index: usize,
    pub symbol: char,
    distance: f64,
}

impl FallingSymbol {
    pub fn spawn(index: usize, symbol: char) -> Self {
        Self {
            index,
            symbol,
            distance: 0.0,
        }
    }

    /// Moves down by `speed * fall_rate` units per second of `elapsed`.
    pub fn advance(&mut self, speed: f64, fall_rate: f64, elapsed: Duration) {
        self.distance += speed * fall_rate * elapsed.as_secs_f64();
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn has_crossed(&self, baseline: f64) -> bool {
        self.distance > baseline
    }

    /// Fraction of the way to the baseline, for drawing.
    pub fn progress(&self, baseline: f64) -> f64 {
        if baseline <= 0.0 {
            return 1.0;
        }
        (self.distance / baseline).clamp(0.0, 1.0)
    }
}
