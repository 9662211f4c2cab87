/// Tolerance for comparing accumulated speeds against the ceiling.
const SPEED_EPSILON: f64 = 1e-9;

/// Fall speed for a falling-letter session.
///
/// Speed is derived from the number of hits rather than summed up hit by hit,
/// so `start + n * increment` lands on the ceiling without float drift.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyRamp {
    floor: f64,
    ceiling: f64,
    increment: f64,
    steps: u32,
}

impl DifficultyRamp {
    pub fn new(start: f64, ceiling: f64, increment: f64) -> Self {
        Self {
            floor: start,
            ceiling: ceiling.max(start),
            increment: increment.max(0.0),
            steps: 0,
        }
    }

    pub fn speed(&self) -> f64 {
        let raw = self.floor + self.steps as f64 * self.increment;
        if raw >= self.ceiling - SPEED_EPSILON {
            self.ceiling
        } else {
            raw.max(self.floor)
        }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Bumps the speed by one increment. Returns the new speed.
    pub fn on_hit(&mut self) -> f64 {
        if !self.is_level_complete() {
            self.steps += 1;
        }
        self.speed()
    }

    pub fn is_level_complete(&self) -> bool {
        self.speed() >= self.ceiling
    }

    /// Hits still needed before the ceiling is reached.
    pub fn hits_remaining(&self) -> u32 {
        if self.increment <= 0.0 {
            return if self.is_level_complete() { 0 } else { u32::MAX };
        }
        let needed = ((self.ceiling - self.floor) / self.increment - SPEED_EPSILON).ceil();
        (needed.max(0.0) as u32).saturating_sub(self.steps)
    }
}
