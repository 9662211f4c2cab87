/// Bounded miss budget. The session fails the moment the count reaches the ceiling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    miss_count: u32,
    miss_ceiling: u32,
}

impl RetryPolicy {
    pub fn new(miss_ceiling: u32) -> Self {
        Self {
            miss_count: 0,
            miss_ceiling,
        }
    }

    pub fn on_miss(&mut self) {
        self.miss_count += 1;
    }

    pub fn is_exhausted(&self) -> bool {
        self.miss_count >= self.miss_ceiling
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn miss_ceiling(&self) -> u32 {
        self.miss_ceiling
    }

    pub fn remaining(&self) -> u32 {
        self.miss_ceiling.saturating_sub(self.miss_count)
    }
}
