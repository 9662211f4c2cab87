pub mod difficulty;
pub mod progression;
pub mod retry;
pub mod score;

pub use difficulty::DifficultyRamp;
pub use progression::{LevelState, Progression};
pub use retry::RetryPolicy;
pub use score::ScoreTracker;
