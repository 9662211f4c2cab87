use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventSink;
use crate::session::Mode;
use crate::session::typing::{InputSession, SessionState};

/// Summary of one finished (or abandoned) session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub mode: Mode,
    pub level: u32,
    pub outcome: SessionState,
    pub hits: u32,
    pub misses: u32,
    pub accuracy: f64,
    pub cpm: u32,
    pub wpm: u32,
    pub elapsed_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_speed: Option<f64>,
    #[serde(default = "default_progress_percent")]
    pub progress_percent: f64,
    pub timestamp: DateTime<Utc>,
}

fn default_progress_percent() -> f64 {
    100.0
}

impl SessionResult {
    pub fn from_session<S: EventSink>(session: &InputSession<S>, level: u32, now: Instant) -> Self {
        let score = session.score();
        Self {
            mode: session.mode(),
            level,
            outcome: session.state(),
            hits: score.hits(),
            misses: score.misses(),
            accuracy: score.accuracy(),
            cpm: score.cpm(now),
            wpm: score.wpm(now),
            elapsed_secs: score.elapsed_secs(now),
            final_speed: session.speed(),
            progress_percent: (session.progress() * 100.0).clamp(0.0, 100.0),
            timestamp: Utc::now(),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == SessionState::Completed
    }
}
