use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::engine::{DifficultyRamp, RetryPolicy, ScoreTracker};
use crate::error::SessionError;
use crate::event::{EventSink, SessionEvent};
use crate::keyboard::HighlightRequest;
use crate::session::Mode;
use crate::session::falling::FallingSymbol;
use crate::session::input::{KeyInput, Outcome};
use crate::session::stream::TargetStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Completed,
    Failed,
    /// Torn down from outside before reaching an outcome.
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != SessionState::Active
    }
}

/// One run over a [`TargetStream`]: validates keys, moves the cursor and
/// decides when the run is won or lost.
///
/// In text mode the run is won when the cursor reaches the end of the stream.
/// In falling mode the stream is replayed from the start as often as needed
/// and the run is won when the fall speed reaches its ceiling. Either mode is
/// lost once the miss budget is spent; a result reached on the same key takes
/// precedence over a spent budget.
pub struct InputSession<S: EventSink = Vec<SessionEvent>> {
    stream: TargetStream,
    config: SessionConfig,
    cursor: usize,
    state: SessionState,
    score: ScoreTracker,
    retry: RetryPolicy,
    ramp: Option<DifficultyRamp>,
    falling: Option<FallingSymbol>,
    sink: S,
}

impl<S: EventSink> InputSession<S> {
    pub fn start(stream: TargetStream, config: SessionConfig, sink: S) -> Result<Self, SessionError> {
        config.validate()?;
        if stream.is_empty() {
            return Err(SessionError::EmptyStream);
        }

        let ramp = (config.mode == Mode::Falling).then(|| {
            DifficultyRamp::new(config.speed_start, config.speed_ceiling, config.speed_increment)
        });

        let mut session = Self {
            stream,
            config,
            cursor: 0,
            state: SessionState::Active,
            score: ScoreTracker::new(),
            retry: RetryPolicy::new(config.max_misses),
            ramp,
            falling: None,
            sink,
        };
        debug!(
            mode = %config.mode,
            symbols = session.stream.len(),
            max_misses = config.max_misses,
            "session started"
        );
        session.present_current();
        Ok(session)
    }

    pub fn submit_key<K: Into<KeyInput>>(&mut self, key: K) -> Result<Option<Outcome>, SessionError> {
        self.submit_key_at(key, Instant::now())
    }

    /// Returns `Ok(None)` for modifiers and unrecognised keys, which leave
    /// the session untouched.
    pub fn submit_key_at<K: Into<KeyInput>>(
        &mut self,
        key: K,
        now: Instant,
    ) -> Result<Option<Outcome>, SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::Closed { state: self.state });
        }
        let Some(symbol) = key.into().symbol() else {
            return Ok(None);
        };
        let Some(expected) = self.stream.get(self.cursor) else {
            return Ok(None);
        };

        if symbol == expected {
            self.register_hit(expected, now);
            Ok(Some(Outcome::Hit))
        } else {
            self.register_miss(expected);
            Ok(Some(Outcome::Miss))
        }
    }

    /// Advances the falling symbol. A symbol that crosses the baseline counts
    /// as a miss and is dropped again from the top. No-op in text mode and
    /// once the session is over.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Outcome> {
        if self.state.is_terminal() {
            return None;
        }
        let speed = self.ramp.as_ref()?.speed();
        let falling = self.falling.as_mut()?;
        falling.advance(speed, self.config.fall_rate, elapsed);
        if !falling.has_crossed(self.config.baseline_distance) {
            return None;
        }

        let expected = falling.symbol;
        debug!(index = self.cursor, symbol = %expected, "symbol crossed the baseline");
        self.register_miss(expected);
        Some(Outcome::Miss)
    }

    /// Tears the session down. Safe to call repeatedly.
    pub fn end(&mut self) {
        self.falling = None;
        if self.state == SessionState::Active {
            self.state = SessionState::Cancelled;
            debug!(cursor = self.cursor, "session cancelled");
            self.sink.emit(SessionEvent::Highlight(HighlightRequest::Clear));
        }
    }

    /// Counts a finished word on top of the ones text mode detects itself.
    /// Ignored once the session is over.
    pub fn mark_word(&mut self) {
        if self.state == SessionState::Active {
            self.score.add_word();
        }
    }

    fn register_hit(&mut self, symbol: char, now: Instant) {
        let index = self.cursor;
        self.score.add_success_at(now);
        if self.config.mode == Mode::Text && self.stream.ends_word(index) {
            self.score.add_word();
        }
        self.cursor += 1;
        self.falling = None;
        self.sink.emit(SessionEvent::Hit { index, symbol });

        if let Some(ramp) = self.ramp.as_mut() {
            let speed = ramp.on_hit();
            self.sink.emit(SessionEvent::SpeedChanged { speed });
        }

        if self.reached_goal() {
            self.finish(SessionState::Completed);
            return;
        }
        if self.config.mode == Mode::Falling && self.cursor >= self.stream.len() {
            self.cursor = 0;
        }
        self.present_current();
    }

    fn register_miss(&mut self, expected: char) {
        let index = self.cursor;
        self.score.add_miss();
        self.retry.on_miss();
        self.sink.emit(SessionEvent::Miss {
            index,
            symbol: expected,
        });
        if self.config.error_cue {
            self.sink.emit(SessionEvent::ErrorCue);
        }

        // A miss moves neither the cursor nor the ramp.
        if self.retry.is_exhausted() {
            self.finish(SessionState::Failed);
        } else {
            self.present_current();
        }
    }

    fn reached_goal(&self) -> bool {
        match self.config.mode {
            Mode::Text => self.cursor >= self.stream.len(),
            Mode::Falling => self
                .ramp
                .as_ref()
                .is_some_and(DifficultyRamp::is_level_complete),
        }
    }

    /// Shows the symbol under the cursor: a fresh falling instance in falling
    /// mode, and the matching key highlight in both modes.
    fn present_current(&mut self) {
        let Some(symbol) = self.stream.get(self.cursor) else {
            return;
        };
        if self.config.mode == Mode::Falling {
            self.falling = Some(FallingSymbol::spawn(self.cursor, symbol));
            self.sink.emit(SessionEvent::Spawned {
                index: self.cursor,
                symbol,
            });
        }
        self.sink
            .emit(SessionEvent::Highlight(HighlightRequest::for_symbol(symbol)));
    }

    fn finish(&mut self, state: SessionState) {
        self.state = state;
        self.falling = None;
        self.sink.emit(SessionEvent::Highlight(HighlightRequest::Clear));
        match state {
            SessionState::Completed => {
                info!(
                    mode = %self.config.mode,
                    hits = self.score.hits(),
                    misses = self.score.misses(),
                    "session completed"
                );
                self.sink.emit(SessionEvent::Completed);
            }
            SessionState::Failed => {
                info!(
                    mode = %self.config.mode,
                    cursor = self.cursor,
                    misses = self.retry.miss_count(),
                    "session failed"
                );
                self.sink.emit(SessionEvent::Failed);
            }
            SessionState::Active | SessionState::Cancelled => {}
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stream(&self) -> &TargetStream {
        &self.stream
    }

    /// The symbol the player should type next, if the session is running.
    pub fn expected(&self) -> Option<char> {
        if self.state.is_terminal() {
            return None;
        }
        self.stream.get(self.cursor)
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn speed(&self) -> Option<f64> {
        self.ramp.as_ref().map(DifficultyRamp::speed)
    }

    pub fn falling(&self) -> Option<&FallingSymbol> {
        self.falling.as_ref()
    }

    pub fn cpm(&self, now: Instant) -> u32 {
        self.score.cpm(now)
    }

    pub fn wpm(&self, now: Instant) -> u32 {
        self.score.wpm(now)
    }

    /// Share of the run done: stream position in text mode, speed ramp in falling mode.
    pub fn progress(&self) -> f64 {
        if self.state == SessionState::Completed {
            return 1.0;
        }
        match (&self.ramp, self.config.mode) {
            (Some(ramp), Mode::Falling) => {
                let span = ramp.ceiling() - ramp.floor();
                if span <= 0.0 {
                    1.0
                } else {
                    (ramp.speed() - ramp.floor()) / span
                }
            }
            _ => self.cursor as f64 / self.stream.len() as f64,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
