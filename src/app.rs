use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, PresentationFlags};
use crate::engine::progression::{self, LevelState, Progression};
use crate::error::{ContentError, SessionError};
use crate::event::{EventSink, SessionEvent};
use crate::generator::{ContentProvider, Curriculum};
use crate::keyboard::{HighlightGroup, HighlightRequest, HighlightStyle};
use crate::session::Mode;
use crate::session::input::{KeyInput, Outcome};
use crate::session::result::SessionResult;
use crate::session::stream::TargetStream;
use crate::session::typing::{InputSession, SessionState};

/// What the screen between two levels shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InterlevelSummary {
    pub level: u32,
    pub new_symbols: Vec<char>,
    /// Symbols from earlier levels, without this level's new ones.
    pub learned_symbols: Vec<char>,
    pub highlight: HighlightRequest,
}

/// Runs stages one after another: builds content for the current
/// (mode, level), owns the live session and moves through the levels.
///
/// Every session gets its own clone of `sink`.
pub struct App<P: ContentProvider = Curriculum, S: EventSink + Clone = Vec<SessionEvent>> {
    pub config: Config,
    level_state: LevelState,
    content: P,
    sink: S,
    session: Option<InputSession<S>>,
    last_result: Option<SessionResult>,
    history: Vec<SessionResult>,
}

impl App {
    /// Loads the curriculum named in `config` and collects events in memory.
    pub fn from_config(config: Config) -> Result<Self, ContentError> {
        let curriculum = Curriculum::load(&config.curriculum)?
            .with_new_symbol_fraction(config.new_symbol_fraction);
        Ok(Self::new(config, curriculum, Vec::new()))
    }
}

impl<P: ContentProvider, S: EventSink + Clone> App<P, S> {
    pub fn new(config: Config, content: P, sink: S) -> Self {
        Self {
            config,
            level_state: LevelState::first(),
            content,
            sink,
            session: None,
            last_result: None,
            history: Vec::new(),
        }
    }

    /// Jumps to a stage. Any running session is torn down first.
    pub fn with_level(mut self, level_state: LevelState) -> Self {
        self.end_session();
        self.level_state = level_state;
        self
    }

    /// Starts a fresh session for the current (mode, level).
    pub fn start_stage(&mut self) -> Result<&InputSession<S>, SessionError> {
        self.end_session();
        let LevelState { level, mode } = self.level_state;
        let stream = match mode {
            Mode::Falling => TargetStream::letters(
                self.content
                    .letters_for_falling(level, self.config.falling_letter_count),
            ),
            Mode::Text => TargetStream::from_text(&self.content.text_for_level(level)),
        };
        debug!(level, %mode, symbols = stream.len(), "starting stage");

        let config = self.config.session_config(mode);
        let session = InputSession::start(stream, config, self.sink.clone())?;
        Ok(self.session.insert(session))
    }

    pub fn submit_key<K: Into<KeyInput>>(&mut self, key: K) -> Result<Option<Outcome>, SessionError> {
        self.submit_key_at(key, Instant::now())
    }

    pub fn submit_key_at<K: Into<KeyInput>>(
        &mut self,
        key: K,
        now: Instant,
    ) -> Result<Option<Outcome>, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.submit_key_at(key, now)
    }

    pub fn tick(&mut self, elapsed: Duration) -> Option<Outcome> {
        self.session.as_mut()?.tick(elapsed)
    }

    /// Tears down the running session, keeping its result. Safe to call
    /// when nothing is running.
    pub fn end_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.end();
        self.record(&session);
    }

    /// After a completed session, moves to the next stage. The next session
    /// is not started; call [`App::start_stage`] for that.
    pub fn advance(&mut self) -> Result<Progression, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoActiveSession)?;
        if session.state() != SessionState::Completed {
            return Err(SessionError::NotFinished);
        }
        self.end_session();

        let finished = self.level_state;
        let next = progression::next(finished, &mut self.content);
        match next {
            Progression::Next(state) => {
                info!(
                    from_level = finished.level,
                    from_mode = %finished.mode,
                    level = state.level,
                    mode = %state.mode,
                    "advancing"
                );
                self.level_state = state;
            }
            Progression::EndOfContent => {
                info!(level = finished.level, "curriculum finished");
            }
        }
        Ok(next)
    }

    /// Restarts the current stage from the beginning with new content.
    pub fn retry(&mut self) -> Result<&InputSession<S>, SessionError> {
        debug!(level = self.level_state.level, mode = %self.level_state.mode, "retrying stage");
        self.start_stage()
    }

    pub fn interlevel_summary(&self, level: u32) -> InterlevelSummary {
        let new_symbols = self.content.new_symbols_for_level(level);
        let learned_symbols: Vec<char> = self
            .content
            .learned_symbols_up_to(level)
            .into_iter()
            .filter(|c| !new_symbols.contains(c))
            .collect();
        let highlight = HighlightRequest::Grouped(vec![
            HighlightGroup {
                symbols: new_symbols.clone(),
                style: HighlightStyle::New,
            },
            HighlightGroup {
                symbols: learned_symbols.clone(),
                style: HighlightStyle::Learned,
            },
        ]);
        InterlevelSummary {
            level,
            new_symbols,
            learned_symbols,
            highlight,
        }
    }

    fn record(&mut self, session: &InputSession<S>) {
        let result = SessionResult::from_session(session, self.level_state.level, Instant::now());
        self.history.push(result.clone());
        self.last_result = Some(result);
    }

    pub fn level_state(&self) -> LevelState {
        self.level_state
    }

    pub fn session(&self) -> Option<&InputSession<S>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut InputSession<S>> {
        self.session.as_mut()
    }

    pub fn last_result(&self) -> Option<&SessionResult> {
        self.last_result.as_ref()
    }

    pub fn history(&self) -> &[SessionResult] {
        &self.history
    }

    pub fn content(&self) -> &P {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut P {
        &mut self.content
    }

    pub fn presentation_flags(&self) -> PresentationFlags {
        self.config.presentation_flags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NullSink;

    /// Two levels: "ab" then "cd".
    struct TwoLevels;

    impl ContentProvider for TwoLevels {
        fn letters_for_falling(&mut self, level: u32, count: usize) -> Vec<char> {
            let pair = match level {
                1 => ['a', 'b'],
                2 => ['c', 'd'],
                _ => return Vec::new(),
            };
            pair.into_iter().cycle().take(count).collect()
        }

        fn text_for_level(&mut self, level: u32) -> String {
            match level {
                1 => "ab ba".to_string(),
                2 => "cd".to_string(),
                _ => String::new(),
            }
        }

        fn new_symbols_for_level(&self, level: u32) -> Vec<char> {
            match level {
                1 => vec!['a', 'b'],
                2 => vec!['c', 'd'],
                _ => Vec::new(),
            }
        }

        fn learned_symbols_up_to(&self, level: u32) -> Vec<char> {
            (1..=level).flat_map(|l| self.new_symbols_for_level(l)).collect()
        }
    }

    fn app() -> App<TwoLevels> {
        App::new(Config::default(), TwoLevels, Vec::new())
    }

    fn type_text(app: &mut App<TwoLevels>, text: &str) {
        for c in text.chars() {
            app.submit_key(c).unwrap();
        }
    }

    #[test]
    fn test_no_session_is_an_error() {
        let mut app = app();
        assert_eq!(app.submit_key('a'), Err(SessionError::NoActiveSession));
        assert_eq!(app.advance(), Err(SessionError::NoActiveSession));
        assert_eq!(app.tick(Duration::from_secs(1)), None);
        app.end_session();
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_falling_stage_then_text_stage() {
        let mut app = app();
        app.start_stage().unwrap();
        assert_eq!(app.session().unwrap().stream().len(), 100);

        assert_eq!(app.advance(), Err(SessionError::NotFinished));
        type_text(&mut app, "ababababab");
        assert_eq!(app.session().unwrap().state(), SessionState::Completed);

        assert_eq!(
            app.advance(),
            Ok(Progression::Next(LevelState::new(1, Mode::Text)))
        );
        assert!(app.session().is_none());
        assert!(app.last_result().unwrap().passed());

        app.start_stage().unwrap();
        assert_eq!(app.session().unwrap().stream().as_string(), "ab ba");
    }

    #[test]
    fn test_words_are_counted_in_text_mode() {
        let mut app = app().with_level(LevelState::new(1, Mode::Text));
        app.start_stage().unwrap();
        type_text(&mut app, "ab");
        assert_eq!(app.session().unwrap().score().word_count(), 1);
        type_text(&mut app, " bx");
        assert_eq!(app.session().unwrap().score().word_count(), 1);
        type_text(&mut app, "a");
        assert_eq!(app.session().unwrap().score().word_count(), 2);
        assert_eq!(app.session().unwrap().state(), SessionState::Completed);
    }

    #[test]
    fn test_progression_to_end_of_content() {
        let mut app = app().with_level(LevelState::new(2, Mode::Text));
        app.start_stage().unwrap();
        type_text(&mut app, "cd");
        assert_eq!(app.advance(), Ok(Progression::EndOfContent));
        assert_eq!(app.level_state(), LevelState::new(2, Mode::Text));
    }

    #[test]
    fn test_text_stage_leads_to_next_level() {
        let mut app = app().with_level(LevelState::new(1, Mode::Text));
        app.start_stage().unwrap();
        type_text(&mut app, "ab ba");
        assert_eq!(
            app.advance(),
            Ok(Progression::Next(LevelState::new(2, Mode::Falling)))
        );
        app.start_stage().unwrap();
        assert_eq!(app.session().unwrap().expected(), Some('c'));
    }

    #[test]
    fn test_retry_after_failure_starts_over() {
        let mut app = app();
        app.config.max_misses = 2;
        app.start_stage().unwrap();
        type_text(&mut app, "axx");
        assert_eq!(app.session().unwrap().state(), SessionState::Failed);
        assert_eq!(app.advance(), Err(SessionError::NotFinished));

        let session = app.retry().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.retry().miss_count(), 0);
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].outcome, SessionState::Failed);
        assert_eq!(app.level_state(), LevelState::first());
    }

    #[test]
    fn test_end_session_is_idempotent() {
        let mut app = app();
        app.start_stage().unwrap();
        app.end_session();
        app.end_session();
        assert!(app.session().is_none());
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].outcome, SessionState::Cancelled);
    }

    #[test]
    fn test_empty_content_does_not_start() {
        let mut app = app().with_level(LevelState::new(3, Mode::Falling));
        assert!(matches!(app.start_stage(), Err(SessionError::EmptyStream)));
        assert!(app.session().is_none());
    }

    #[test]
    fn test_interlevel_summary_groups_new_and_learned() {
        let app = app();
        let summary = app.interlevel_summary(2);
        assert_eq!(summary.new_symbols, vec!['c', 'd']);
        assert_eq!(summary.learned_symbols, vec!['a', 'b']);
        let keys = summary.highlight.keys();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0].key, "C");
        assert_eq!(keys[0].style, HighlightStyle::New);
        assert_eq!(keys[3].style, HighlightStyle::Learned);
    }

    #[test]
    fn test_sound_setting_controls_error_cue() {
        let mut config = Config::default();
        config.sound_enabled = false;
        let mut app: App<TwoLevels> = App::new(config, TwoLevels, Vec::new());
        app.start_stage().unwrap();
        app.submit_key('z').unwrap();
        let events = app.session().unwrap().sink();
        assert!(!events.contains(&SessionEvent::ErrorCue));
    }

    #[test]
    fn test_null_sink_app() {
        let mut app = App::new(Config::default(), TwoLevels, NullSink);
        app.start_stage().unwrap();
        assert_eq!(app.submit_key('a'), Ok(Some(Outcome::Hit)));
    }
}
