use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

use keyfall::config::SessionConfig;
use keyfall::error::SessionError;
use keyfall::event::SessionEvent;
use keyfall::keyboard::HighlightRequest;
use keyfall::session::input::{KeyInput, Outcome};
use keyfall::session::stream::TargetStream;
use keyfall::session::typing::{InputSession, SessionState};

fn events() -> Vec<SessionEvent> {
    Vec::new()
}

fn press(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn text_session_with_one_miss() {
    let config = SessionConfig::text().with_max_misses(5);
    let mut session = InputSession::start(TargetStream::from_text("abc"), config, events()).unwrap();

    let steps = [('a', Outcome::Hit, 1), ('x', Outcome::Miss, 1), ('b', Outcome::Hit, 2), ('c', Outcome::Hit, 3)];
    for (key, outcome, cursor) in steps {
        assert_eq!(session.submit_key(key), Ok(Some(outcome)));
        assert_eq!(session.cursor(), cursor);
    }
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(session.retry().miss_count(), 1);

    let misses: Vec<&SessionEvent> = session
        .sink()
        .iter()
        .filter(|e| matches!(e, SessionEvent::Miss { .. }))
        .collect();
    assert_eq!(misses, vec![&SessionEvent::Miss { index: 1, symbol: 'b' }]);
}

#[test]
fn session_fails_on_second_miss_with_budget_two() {
    let config = SessionConfig::text().with_max_misses(2);
    let mut session = InputSession::start(TargetStream::from_text("abc"), config, events()).unwrap();

    session.submit_key('q').unwrap();
    session.submit_key('q').unwrap();
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(
        session.submit_key('a'),
        Err(SessionError::Closed { state: SessionState::Failed })
    );
}

#[test]
fn falling_symbol_crossing_baseline_is_respawned() {
    let mut session = InputSession::start(
        TargetStream::letters("sol".chars()),
        SessionConfig::falling(),
        events(),
    )
    .unwrap();

    let mut outcome = None;
    for _ in 0..100 {
        outcome = session.tick(Duration::from_millis(100));
        if outcome.is_some() {
            break;
        }
    }
    assert_eq!(outcome, Some(Outcome::Miss));
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.falling().map(|f| f.symbol), Some('s'));
    assert_eq!(session.falling().map(|f| f.distance()), Some(0.0));

    let spawns = session
        .sink()
        .iter()
        .filter(|e| **e == SessionEvent::Spawned { index: 0, symbol: 's' })
        .count();
    assert_eq!(spawns, 2);
}

#[test]
fn ten_hits_finish_default_falling_level() {
    let config = SessionConfig::falling().with_speed(1.0, 2.0, 0.1);
    let mut session = InputSession::start(TargetStream::letters("ab".chars()), config, events()).unwrap();

    let mut hits = 0;
    while session.state() == SessionState::Active {
        let expected = session.expected().unwrap();
        session.submit_key(expected).unwrap();
        hits += 1;
        assert!(session.speed().unwrap() <= 2.0);
    }
    assert_eq!(hits, 10);
    assert_eq!(session.state(), SessionState::Completed);
}

#[test]
fn events_reach_a_channel() {
    let (tx, rx) = mpsc::channel();
    let mut session = InputSession::start(TargetStream::from_text("ok"), SessionConfig::text(), tx).unwrap();
    session.submit_key(press('o')).unwrap();
    session.submit_key(press('k')).unwrap();
    drop(session);

    let events: Vec<SessionEvent> = rx.try_iter().collect();
    assert_eq!(events.first(), Some(&SessionEvent::Highlight(HighlightRequest::Single('o'))));
    assert_eq!(events.last(), Some(&SessionEvent::Completed));
    assert!(events.contains(&SessionEvent::Hit { index: 1, symbol: 'k' }));
}

#[test]
fn terminal_keys_and_modifiers() {
    let mut session = InputSession::start(TargetStream::from_text("Sí"), SessionConfig::text(), events()).unwrap();

    let shift = KeyEvent::new(KeyCode::Modifier(ModifierKeyCode::LeftShift), KeyModifiers::SHIFT);
    assert_eq!(session.submit_key(shift), Ok(None));
    assert_eq!(session.submit_key(KeyInput::from_key_name("Dead")), Ok(None));
    assert_eq!(session.submit_key(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)), Ok(Some(Outcome::Hit)));
    assert_eq!(session.submit_key(press('í')), Ok(Some(Outcome::Hit)));
    assert_eq!(session.state(), SessionState::Completed);
}

#[test]
fn decomposed_text_is_typed_as_composed_letters() {
    let text = "nin\u{0303}o\nsol";
    let stream = TargetStream::from_text(text);
    assert_eq!(stream.as_string(), "niñosol");
    assert_eq!(stream.line_starts(), &[0, 4]);

    let mut session = InputSession::start(stream, SessionConfig::text(), events()).unwrap();
    for c in "niñosol".chars() {
        assert_eq!(session.submit_key(c), Ok(Some(Outcome::Hit)));
    }
    assert_eq!(session.state(), SessionState::Completed);
}

#[test]
fn idle_time_before_first_hit_is_not_counted() {
    let t0 = Instant::now();
    let mut session = InputSession::start(TargetStream::from_text("abcd"), SessionConfig::text(), events()).unwrap();
    assert_eq!(session.cpm(t0 + Duration::from_secs(600)), 0);

    let first = t0 + Duration::from_secs(300);
    for c in "abcd".chars() {
        session.submit_key_at(c, first).unwrap();
    }
    assert_eq!(session.cpm(first + Duration::from_secs(60)), 4);
}

#[test]
fn cancelled_session_stays_quiet() {
    let mut session = InputSession::start(
        TargetStream::letters("ab".chars()),
        SessionConfig::falling(),
        events(),
    )
    .unwrap();
    session.end();
    let before = session.sink().len();
    session.end();
    assert_eq!(session.tick(Duration::from_secs(60)), None);
    assert_eq!(session.sink().len(), before);
    assert_eq!(session.state(), SessionState::Cancelled);
}
