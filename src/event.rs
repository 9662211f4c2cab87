use std::sync::mpsc;

use crate::keyboard::HighlightRequest;

/// Everything a running session tells the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A falling symbol (re)appeared at the top.
    Spawned { index: usize, symbol: char },
    Hit { index: usize, symbol: char },
    /// `symbol` is the expected one; the cursor stays on it.
    Miss { index: usize, symbol: char },
    SpeedChanged { speed: f64 },
    /// Play the error sound.
    ErrorCue,
    Highlight(HighlightRequest),
    Completed,
    Failed,
}

/// Receives session events as they happen.
pub trait EventSink {
    fn emit(&mut self, event: SessionEvent);
}

impl EventSink for Vec<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: SessionEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: SessionEvent) {
        (**self).emit(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SessionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (mut tx, rx) = mpsc::channel();
        tx.emit(SessionEvent::ErrorCue);
        tx.emit(SessionEvent::Completed);
        let received: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(received, vec![SessionEvent::ErrorCue, SessionEvent::Completed]);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel();
        drop(rx);
        tx.emit(SessionEvent::Failed);
    }

    fn emit_failed<S: EventSink>(mut sink: S) {
        sink.emit(SessionEvent::Failed);
    }

    #[test]
    fn test_borrowed_sink() {
        let mut events: Vec<SessionEvent> = Vec::new();
        emit_failed(&mut events);
        emit_failed(Box::new(NullSink));
        assert_eq!(events, vec![SessionEvent::Failed]);
    }
}
