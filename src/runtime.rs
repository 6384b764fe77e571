use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app loop.
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError>;
}

/// Production event source using crossterm.
pub struct CrosstermEventSource {
    rx: Receiver<Event>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(Event::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(Event::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit and headless tests.
pub struct TestEventSource {
    rx: Receiver<Event>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<Event>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input events with a fixed-cadence tick.
///
/// Ticks are deadline-based: a key arriving just before the deadline does
/// not push the next tick out, so a steady typist cannot starve the
/// countdown.
pub struct Runner<E: EventSource> {
    events: E,
    interval: Duration,
    next_tick: Instant,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E, interval: Duration) -> Self {
        Self {
            events,
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    /// Next event to process: an input event if one arrives before the
    /// tick deadline, otherwise a `Tick`.
    pub fn step(&mut self) -> Event {
        let now = Instant::now();
        if now >= self.next_tick {
            self.next_tick += self.interval;
            return Event::Tick;
        }

        match self.events.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.next_tick += self.interval;
                Event::Tick
            }
        }
    }

    /// Restart the tick cadence from now. Used when the countdown is
    /// armed by the first keystroke.
    pub fn rearm(&mut self) {
        self.next_tick = Instant::now() + self.interval;
    }
}
