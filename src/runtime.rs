use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// What a key press means to the trainer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Keystroke(char),
    Backspace,
    Restart,
    Quit,
}

/// Decodes a terminal key press. Keys with no meaning map to `None`.
pub fn decode_key(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char(c) => Some(Input::Keystroke(c)),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Tab => Some(Input::Restart),
        KeyCode::Esc => Some(Input::Quit),
        _ => None,
    }
}

/// Source of terminal events (keyboard, resize, ticks)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm.
///
/// The channel is shared: a `ThreadScheduler` built from `sender()` feeds
/// ticks into the same stream as key presses.
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => key_tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => key_tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    /// Blocks up to the poll interval; `None` when nothing arrived.
    pub fn step(&self) -> Option<AppEvent> {
        match self.event_source.recv_timeout(self.poll_interval) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
