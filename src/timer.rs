//! The recurring tick that drives timed sessions between keystrokes.
//!
//! A running tick is an owned [`TickHandle`]. Cancelling consumes the
//! handle and dropping it cancels as well, so a tick cannot outlive the
//! value that owns it and cannot be cancelled twice.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Default)]
struct LedgerCounts {
    started: AtomicUsize,
    cancelled: AtomicUsize,
}

/// Shared count of ticks started and cancelled by a scheduler.
#[derive(Debug, Clone, Default)]
pub struct TimerLedger {
    counts: Arc<LedgerCounts>,
}

impl TimerLedger {
    pub fn started(&self) -> usize {
        self.counts.started.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.counts.cancelled.load(Ordering::SeqCst)
    }

    /// Ticks started but not yet cancelled.
    pub fn running(&self) -> usize {
        self.started().saturating_sub(self.cancelled())
    }
}

#[derive(Debug)]
pub struct TickHandle {
    stop: Arc<AtomicBool>,
    ledger: TimerLedger,
    interval: Duration,
}

impl TickHandle {
    fn start(interval: Duration, ledger: TimerLedger) -> Self {
        ledger.counts.started.fetch_add(1, Ordering::SeqCst);
        debug!(interval_ms = interval.as_millis() as u64, "tick started");
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            ledger,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cancel(mut self) {
        self.stop_once();
    }

    fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn stop_once(&mut self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            self.ledger.counts.cancelled.fetch_add(1, Ordering::SeqCst);
            debug!("tick cancelled");
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop_once();
    }
}

/// Starts recurring ticks for the engine.
pub trait TickScheduler {
    fn start(&mut self, interval: Duration) -> TickHandle;
    fn ledger(&self) -> TimerLedger;
}

/// Hands out handles without producing ticks; the caller calls
/// `SessionEngine::tick` itself. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    ledger: TimerLedger,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self, interval: Duration) -> TickHandle {
        TickHandle::start(interval, self.ledger.clone())
    }

    fn ledger(&self) -> TimerLedger {
        self.ledger.clone()
    }
}

/// Sends `message` down a channel every interval from a background thread
/// until the handle is cancelled or the receiver goes away.
pub struct ThreadScheduler<M: Clone + Send + 'static> {
    tx: Sender<M>,
    message: M,
    ledger: TimerLedger,
}

impl<M: Clone + Send + 'static> ThreadScheduler<M> {
    pub fn new(tx: Sender<M>, message: M) -> Self {
        Self {
            tx,
            message,
            ledger: TimerLedger::default(),
        }
    }
}

impl<M: Clone + Send + 'static> TickScheduler for ThreadScheduler<M> {
    fn start(&mut self, interval: Duration) -> TickHandle {
        let handle = TickHandle::start(interval, self.ledger.clone());
        let stop = handle.stop_flag();
        let tx = self.tx.clone();
        let message = self.message.clone();

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if stop.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(message.clone()).is_err() {
                break;
            }
        });

        handle
    }

    fn ledger(&self) -> TimerLedger {
        self.ledger.clone()
    }
}
