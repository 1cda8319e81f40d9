use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::session::{CharState, Counters, ErrorEntry, Mode, Session, SessionConfig, Status};
use crate::stats::{self, LiveStats};
use crate::time_series::WpmSample;
use crate::timer::{TickHandle, TickScheduler};

pub const TICK_RATE_MS: u64 = 100;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Output of the engine, drained by whoever renders, plays sounds or records results.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Started,
    Judged {
        index: usize,
        expected: char,
        typed: char,
        outcome: Outcome,
    },
    Corrected {
        index: usize,
    },
    /// Emitted exactly once per session.
    Finished(SessionSummary),
}

/// The record handed to a result recorder when a session ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub mode: Mode,
    pub target_value: u32,
    pub duration_secs: f64,
    pub error_count: usize,
    pub finished_at: DateTime<Local>,
}

/// What the secondary counter on the typing screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remaining {
    Seconds(u64),
    Words(u64),
    Elapsed(u64),
}

/// Owns one session at a time and applies input to it.
///
/// Every mutation goes through `submit_keystroke`, `submit_backspace`,
/// `tick` or `restart`. The recurring tick only exists while the session
/// is active.
pub struct SessionEngine {
    session: Session,
    counters: Counters,
    stats: LiveStats,
    scheduler: Box<dyn TickScheduler>,
    tick_interval: Duration,
    timer: Option<TickHandle>,
    events: Vec<EngineEvent>,
    summary: Option<SessionSummary>,
}

impl SessionEngine {
    pub fn new(config: SessionConfig, text: &str, scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            session: Session::new(config, text),
            counters: Counters::default(),
            stats: LiveStats::default(),
            scheduler,
            tick_interval: Duration::from_millis(TICK_RATE_MS),
            timer: None,
            events: Vec::new(),
            summary: None,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }

    pub fn status(&self) -> Status {
        self.session.status
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the session, stopping the previous one's tick first.
    pub fn restart(&mut self, config: SessionConfig, text: &str) {
        self.stop_tick();
        self.session = Session::new(config, text);
        self.counters = Counters::default();
        self.stats = LiveStats::default();
        self.events.clear();
        self.summary = None;
        debug!(mode = %config.mode, target = config.target_value, "session reset");
    }

    /// Abandons the session: the tick stops, later input is ignored and
    /// no summary is produced.
    pub fn discard(&mut self) {
        self.stop_tick();
        if self.session.status != Status::Finished {
            self.session.status = Status::Finished;
            debug!(cursor = self.session.cursor, "session discarded");
        }
    }

    pub fn submit_keystroke(&mut self, typed: char, now: Instant) {
        if self.session.status == Status::Finished {
            return;
        }
        if self.session.cursor >= self.session.len() {
            self.finish(now);
            return;
        }
        if self.session.status == Status::Idle {
            self.start(now);
        }

        let index = self.session.cursor;
        let expected = self.session.text[index];
        let outcome = if typed == expected {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        match outcome {
            Outcome::Correct => {
                self.session.char_states[index] = CharState::Correct;
                self.counters.correct_chars += 1;
            }
            Outcome::Incorrect => {
                self.session.char_states[index] = CharState::Incorrect;
                self.counters.incorrect_chars += 1;
                self.session.errors.push(ErrorEntry {
                    index,
                    expected,
                    typed,
                    offset_ms: self.offset_ms(now),
                });
            }
        }
        self.counters.total_chars += 1;
        self.counters.keystrokes += 1;
        self.session.cursor += 1;

        trace!(index, ?outcome, "keystroke judged");
        self.events.push(EngineEvent::Judged {
            index,
            expected,
            typed,
            outcome,
        });

        self.refresh_stats(now);
        if self.should_finish(now) {
            self.finish(now);
        }
    }

    pub fn submit_backspace(&mut self, now: Instant) {
        if self.session.status != Status::Active || self.session.cursor == 0 {
            return;
        }

        self.session.cursor -= 1;
        let index = self.session.cursor;
        match self.session.char_states[index] {
            CharState::Correct => {
                self.counters.correct_chars = self.counters.correct_chars.saturating_sub(1)
            }
            _ => self.counters.incorrect_chars = self.counters.incorrect_chars.saturating_sub(1),
        }
        self.counters.total_chars = self.counters.total_chars.saturating_sub(1);
        self.session.char_states[index] = CharState::Unset;

        self.events.push(EngineEvent::Corrected { index });
        self.refresh_stats(now);
    }

    /// Periodic re-evaluation for timed modes.
    pub fn tick(&mut self, now: Instant) {
        if self.session.status != Status::Active || !self.session.mode().is_timed() {
            return;
        }
        self.refresh_stats(now);
        if self.should_finish(now) {
            self.finish(now);
        }
    }

    pub fn remaining(&self, now: Instant) -> Remaining {
        let elapsed = self.session.elapsed_secs(now);
        let target = self.session.target_value() as u64;

        match self.session.mode() {
            Mode::Time | Mode::Mission => {
                Remaining::Seconds((target as f64 - elapsed).max(0.0).ceil() as u64)
            }
            Mode::Words => {
                Remaining::Words(target.saturating_sub(self.counters.words_typed() as u64))
            }
            Mode::Quote | Mode::Zen | Mode::Custom => Remaining::Elapsed(elapsed.ceil() as u64),
        }
    }

    fn start(&mut self, now: Instant) {
        self.session.started_at = Some(now);
        self.session.status = Status::Active;
        self.stop_tick();
        self.timer = Some(self.scheduler.start(self.tick_interval));
        self.events.push(EngineEvent::Started);
        debug!(mode = %self.session.mode(), target = self.session.target_value(), "session started");
    }

    fn finish(&mut self, now: Instant) {
        if self.session.status == Status::Finished {
            return;
        }
        self.session.status = Status::Finished;
        self.session.ended_at = Some(now);
        self.stop_tick();
        self.refresh_stats(now);

        let summary = SessionSummary {
            wpm: self.stats.wpm,
            raw_wpm: self.stats.raw_wpm,
            accuracy: self.stats.accuracy,
            consistency: self.stats.consistency,
            mode: self.session.mode(),
            target_value: self.session.target_value(),
            duration_secs: self.session.elapsed_secs(now),
            error_count: self.session.errors.len(),
            finished_at: Local::now(),
        };
        debug!(
            wpm = summary.wpm,
            accuracy = summary.accuracy,
            duration_secs = summary.duration_secs,
            "session finished"
        );
        self.summary = Some(summary.clone());
        self.events.push(EngineEvent::Finished(summary));
    }

    fn stop_tick(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn should_finish(&self, now: Instant) -> bool {
        let session = &self.session;
        let reached_end = session.cursor >= session.len();
        let target = session.target_value();

        match session.mode() {
            Mode::Time => session.elapsed_secs(now) >= target as f64,
            Mode::Mission => reached_end || session.elapsed_secs(now) >= target as f64,
            Mode::Words => self.counters.words_typed() >= target as usize,
            Mode::Quote | Mode::Zen | Mode::Custom => reached_end,
        }
    }

    /// Samples are only kept once wpm is positive, so the zero readings
    /// right after the first keystroke never weigh on consistency.
    fn refresh_stats(&mut self, now: Instant) {
        let elapsed = self.session.elapsed_secs(now);
        let Some(stats) = stats::recompute(&self.counters, elapsed, &self.stats) else {
            return;
        };
        self.stats = stats;

        if stats.wpm > 0.0 {
            self.session
                .samples
                .push(WpmSample::new(elapsed, stats.wpm, stats.raw_wpm));
            self.stats.consistency = stats::consistency(&self.session.wpm_samples());
        }
    }

    fn offset_ms(&self, now: Instant) -> u64 {
        self.session
            .started_at
            .map(|start| now.saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualScheduler, TimerLedger};
    use assert_matches::assert_matches;

    fn engine(mode: Mode, target: u32, text: &str) -> (SessionEngine, TimerLedger) {
        let scheduler = ManualScheduler::new();
        let ledger = scheduler.ledger();
        (
            SessionEngine::new(SessionConfig::new(mode, target), text, Box::new(scheduler)),
            ledger,
        )
    }

    fn secs(t0: Instant, s: u64) -> Instant {
        t0 + Duration::from_secs(s)
    }

    fn type_str(engine: &mut SessionEngine, s: &str, at: Instant) {
        for c in s.chars() {
            engine.submit_keystroke(c, at);
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let (engine, ledger) = engine(Mode::Quote, 0, "hello");

        assert_eq!(engine.status(), Status::Idle);
        assert!(!engine.is_ticking());
        assert_eq!(ledger.started(), 0);
        assert_eq!(engine.stats(), LiveStats::default());
    }

    #[test]
    fn test_first_keystroke_starts_session_and_tick() {
        let (mut engine, ledger) = engine(Mode::Time, 30, "hello");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);

        assert_eq!(engine.status(), Status::Active);
        assert_eq!(engine.session().started_at(), Some(t0));
        assert!(engine.is_ticking());
        assert_eq!(ledger.running(), 1);
        assert_eq!(engine.drain_events()[0], EngineEvent::Started);
    }

    #[test]
    fn test_correct_and_incorrect_judgment() {
        let (mut engine, _) = engine(Mode::Quote, 0, "Ab c");
        let t0 = Instant::now();

        engine.submit_keystroke('A', t0);
        engine.submit_keystroke('B', secs(t0, 1));
        engine.submit_keystroke(' ', secs(t0, 2));

        let session = engine.session();
        assert_eq!(session.char_state(0), Some(CharState::Correct));
        assert_eq!(session.char_state(1), Some(CharState::Incorrect));
        assert_eq!(session.char_state(2), Some(CharState::Correct));
        assert_eq!(session.char_state(3), Some(CharState::Unset));
        assert_eq!(session.cursor(), 3);

        let counters = engine.counters();
        assert_eq!(counters.correct_chars, 2);
        assert_eq!(counters.incorrect_chars, 1);
        assert_eq!(counters.total_chars, 3);
        assert_eq!(counters.keystrokes, 3);

        assert_eq!(
            session.errors(),
            &[ErrorEntry {
                index: 1,
                expected: 'b',
                typed: 'B',
                offset_ms: 1000,
            }]
        );
    }

    #[test]
    fn test_judgment_events_for_feedback() {
        let (mut engine, _) = engine(Mode::Quote, 0, "ab");
        let t0 = Instant::now();

        engine.submit_keystroke('x', t0);
        let events = engine.drain_events();

        assert_eq!(events.len(), 2);
        assert_matches!(
            events[1],
            EngineEvent::Judged {
                index: 0,
                expected: 'a',
                typed: 'x',
                outcome: Outcome::Incorrect
            }
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_round_trip_with_one_error() {
        let (mut engine, ledger) = engine(Mode::Custom, 0, "cat dogs");
        let t0 = Instant::now();

        type_str(&mut engine, "cat do", t0);
        engine.submit_keystroke('x', secs(t0, 30));
        engine.submit_keystroke('s', secs(t0, 60));

        assert_eq!(engine.status(), Status::Finished);
        assert_eq!(engine.session().errors().len(), 1);
        assert_eq!(engine.session().errors()[0].expected, 'g');
        assert_eq!(engine.counters().correct_chars, 7);
        assert_eq!(engine.counters().incorrect_chars, 1);
        assert_eq!(engine.session().cursor(), 8);

        let summary = engine.summary().unwrap();
        assert_eq!(summary.wpm, 1.0);
        assert_eq!(summary.raw_wpm, 2.0);
        assert_eq!(summary.accuracy, 88.0);
        assert_eq!(summary.duration_secs, 60.0);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.mode, Mode::Custom);
        assert_eq!(ledger.running(), 0);
        assert_eq!(ledger.cancelled(), 1);
    }

    #[test]
    fn test_backspace_after_correct() {
        let (mut engine, _) = engine(Mode::Quote, 0, "abc");
        let t0 = Instant::now();

        type_str(&mut engine, "ab", t0);
        engine.submit_backspace(secs(t0, 1));

        assert_eq!(engine.session().cursor(), 1);
        assert_eq!(engine.session().char_state(1), Some(CharState::Unset));
        assert_eq!(engine.counters().correct_chars, 1);
        assert_eq!(engine.counters().total_chars, 1);
        assert_eq!(engine.counters().keystrokes, 2);
    }

    #[test]
    fn test_backspace_after_incorrect() {
        let (mut engine, _) = engine(Mode::Quote, 0, "abc");
        let t0 = Instant::now();

        type_str(&mut engine, "ax", t0);
        engine.submit_backspace(secs(t0, 1));

        assert_eq!(engine.counters().correct_chars, 1);
        assert_eq!(engine.counters().incorrect_chars, 0);
        assert_eq!(engine.counters().keystrokes, 2);
        // the mistake stays in the log even once corrected
        assert_eq!(engine.session().errors().len(), 1);

        engine.submit_keystroke('b', secs(t0, 2));
        assert_eq!(engine.session().char_state(1), Some(CharState::Correct));
        assert_eq!(engine.counters().keystrokes, 3);
    }

    #[test]
    fn test_backspace_ignored_when_idle_or_at_start() {
        let (mut engine, _) = engine(Mode::Quote, 0, "abc");
        let t0 = Instant::now();

        engine.submit_backspace(t0);
        assert_eq!(engine.status(), Status::Idle);

        engine.submit_keystroke('a', t0);
        engine.submit_backspace(t0);
        engine.submit_backspace(t0);

        assert_eq!(engine.session().cursor(), 0);
        assert_eq!(engine.counters().total_chars, 0);
        assert_eq!(engine.counters().keystrokes, 1);
    }

    #[test]
    fn test_counter_invariants_hold_through_mixed_input() {
        let (mut engine, _) = engine(Mode::Time, 600, "the quick brown fox");
        let t0 = Instant::now();
        let script = "thw\u{8}e quicj\u{8}\u{8}\u{8}ick brpwn";

        for (i, c) in script.chars().enumerate() {
            let at = t0 + Duration::from_millis(200 * i as u64);
            if c == '\u{8}' {
                engine.submit_backspace(at);
            } else {
                engine.submit_keystroke(c, at);
            }
            let counters = engine.counters();
            assert!(counters.correct_chars + counters.incorrect_chars <= counters.total_chars);
            assert!(counters.total_chars <= counters.keystrokes);
            assert_eq!(engine.session().cursor(), engine.session().judged_positions());
            assert!((0.0..=100.0).contains(&engine.stats().accuracy));
            assert!((0.0..=100.0).contains(&engine.stats().consistency));
        }
    }

    #[test]
    fn test_words_mode_finishes_at_target_regardless_of_errors() {
        let text = "aaaaa ".repeat(20);
        let (mut engine, _) = engine(Mode::Words, 10, &text);
        let t0 = Instant::now();

        // three wrong keystrokes up front
        type_str(&mut engine, "xyz", t0);
        let mut typed = 0;
        while engine.status() != Status::Finished {
            let idx = engine.session().cursor();
            let c = engine.session().expected_char(idx).unwrap();
            engine.submit_keystroke(c, secs(t0, 1));
            typed += 1;
            if engine.counters().correct_chars < 50 {
                assert_ne!(engine.status(), Status::Finished);
            }
        }

        assert_eq!(engine.counters().correct_chars, 50);
        assert_eq!(engine.counters().incorrect_chars, 3);
        assert_eq!(typed, 50);
    }

    #[test]
    fn test_time_mode_finishes_on_first_tick_past_target() {
        let (mut engine, ledger) = engine(Mode::Time, 15, "hello world");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);
        engine.tick(t0 + Duration::from_millis(14_900));
        assert_eq!(engine.status(), Status::Active);

        engine.tick(secs(t0, 15));
        assert_eq!(engine.status(), Status::Finished);
        assert_eq!(engine.summary().unwrap().duration_secs, 15.0);
        assert_eq!(ledger.cancelled(), 1);
    }

    #[test]
    fn test_idle_session_never_times_out() {
        let (mut engine, ledger) = engine(Mode::Time, 15, "hello");
        let t0 = Instant::now();

        engine.tick(secs(t0, 100));

        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(ledger.started(), 0);
    }

    #[test]
    fn test_tick_is_noop_for_untimed_modes() {
        let (mut engine, _) = engine(Mode::Quote, 0, "hello");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);
        let samples = engine.session().samples().len();
        engine.tick(secs(t0, 10));

        assert_eq!(engine.session().samples().len(), samples);
        assert_eq!(engine.stats().elapsed_secs, 0.0);
    }

    #[test]
    fn test_duplicate_timeout_ticks_finish_once() {
        let (mut engine, ledger) = engine(Mode::Time, 15, "hello");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);
        engine.tick(secs(t0, 15));
        engine.tick(secs(t0, 16));
        engine.tick(secs(t0, 17));

        let finished = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, EngineEvent::Finished(_)))
            .count();
        assert_eq!(finished, 1);
        assert_eq!(ledger.started(), 1);
        assert_eq!(ledger.cancelled(), 1);
    }

    #[test]
    fn test_keystrokes_after_finish_are_ignored() {
        let (mut engine, _) = engine(Mode::Quote, 0, "hi");
        let t0 = Instant::now();

        type_str(&mut engine, "hi", t0);
        let counters = engine.counters();
        engine.submit_keystroke('x', secs(t0, 5));
        engine.submit_backspace(secs(t0, 5));

        assert_eq!(engine.counters(), counters);
        assert_eq!(engine.session().cursor(), 2);
    }

    #[test]
    fn test_time_mode_keystroke_past_end_finishes() {
        let (mut engine, _) = engine(Mode::Time, 60, "ab");
        let t0 = Instant::now();

        type_str(&mut engine, "ab", t0);
        assert_eq!(engine.status(), Status::Active);

        engine.submit_keystroke('c', secs(t0, 3));
        assert_eq!(engine.status(), Status::Finished);
        assert_eq!(engine.counters().keystrokes, 2);
    }

    #[test]
    fn test_mission_finishes_on_text_end_or_time() {
        let (mut by_text, _) = engine(Mode::Mission, 30, "asdf");
        let t0 = Instant::now();
        type_str(&mut by_text, "asdf", t0);
        assert_eq!(by_text.status(), Status::Finished);

        let (mut by_time, _) = engine(Mode::Mission, 30, "asdf jkl;");
        by_time.submit_keystroke('a', t0);
        by_time.tick(secs(t0, 30));
        assert_eq!(by_time.status(), Status::Finished);
    }

    #[test]
    fn test_restart_cancels_running_tick() {
        let (mut engine, ledger) = engine(Mode::Time, 60, "hello");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);
        engine.restart(SessionConfig::new(Mode::Words, 10), "fresh text");

        assert_eq!(ledger.running(), 0);
        assert_eq!(ledger.cancelled(), 1);
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.counters(), Counters::default());
        assert_eq!(engine.session().text_string(), "fresh text");
        assert!(engine.summary().is_none());

        engine.submit_keystroke('f', t0);
        assert_eq!(ledger.started(), 2);
        assert_eq!(ledger.running(), 1);
    }

    #[test]
    fn test_restart_after_finish_does_not_cancel_again() {
        let (mut engine, ledger) = engine(Mode::Quote, 0, "a");
        let t0 = Instant::now();

        engine.submit_keystroke('a', t0);
        assert_eq!(ledger.cancelled(), 1);

        engine.restart(SessionConfig::new(Mode::Quote, 0), "b");
        engine.discard();
        assert_eq!(ledger.cancelled(), 1);
    }

    #[test]
    fn test_discard_active_session_ignores_later_input() {
        let (mut engine, ledger) = engine(Mode::Time, 15, "hello");
        let t0 = Instant::now();

        engine.submit_keystroke('h', t0);
        assert!(engine.is_ticking());

        engine.discard();
        assert_eq!(ledger.cancelled(), 1);
        assert_eq!(ledger.running(), 0);
        assert_eq!(engine.status(), Status::Finished);

        engine.submit_keystroke('e', t0 + Duration::from_secs(5));
        engine.submit_backspace(t0 + Duration::from_secs(6));
        engine.tick(t0 + Duration::from_secs(20));

        assert_eq!(engine.session().cursor(), 1);
        assert_eq!(engine.counters().keystrokes, 1);
        assert!(engine.summary().is_none());
        assert!(!engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, EngineEvent::Finished(_))));

        engine.discard();
        assert_eq!(ledger.cancelled(), 1);
    }

    #[test]
    fn test_dropping_engine_cancels_tick() {
        let (mut engine, ledger) = engine(Mode::Time, 60, "hello");
        engine.submit_keystroke('h', Instant::now());
        assert_eq!(ledger.running(), 1);

        drop(engine);
        assert_eq!(ledger.running(), 0);
    }

    #[test]
    fn test_samples_only_recorded_for_positive_wpm() {
        let (mut engine, _) = engine(Mode::Time, 600, "abcdefghij");
        let t0 = Instant::now();

        // zero elapsed: nothing recomputed
        engine.submit_keystroke('a', t0);
        assert!(engine.session().samples().is_empty());

        // one correct char over a minute rounds to 0 wpm: skipped
        engine.tick(secs(t0, 60));
        assert!(engine.session().samples().is_empty());

        type_str(&mut engine, "bcdefghij", secs(t0, 61));
        assert!(!engine.session().samples().is_empty());
        assert!(engine.session().samples().iter().all(|s| s.wpm > 0.0));
        assert_eq!(
            engine.session().wpm_samples().len(),
            engine.session().raw_wpm_samples().len()
        );
    }

    #[test]
    fn test_consistency_from_samples() {
        let (mut engine, _) = engine(Mode::Time, 600, &"a".repeat(100));
        let t0 = Instant::now();

        engine.submit_keystroke('a', t0);
        for i in 1..=20u64 {
            engine.submit_keystroke('a', t0 + Duration::from_millis(200 * i));
        }

        let samples = engine.session().wpm_samples();
        assert!(samples.len() >= 3);
        assert_eq!(engine.stats().consistency, stats::consistency(&samples));
        assert!((0.0..=100.0).contains(&engine.stats().consistency));
    }

    #[test]
    fn test_remaining_display_values() {
        let t0 = Instant::now();

        let (mut timed, _) = engine(Mode::Time, 30, "hello world");
        assert_eq!(timed.remaining(t0), Remaining::Seconds(30));
        timed.submit_keystroke('h', t0);
        assert_eq!(
            timed.remaining(t0 + Duration::from_millis(10_500)),
            Remaining::Seconds(20)
        );
        assert_eq!(timed.remaining(secs(t0, 45)), Remaining::Seconds(0));

        let (mut words, _) = engine(Mode::Words, 10, "hello world again");
        type_str(&mut words, "hello ", t0);
        assert_eq!(words.remaining(t0), Remaining::Words(9));

        let (mut quote, _) = engine(Mode::Quote, 0, "hello");
        quote.submit_keystroke('h', t0);
        assert_eq!(
            quote.remaining(t0 + Duration::from_millis(2_100)),
            Remaining::Elapsed(3)
        );
    }
}
