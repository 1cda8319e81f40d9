use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::corpus::DEFAULT_TEXT;
use crate::time_series::WpmSample;

/// Kind of test being run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Time,
    Words,
    Quote,
    Zen,
    Custom,
    Mission,
}

impl Mode {
    /// `target_value` is a number of seconds for these modes.
    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Time | Mode::Mission)
    }

    /// Values offered for quick selection; empty when the mode takes no value.
    pub fn preset_values(&self) -> &'static [u32] {
        match self {
            Mode::Time => &[15, 30, 60, 120],
            Mode::Words => &[10, 25, 50, 100],
            Mode::Quote | Mode::Zen | Mode::Custom | Mode::Mission => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Active,
    Finished,
}

/// Judgment of a single text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharState {
    #[default]
    Unset,
    Correct,
    Incorrect,
}

/// One mistyped keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub index: usize,
    pub expected: char,
    pub typed: char,
    pub offset_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Seconds for timed modes, word count for `Words`, ignored otherwise.
    pub target_value: u32,
}

impl SessionConfig {
    pub fn new(mode: Mode, target_value: u32) -> Self {
        Self { mode, target_value }
    }
}

/// Judgment counters. Only the engine mutates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    /// Input attempts; never decremented, backspace included.
    pub keystrokes: usize,
}

impl Counters {
    /// Words typed using the fixed five-characters-per-word convention.
    pub fn words_typed(&self) -> usize {
        self.correct_chars / 5
    }
}

/// State of one test. Created per test and replaced on restart.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) text: Vec<char>,
    pub(crate) cursor: usize,
    pub(crate) char_states: Vec<CharState>,
    pub(crate) started_at: Option<Instant>,
    pub(crate) ended_at: Option<Instant>,
    pub(crate) status: Status,
    pub(crate) errors: Vec<ErrorEntry>,
    pub(crate) samples: Vec<WpmSample>,
}

impl Session {
    /// Empty text is replaced by the default text.
    pub fn new(config: SessionConfig, text: &str) -> Self {
        let text: Vec<char> = if text.is_empty() {
            DEFAULT_TEXT.chars().collect()
        } else {
            text.chars().collect()
        };

        Self {
            config,
            char_states: vec![CharState::Unset; text.len()],
            text,
            cursor: 0,
            started_at: None,
            ended_at: None,
            status: Status::Idle,
            errors: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn target_value(&self) -> u32 {
        self.config.target_value
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_states(&self) -> &[CharState] {
        &self.char_states
    }

    pub fn char_state(&self, idx: usize) -> Option<CharState> {
        self.char_states.get(idx).copied()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.text.get(idx).copied()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn wpm_samples(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wpm).collect()
    }

    pub fn raw_wpm_samples(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.raw_wpm).collect()
    }

    /// Seconds since the first keystroke, frozen once the session has ended.
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => self
                .ended_at
                .unwrap_or(now)
                .saturating_duration_since(start)
                .as_secs_f64(),
            None => 0.0,
        }
    }

    pub fn judged_positions(&self) -> usize {
        self.char_states
            .iter()
            .filter(|s| **s != CharState::Unset)
            .count()
    }
}
