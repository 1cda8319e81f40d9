//! Speed, accuracy and consistency metrics.
//!
//! All functions are pure. Anything that would divide by zero or produce a
//! non-finite value resolves to a fixed default instead.

use crate::session::Counters;

/// Characters per word when normalising to words per minute.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Minimum number of wpm samples before consistency is computed.
pub const MIN_CONSISTENCY_SAMPLES: usize = 3;

/// Values shown while a session is running, and the final result once it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub elapsed_secs: f64,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            wpm: 0.0,
            raw_wpm: 0.0,
            accuracy: 100.0,
            consistency: 100.0,
            elapsed_secs: 0.0,
        }
    }
}

fn per_minute(chars: usize, elapsed_secs: f64) -> f64 {
    let minutes = elapsed_secs / 60.0;
    let rate = (chars as f64 / CHARS_PER_WORD / minutes).round();

    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

/// Correct characters per minute in five-character words.
pub fn wpm(correct_chars: usize, elapsed_secs: f64) -> f64 {
    per_minute(correct_chars, elapsed_secs)
}

/// Every keystroke per minute in five-character words.
pub fn raw_wpm(keystrokes: usize, elapsed_secs: f64) -> f64 {
    per_minute(keystrokes, elapsed_secs)
}

pub fn accuracy(correct_chars: usize, keystrokes: usize) -> f64 {
    if keystrokes == 0 {
        return 100.0;
    }
    (correct_chars as f64 / keystrokes as f64 * 100.0)
        .round()
        .clamp(0.0, 100.0)
}

/// 100 minus the coefficient of variation of the samples, clamped to [0, 100].
pub fn consistency(wpm_samples: &[f64]) -> f64 {
    if wpm_samples.len() < MIN_CONSISTENCY_SAMPLES {
        return 100.0;
    }

    match (mean(wpm_samples), std_dev(wpm_samples)) {
        (Some(m), Some(sd)) if m > 0.0 => {
            let value = (100.0 - sd / m * 100.0).round();
            if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                100.0
            }
        }
        _ => 100.0,
    }
}

/// Recomputes speed and accuracy for a positive elapsed time.
///
/// Returns `None` when no time has elapsed yet; the caller keeps its
/// previous values in that case. Consistency is carried over from
/// `previous` since it depends on the sample history.
pub fn recompute(counters: &Counters, elapsed_secs: f64, previous: &LiveStats) -> Option<LiveStats> {
    if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
        return None;
    }

    Some(LiveStats {
        wpm: wpm(counters.correct_chars, elapsed_secs),
        raw_wpm: raw_wpm(counters.keystrokes, elapsed_secs),
        accuracy: accuracy(counters.correct_chars, counters.keystrokes),
        consistency: previous.consistency,
        elapsed_secs,
    })
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
