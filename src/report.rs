use itertools::Itertools;

use crate::session::{CharState, ErrorEntry, Session};

pub const PROBLEM_KEY_LIMIT: usize = 5;

/// Per-character totals for the results screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharBreakdown {
    pub correct: usize,
    pub incorrect: usize,
    /// Always zero: input is judged in place and never inserted.
    pub extra: usize,
    pub missed: usize,
}

impl CharBreakdown {
    pub fn of(session: &Session) -> Self {
        let cursor = session.cursor();
        session
            .char_states()
            .iter()
            .enumerate()
            .fold(Self::default(), |mut acc, (idx, state)| {
                if idx < cursor {
                    match state {
                        CharState::Correct => acc.correct += 1,
                        CharState::Incorrect => acc.incorrect += 1,
                        CharState::Unset => {}
                    }
                } else {
                    acc.missed += 1;
                }
                acc
            })
    }
}

impl std::fmt::Display for CharBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.correct, self.incorrect, self.extra, self.missed
        )
    }
}

/// Label used for a key on the results screen.
pub fn key_label(c: char) -> String {
    if c == ' ' {
        "Space".to_string()
    } else {
        c.to_string()
    }
}

/// Expected characters ranked by how often they were mistyped.
///
/// Ties keep the order in which the key was first missed.
pub fn problem_keys(errors: &[ErrorEntry], limit: usize) -> Vec<(String, usize)> {
    errors
        .iter()
        .map(|e| e.expected)
        .counts()
        .into_iter()
        .sorted_by_key(|(c, count)| {
            let first_seen = errors.iter().position(|e| e.expected == *c);
            (std::cmp::Reverse(*count), first_seen)
        })
        .take(limit)
        .map(|(c, count)| (key_label(c), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SessionEngine;
    use crate::session::{Mode, SessionConfig};
    use crate::timer::ManualScheduler;
    use std::time::Instant;

    fn error(index: usize, expected: char) -> ErrorEntry {
        ErrorEntry {
            index,
            expected,
            typed: 'x',
            offset_ms: 0,
        }
    }

    #[test]
    fn breakdown_counts_judged_and_missed() {
        let mut engine = SessionEngine::new(
            SessionConfig::new(Mode::Time, 60),
            "hello world",
            Box::new(ManualScheduler::new()),
        );
        let t0 = Instant::now();
        for c in "hxllo".chars() {
            engine.submit_keystroke(c, t0);
        }

        let breakdown = CharBreakdown::of(engine.session());
        assert_eq!(
            breakdown,
            CharBreakdown {
                correct: 4,
                incorrect: 1,
                extra: 0,
                missed: 6,
            }
        );
        assert_eq!(breakdown.to_string(), "4/1/0/6");
    }

    #[test]
    fn problem_keys_ranked_by_count() {
        let errors = vec![
            error(0, 'a'),
            error(3, ' '),
            error(5, ' '),
            error(7, 'e'),
            error(9, 'e'),
            error(11, ' '),
        ];

        assert_eq!(
            problem_keys(&errors, PROBLEM_KEY_LIMIT),
            vec![
                ("Space".to_string(), 3),
                ("e".to_string(), 2),
                ("a".to_string(), 1)
            ]
        );
    }

    #[test]
    fn problem_keys_respects_limit() {
        let errors: Vec<ErrorEntry> = "abcdefg"
            .chars()
            .enumerate()
            .map(|(i, c)| error(i, c))
            .collect();

        let keys = problem_keys(&errors, PROBLEM_KEY_LIMIT);
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0].0, "a");
        assert_eq!(keys[4].0, "e");
    }

    #[test]
    fn no_errors_no_problem_keys() {
        assert!(problem_keys(&[], PROBLEM_KEY_LIMIT).is_empty());
    }
}
