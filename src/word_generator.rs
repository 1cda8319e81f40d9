use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::corpus::{Corpus, DEFAULT_TEXT};
use crate::session::Mode;

/// Assumed typing pace used to size time-mode text.
const ESTIMATED_WPM: f64 = 40.0;
/// Headroom so generated text outlasts the timer.
const SAFETY_MARGIN: f64 = 1.5;
const MIN_TIMED_WORDS: usize = 50;
const FALLBACK_WORD_COUNT: usize = 100;
const ZEN_WORD_COUNT: usize = 50;
const PUNCTUATION_CHANCE: f64 = 0.1;
const PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

pub const CUSTOM_PLACEHOLDER: &str =
    "Type your custom text here. This feature allows you to practice with your own content.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub punctuation: bool,
    pub numbers: bool,
}

/// Everything needed to produce the text for one session.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub mode: Mode,
    pub value: u32,
    pub options: GeneratorOptions,
    /// Caller-supplied text for `Custom` and `Mission` sessions.
    pub supplied: Option<String>,
}

impl TextRequest {
    pub fn new(mode: Mode, value: u32) -> Self {
        Self {
            mode,
            value,
            options: GeneratorOptions::default(),
            supplied: None,
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_supplied(mut self, text: impl Into<String>) -> Self {
        self.supplied = Some(text.into());
        self
    }
}

/// Number of words drawn for a `Time` or `Words` test.
pub fn target_word_count(mode: Mode, value: u32) -> usize {
    match mode {
        Mode::Words => value as usize,
        Mode::Time => {
            let estimate = (ESTIMATED_WPM * (value as f64 / 60.0) * SAFETY_MARGIN).ceil() as usize;
            estimate.max(MIN_TIMED_WORDS)
        }
        _ => FALLBACK_WORD_COUNT,
    }
}

/// Produces session text. Never returns an empty string.
pub struct TextGenerator {
    corpus: Corpus,
}

impl TextGenerator {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }

    pub fn embedded() -> Self {
        Self::new(Corpus::embedded())
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn generate<R: Rng + ?Sized>(&self, request: &TextRequest, rng: &mut R) -> String {
        let text = match request.mode {
            Mode::Time | Mode::Words => self.random_words(
                target_word_count(request.mode, request.value),
                request.options,
                rng,
            ),
            Mode::Quote => self.random_quote(rng),
            Mode::Zen => self.zen_text(),
            Mode::Custom => supplied_or(request.supplied.as_deref(), CUSTOM_PLACEHOLDER),
            Mode::Mission => supplied_or(request.supplied.as_deref(), DEFAULT_TEXT),
        };

        if text.is_empty() {
            warn!(mode = %request.mode, "no source text available, using default");
            return DEFAULT_TEXT.to_string();
        }
        text
    }

    fn random_words<R: Rng + ?Sized>(
        &self,
        count: usize,
        options: GeneratorOptions,
        rng: &mut R,
    ) -> String {
        let mut pool: Vec<&str> = self.corpus.words.iter().map(String::as_str).collect();
        if options.numbers {
            pool.extend(self.corpus.numbers.iter().map(String::as_str));
        }

        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(word) = pool.choose(rng) else {
                break;
            };
            let mut word = word.to_string();
            if options.punctuation && rng.gen_bool(PUNCTUATION_CHANCE) {
                if let Some(p) = PUNCTUATION.choose(rng) {
                    word.push(*p);
                }
            }
            words.push(word);
        }
        words.join(" ")
    }

    fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.corpus.quotes.choose(rng).cloned().unwrap_or_default()
    }

    /// Deterministic: the first words longer than two characters, in list order.
    fn zen_text(&self) -> String {
        self.corpus
            .words
            .iter()
            .filter(|w| w.chars().count() > 2)
            .take(ZEN_WORD_COUNT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn supplied_or(supplied: Option<&str>, fallback: &str) -> String {
    match supplied {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}
