use include_dir::{include_dir, Dir};
use serde::Deserialize;
use tracing::warn;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

/// Used whenever a source list comes up empty, so a session never gets empty text.
pub const DEFAULT_TEXT: &str = "the quick brown fox jumps over the lazy dog";

#[derive(Deserialize, Clone, Debug, Default)]
struct WordListFile {
    words: Vec<String>,
    #[serde(default)]
    numbers: Vec<String>,
}

/// Static text material the generator draws from.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    pub words: Vec<String>,
    pub numbers: Vec<String>,
    pub quotes: Vec<String>,
}

impl Corpus {
    pub fn new(words: Vec<String>, numbers: Vec<String>, quotes: Vec<String>) -> Self {
        Self {
            words,
            numbers,
            quotes,
        }
    }

    /// The word list, numeric tokens and quotes bundled into the binary.
    pub fn embedded() -> Self {
        let list: WordListFile = read_embedded("english.json").unwrap_or_default();
        let quotes: Vec<String> = read_embedded("quotes.json").unwrap_or_default();

        if list.words.is_empty() {
            warn!("embedded word list is empty, generator will use the default text");
        }

        Self {
            words: list.words,
            numbers: list.numbers,
            quotes,
        }
    }
}

pub(crate) fn read_embedded<T: for<'de> Deserialize<'de>>(file_name: &str) -> Option<T> {
    let file = DATA_DIR.get_file(file_name)?;
    let contents = file.contents_utf8()?;

    match serde_json::from_str(contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(file = file_name, error = %e, "unable to parse embedded data");
            None
        }
    }
}
