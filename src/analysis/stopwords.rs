use std::{collections::HashSet, fs, path::Path};
use tracing::{debug, warn};

const BUNDLED_ENGLISH: &str = include_str!("../../resources/stopwords/english.txt");

/// Lowercase words that never count as keywords.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The bundled English list.
    pub fn english() -> Self {
        Self::parse(BUNDLED_ENGLISH)
    }

    /// One word per line; blank lines and surrounding whitespace ignored.
    pub fn parse(list: &str) -> Self {
        let words = list
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// Bundled list unless an override file is given. An unreadable override
    /// leaves the set empty rather than failing startup.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::english();
        };

        match fs::read_to_string(path) {
            Ok(list) => {
                let set = Self::parse(&list);
                debug!(path = %path.display(), count = set.len(), "Loaded stopword override");
                set
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not load stopwords, keyword extraction will keep every word"
                );
                Self::default()
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
