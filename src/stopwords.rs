use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Word lists compiled into the binary, one per language.
const BUNDLED: &[(&str, &str)] = &[
    (
        "english.json",
        include_str!("../resources/stopwords/english.json"),
    ),
    (
        "russian.json",
        include_str!("../resources/stopwords/russian.json"),
    ),
];

lazy_static::lazy_static! {
    static ref SHARED: Arc<Stopwords> = Arc::new(Stopwords::bundled());
}

/// On-disk shape of a stopword resource: `{"words": [...]}`.
#[derive(Debug, Deserialize)]
struct WordList {
    #[serde(default)]
    words: Vec<String>,
}

/// Immutable set of words excluded from indexing.
///
/// Built once, then shared read-only (`Arc<Stopwords>`) by every analyzer.
/// Stored words are always lowercase.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from an explicit word list (fixtures, custom deployments).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// The lists bundled with the crate.
    pub fn bundled() -> Self {
        let mut stopwords = Self::empty();
        for (name, content) in BUNDLED {
            stopwords.merge_source(name, content);
        }
        tracing::debug!(words = stopwords.len(), "loaded bundled stopwords");
        stopwords
    }

    /// Process-wide bundled set, initialized on first use.
    pub fn shared() -> Arc<Stopwords> {
        Arc::clone(&SHARED)
    }

    /// Load every file directly under `dir`.
    ///
    /// Failing to enumerate `dir` is fatal. A file that cannot be read or
    /// decoded is skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| Error::StopwordRoot {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut stopwords = Self::empty();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(content) => stopwords.merge_source(&path.display().to_string(), &content),
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "skipping stopword file")
                }
            }
        }

        tracing::debug!(dir = %dir.display(), words = stopwords.len(), "loaded stopwords");
        Ok(stopwords)
    }

    fn merge_source(&mut self, name: &str, content: &str) {
        match serde_json::from_str::<WordList>(content) {
            Ok(list) => self
                .words
                .extend(list.words.iter().map(|w| w.to_lowercase())),
            Err(err) => tracing::warn!(file = name, error = %err, "skipping stopword file"),
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
