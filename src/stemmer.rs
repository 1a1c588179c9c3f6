use rust_stemmers::{Algorithm, Stemmer as Snowball};
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_script::{Script as UnicodeScript, UnicodeScript as _};

/// Final normalization step, applied after the filter stages.
pub trait Stemmer: Send + Sync {
    fn stem(&self, tokens: Vec<String>) -> Vec<String>;
}

impl<F> Stemmer for F
where
    F: Fn(Vec<String>) -> Vec<String> + Send + Sync,
{
    fn stem(&self, tokens: Vec<String>) -> Vec<String> {
        self(tokens)
    }
}

/// Stems a single word; `None` means the word could not be stemmed.
pub trait WordStemmer: Send + Sync {
    fn stem_word(&self, word: &str) -> Option<String>;
}

impl<F> WordStemmer for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn stem_word(&self, word: &str) -> Option<String> {
        self(word)
    }
}

impl WordStemmer for Snowball {
    fn stem_word(&self, word: &str) -> Option<String> {
        let stem = self.stem(word);
        (!stem.is_empty()).then(|| stem.into_owned())
    }
}

/// Script of a token, decided by its first code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    Numeric,
    Other,
}

impl Script {
    pub fn of(c: char) -> Self {
        match c.script() {
            UnicodeScript::Latin => Script::Latin,
            UnicodeScript::Cyrillic => Script::Cyrillic,
            _ if c.general_category_group() == GeneralCategoryGroup::Number => Script::Numeric,
            _ => Script::Other,
        }
    }

    /// Classify a token; empty tokens have no script.
    pub fn of_token(token: &str) -> Self {
        token.chars().next().map_or(Script::Other, Script::of)
    }
}

/// What happens to a token with an unrecognized script or a failed stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    Drop,
    /// Keep the token unstemmed.
    Retain,
}

impl FallbackPolicy {
    fn apply(self, token: String) -> Option<String> {
        match self {
            FallbackPolicy::Drop => None,
            FallbackPolicy::Retain if token.is_empty() => None,
            FallbackPolicy::Retain => Some(token),
        }
    }
}

/// Routes each token to a stemming strategy by script: English snowball for
/// Latin, Russian snowball for Cyrillic, pass-through for numbers, and the
/// fallback policy for everything else.
pub struct ScriptStemmer {
    latin: Box<dyn WordStemmer>,
    cyrillic: Box<dyn WordStemmer>,
    fallback: FallbackPolicy,
}

impl ScriptStemmer {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self {
            latin: Box::new(Snowball::create(Algorithm::English)),
            cyrillic: Box::new(Snowball::create(Algorithm::Russian)),
            fallback,
        }
    }

    /// Replace the stemmer used for Latin-script tokens.
    pub fn with_latin(mut self, stemmer: impl WordStemmer + 'static) -> Self {
        self.latin = Box::new(stemmer);
        self
    }

    /// Replace the stemmer used for Cyrillic-script tokens.
    pub fn with_cyrillic(mut self, stemmer: impl WordStemmer + 'static) -> Self {
        self.cyrillic = Box::new(stemmer);
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn stem_token(&self, token: String) -> Option<String> {
        match Script::of_token(&token) {
            Script::Latin => self.stem_with(self.latin.as_ref(), token),
            Script::Cyrillic => self.stem_with(self.cyrillic.as_ref(), token),
            Script::Numeric => Some(token),
            Script::Other => self.fallback.apply(token),
        }
    }

    fn stem_with(&self, stemmer: &dyn WordStemmer, token: String) -> Option<String> {
        match stemmer.stem_word(&token) {
            Some(stem) => Some(stem),
            None => {
                tracing::debug!(token = %token, "stemming failed");
                self.fallback.apply(token)
            }
        }
    }
}

impl Default for ScriptStemmer {
    fn default() -> Self {
        Self::new(FallbackPolicy::default())
    }
}

impl Stemmer for ScriptStemmer {
    fn stem(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter_map(|t| self.stem_token(t))
            .collect()
    }
}
