use crate::stopwords::Stopwords;
use std::sync::Arc;

/// One stage of the normalization pipeline.
///
/// Stages are pure and total, and must keep the relative order of the tokens
/// they let through.
pub trait Filter: Send + Sync {
    fn filter(&self, tokens: Vec<String>) -> Vec<String>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Filter for F
where
    F: Fn(Vec<String>) -> Vec<String> + Send + Sync,
{
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        self(tokens)
    }
}

/// Unicode-aware lowercasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseFilter;

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().map(|t| t.to_lowercase()).collect()
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Drops tokens present in the stopword set.
///
/// Matching is exact, and stored stopwords are lowercase, so this stage
/// belongs after [`LowercaseFilter`].
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: Arc<Stopwords>,
}

impl StopwordFilter {
    pub fn new(stopwords: Arc<Stopwords>) -> Self {
        Self { stopwords }
    }
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new(Stopwords::shared())
    }
}

impl Filter for StopwordFilter {
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }

    fn name(&self) -> &'static str {
        "stopwords"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_lowercase() {
        let once = LowercaseFilter.filter(strings(&["ABC", "ÄÖÜ", "Мир"]));
        assert_eq!(once, strings(&["abc", "äöü", "мир"]));

        let twice = LowercaseFilter.filter(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_stopwords() {
        let filter = StopwordFilter::new(Arc::new(Stopwords::from_words(["the"])));
        assert_eq!(filter.filter(strings(&["the", "cat"])), strings(&["cat"]));
    }

    #[test]
    fn test_stopwords_exact_match_keeps_order() {
        let filter = StopwordFilter::new(Arc::new(Stopwords::from_words(["the", "a"])));
        let tokens = filter.filter(strings(&["The", "a", "dog", "the", "and", "cat"]));
        assert_eq!(tokens, strings(&["The", "dog", "and", "cat"]));
    }

    #[test]
    fn test_closure_stage() {
        let short = |tokens: Vec<String>| -> Vec<String> {
            tokens.into_iter().filter(|t| t.chars().count() > 2).collect()
        };
        assert_eq!(short.filter(strings(&["go", "rust"])), strings(&["rust"]));
        assert_eq!(short.name(), "custom");
        assert_eq!(LowercaseFilter.name(), "lowercase");
    }
}
