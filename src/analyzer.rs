use crate::filter::{Filter, LowercaseFilter, StopwordFilter};
use crate::stemmer::{FallbackPolicy, ScriptStemmer, Stemmer};
use crate::stopwords::Stopwords;
use crate::tokenizer::{Tokenizer, UnicodeTokenizer};
use std::collections::HashSet;
use std::sync::Arc;

/// The normalization pipeline: tokenizer, ordered filter stages, stemmer.
///
/// The same analyzer runs over documents at ingestion and over queries at
/// search time, so both sides produce comparable terms.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    filters: Vec<Box<dyn Filter>>,
    stemmer: Box<dyn Stemmer>,
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Full analysis pipeline
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenizer.tokenize(text);
        let tokens = self
            .filters
            .iter()
            .fold(tokens, |tokens, stage| stage.filter(tokens));
        self.stemmer.stem(tokens)
    }

    /// Analyze and return unique terms (for indexing)
    pub fn analyze_unique(&self, text: &str) -> HashSet<String> {
        self.analyze(text).into_iter().collect()
    }

    /// Names of the filter stages, in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        AnalyzerBuilder::new().build()
    }
}

/// Configures an [`Analyzer`].
///
/// The default stage list is lowercase then stopword removal. Stages added
/// with [`prepend_filter`](Self::prepend_filter) run before it, stages added
/// with [`filter`](Self::filter) run after it, each group in insertion order.
pub struct AnalyzerBuilder {
    tokenizer: Box<dyn Tokenizer>,
    stopwords: Arc<Stopwords>,
    before: Vec<Box<dyn Filter>>,
    after: Vec<Box<dyn Filter>>,
    default_filters: bool,
    stemmer: Option<Box<dyn Stemmer>>,
    fallback: FallbackPolicy,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(UnicodeTokenizer),
            stopwords: Stopwords::shared(),
            before: Vec::new(),
            after: Vec::new(),
            default_filters: true,
            stemmer: None,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Stopword set used by the default stopword stage.
    pub fn stopwords(mut self, stopwords: Arc<Stopwords>) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn prepend_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.before.push(Box::new(filter));
        self
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.after.push(Box::new(filter));
        self
    }

    /// Skip the lowercase and stopword stages.
    pub fn without_default_filters(mut self) -> Self {
        self.default_filters = false;
        self
    }

    /// Replace the script-dispatching stemmer entirely.
    pub fn stemmer(mut self, stemmer: impl Stemmer + 'static) -> Self {
        self.stemmer = Some(Box::new(stemmer));
        self
    }

    /// Policy of the default stemmer; ignored when a custom stemmer is set.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> Analyzer {
        let mut filters = self.before;
        if self.default_filters {
            filters.push(Box::new(LowercaseFilter));
            filters.push(Box::new(StopwordFilter::new(self.stopwords)));
        }
        filters.extend(self.after);

        let fallback = self.fallback;
        let stemmer = self
            .stemmer
            .unwrap_or_else(|| Box::new(ScriptStemmer::new(fallback)) as Box<dyn Stemmer>);

        Analyzer {
            tokenizer: self.tokenizer,
            filters,
            stemmer,
        }
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
