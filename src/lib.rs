// Re-export main components
pub mod analyzer;
pub mod api;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod htmlmeta;
pub mod http;
pub mod index;
pub mod intersection;
pub mod page;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use document::Document;
pub use engine::SearchEngine;
pub use filter::{Filter, LowercaseFilter, StopwordFilter};
pub use htmlmeta::MetaTag;
pub use http::{RetryClient, RetryPolicy};
pub use index::{IndexStats, InvertedIndex};
pub use stemmer::{FallbackPolicy, Script, ScriptStemmer, Stemmer, WordStemmer};
pub use stopwords::Stopwords;
pub use tokenizer::{tokenize, Tokenizer, UnicodeTokenizer, WordBoundaryTokenizer};

// Re-export error types
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
