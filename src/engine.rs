use crate::analyzer::Analyzer;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::index::{IndexStats, InvertedIndex};
use std::borrow::Borrow;

/// In-memory search engine: an analyzer plus the postings it produced.
///
/// The engine does no locking of its own. `put` takes `&mut self` and
/// `search` takes `&self`, so callers sharing an engine across threads wrap
/// it themselves (e.g. `Arc<RwLock<SearchEngine>>`).
pub struct SearchEngine {
    index: InvertedIndex,
    analyzer: Analyzer,
}

impl SearchEngine {
    /// Create an engine with the default analyzer
    pub fn new() -> Self {
        Self::with_analyzer(Analyzer::default())
    }

    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            index: InvertedIndex::new(),
            analyzer,
        }
    }

    /// Index one or more documents.
    ///
    /// Re-putting a document only adds (term, id) pairs that are not yet
    /// recorded. The batch is rejected up front if any document has an empty
    /// id, leaving the index untouched.
    pub fn put<I, D>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document>,
    {
        let documents: Vec<D> = documents.into_iter().collect();
        if documents.iter().any(|doc| doc.borrow().id.is_empty()) {
            return Err(Error::EmptyDocumentId);
        }

        for doc in &documents {
            let doc = doc.borrow();
            let terms = self.analyzer.analyze_unique(&doc.text);
            tracing::debug!(id = %doc.id, terms = terms.len(), "indexing document");
            self.index.add_document(&doc.id, terms);
        }

        Ok(())
    }

    /// Search for documents containing every term of the query.
    ///
    /// IDs are returned in ascending order. A query that normalizes to no
    /// terms matches nothing.
    pub fn search(&self, query: &str) -> Vec<String> {
        let terms = self.analyzer.analyze(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let ids = self.index.search_and(&terms);
        tracing::debug!(query, terms = terms.len(), hits = ids.len(), "search");
        ids
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Get total document count
    pub fn document_count(&self) -> usize {
        self.index.total_documents()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
