use crate::intersection::intersect_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Inverted index: term -> set of document IDs
///
/// Also keeps the reverse mapping, document ID -> terms, so a document's
/// postings can be located without scanning every term.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashSet<String>>,
    doc_terms: HashMap<String, HashSet<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `doc_id` under every term. Pairs already present are left as is.
    pub fn add_document<I, S>(&mut self, doc_id: &str, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known = self.doc_terms.entry(doc_id.to_string()).or_default();

        for term in terms {
            let term = term.into();
            if known.contains(&term) {
                continue;
            }
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(doc_id.to_string());
            known.insert(term);
        }
    }

    /// Get document IDs containing a term
    pub fn get_documents(&self, term: &str) -> Option<&HashSet<String>> {
        self.postings.get(term)
    }

    /// Terms a document was indexed under
    pub fn terms_of(&self, doc_id: &str) -> Option<&HashSet<String>> {
        self.doc_terms.get(doc_id)
    }

    pub fn contains_document(&self, doc_id: &str) -> bool {
        self.doc_terms.contains_key(doc_id)
    }

    /// Number of documents containing a term
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashSet::len)
    }

    /// Get total number of indexed documents
    pub fn total_documents(&self) -> usize {
        self.doc_terms.len()
    }

    /// Search for documents matching ALL terms (AND query)
    ///
    /// Duplicate terms are ignored, and postings are merged smallest first.
    /// An empty term list, or any unknown term, yields no documents.
    pub fn search_and(&self, terms: &[String]) -> Vec<String> {
        let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();

        let mut sets = Vec::with_capacity(unique.len());
        for term in unique {
            match self.postings.get(term) {
                Some(docs) => sets.push(docs),
                None => return Vec::new(),
            }
        }
        sets.sort_by_key(|docs| docs.len());

        intersect_all(sets).into_iter().map(str::to_string).collect()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.total_documents(),
            total_terms: self.postings.len(),
            avg_docs_per_term: if self.postings.is_empty() {
                0.0
            } else {
                self.postings.values().map(HashSet::len).sum::<usize>() as f64
                    / self.postings.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_docs_per_term: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut index = InvertedIndex::new();
        index.add_document("1", ["rust", "fast", "rust"]);
        let before = index.stats();

        index.add_document("1", ["rust", "fast"]);

        assert_eq!(index.stats(), before);
        assert_eq!(index.doc_frequency("rust"), 1);
        assert_eq!(index.total_documents(), 1);
    }

    #[test]
    fn test_reverse_map() {
        let mut index = InvertedIndex::new();
        index.add_document("1", ["rust", "fast"]);
        index.add_document("1", ["safe"]);

        let expected: HashSet<String> = terms(&["rust", "fast", "safe"]).into_iter().collect();
        assert_eq!(index.terms_of("1"), Some(&expected));
        assert!(index.contains_document("1"));
        assert!(!index.contains_document("2"));
    }

    #[test]
    fn test_search_and() {
        let mut index = InvertedIndex::new();
        index.add_document("A", ["appl", "banana"]);
        index.add_document("B", ["appl"]);
        index.add_document("C", ["banana"]);

        assert_eq!(index.search_and(&terms(&["appl", "banana"])), vec!["A"]);
        assert_eq!(index.search_and(&terms(&["appl", "appl"])), vec!["A", "B"]);
        assert!(index.search_and(&terms(&["appl", "cherri"])).is_empty());
        assert!(index.search_and(&[]).is_empty());
    }

    #[test]
    fn test_stats() {
        let mut index = InvertedIndex::new();
        assert_eq!(index.stats().avg_docs_per_term, 0.0);

        index.add_document("1", ["a", "b"]);
        index.add_document("2", ["a"]);

        let stats = index.stats();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.total_terms, 2);
        assert_eq!(stats.avg_docs_per_term, 1.5);
    }
}
