use serde::{Deserialize, Serialize};

/// Document represents an indexable unit of text.
///
/// Only `text` is analyzed. `body` is an opaque payload the caller may carry
/// along (for instance the raw markup a page's text was extracted from).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<u8>>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_optional_in_json() {
        let doc: Document = serde_json::from_str(r#"{"id":"1","text":"hello"}"#).unwrap();
        assert_eq!(doc, Document::new("1", "hello"));

        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("body"));
    }
}
