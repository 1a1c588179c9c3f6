use crate::error::Result;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::BufRead;

/// Page metadata read from `<title>` and `<meta>` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

impl MetaTag {
    fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.keywords.is_empty()
    }

    /// Title, description and keywords joined into indexable text.
    pub fn text(&self) -> String {
        [self.title.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.keywords.iter().map(String::as_str))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Extract metadata from markup.
///
/// Reads the first `<title>` and the `description`/`keywords` meta tags,
/// and stops reading as soon as all three are known. Unclosed void elements
/// such as `<meta ...>` are accepted.
pub fn parse<R: BufRead>(input: R) -> Result<MetaTag> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut meta = MetaTag::default();
    let mut in_title = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if is_tag(&e, b"title") => in_title = meta.title.is_empty(),
            Event::Start(e) | Event::Empty(e) if is_tag(&e, b"meta") => {
                read_meta(&reader, &e, &mut meta)?
            }
            Event::Text(e) if in_title => {
                meta.title = decode(&reader, &e)?.trim().to_string();
                in_title = false;
            }
            Event::End(e) if e.name().as_ref().eq_ignore_ascii_case(b"title") => in_title = false,
            Event::Eof => break,
            _ => {}
        }

        if meta.is_complete() {
            break;
        }
        buf.clear();
    }

    Ok(meta)
}

pub fn parse_str(markup: &str) -> Result<MetaTag> {
    parse(markup.as_bytes())
}

fn is_tag(e: &BytesStart, name: &[u8]) -> bool {
    e.name().as_ref().eq_ignore_ascii_case(name)
}

fn decode<R>(reader: &Reader<R>, raw: &[u8]) -> Result<String> {
    let text = reader.decoder().decode(raw)?;
    Ok(unescape_html(&text))
}

/// Resolves HTML5 named and numeric character references one at a time.
/// A reference that does not resolve is kept verbatim without affecting its
/// neighbours, and a bare `&` is literal text.
fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        match rest[1..].find(|c| c == '&' || c == ';').map(|i| i + 1) {
            Some(end) if rest.as_bytes()[end] == b';' => {
                let entity = &rest[..=end];
                match unescape_with(entity, resolve_html5_entity) {
                    Ok(decoded) => out.push_str(&decoded),
                    Err(_) => out.push_str(entity),
                }
                rest = &rest[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn read_meta<R>(reader: &Reader<R>, e: &BytesStart, meta: &mut MetaTag) -> Result<()> {
    let mut name = None;
    let mut content = None;

    for attr in e.html_attributes().flatten() {
        match attr.key.as_ref() {
            b"name" => name = Some(decode(reader, &attr.value)?.to_ascii_lowercase()),
            b"content" => content = Some(decode(reader, &attr.value)?),
            _ => {}
        }
    }

    let (Some(name), Some(content)) = (name, content) else {
        return Ok(());
    };

    match name.as_str() {
        "description" => meta.description = content.trim().to_string(),
        "keywords" => meta.keywords.extend(
            content
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        ),
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>Test Title</title>
        <meta name="description" content="Test Description">
        <meta name="keywords" content="keyword1, keyword2, keyword3">
    </head>
    <body>
        <h1>Hello, World!</h1>
    </body>
</html>"#;

    #[test]
    fn test_empty_reader() -> Result<()> {
        assert_eq!(parse_str("")?, MetaTag::default());
        Ok(())
    }

    #[test]
    fn test_with_all_attributes() -> Result<()> {
        let meta = parse_str(PAGE)?;

        assert_eq!(meta.title, "Test Title");
        assert_eq!(meta.description, "Test Description");
        assert_eq!(meta.keywords, vec!["keyword1", "keyword2", "keyword3"]);
        assert_eq!(
            meta.text(),
            "Test Title Test Description keyword1 keyword2 keyword3"
        );
        Ok(())
    }

    #[test]
    fn test_self_closing_and_case_insensitive() -> Result<()> {
        let meta = parse_str(
            r#"<html><HEAD><TITLE>Fish &amp; Chips</TITLE>
            <meta name="Description" content="Fried &quot;food&quot;" />
            <meta content="fish,, chips ," name="KEYWORDS"/></HEAD></html>"#,
        )?;

        assert_eq!(meta.title, "Fish & Chips");
        assert_eq!(meta.description, "Fried \"food\"");
        assert_eq!(meta.keywords, vec!["fish", "chips"]);
        Ok(())
    }

    #[test]
    fn test_first_title_wins_and_keywords_accumulate() -> Result<()> {
        let meta = parse_str(
            r#"<html><head><title>First</title><title>Second</title>
            <meta name="keywords" content="a, b">
            <meta name="keywords" content="c"></head></html>"#,
        )?;

        assert_eq!(meta.title, "First");
        assert!(meta.description.is_empty());
        assert_eq!(meta.keywords, vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_stops_once_complete() -> Result<()> {
        // The trailing garbage is never read.
        let meta = parse_str(
            r#"<head><title>T</title><meta name="description" content="D">
            <meta name="keywords" content="k"></head><body></wrong attr=></"#,
        )?;

        assert_eq!(meta.title, "T");
        assert_eq!(meta.keywords, vec!["k"]);
        Ok(())
    }

    #[test]
    fn test_html_entities_decoded() -> Result<()> {
        let meta = parse_str(
            r#"<title>Tom &amp; Jerry &mdash; Show</title>
            <meta name="description" content="A&nbsp;B &eacute;t&#233; &#x2014;">"#,
        )?;

        assert_eq!(meta.title, "Tom & Jerry \u{2014} Show");
        assert_eq!(meta.description, "A\u{a0}B \u{e9}t\u{e9} \u{2014}");
        Ok(())
    }

    #[test]
    fn test_unknown_entity_kept_alongside_known_ones() -> Result<()> {
        let meta = parse_str("<title>&bogus; Tom &amp; Jerry &mdash; R&D</title>")?;
        assert_eq!(meta.title, "&bogus; Tom & Jerry \u{2014} R&D");
        Ok(())
    }

    #[test]
    fn test_entity_names_are_not_indexed() -> Result<()> {
        let meta = parse_str("<title>Tom &amp; Jerry &mdash; Show</title>")?;
        let mut engine = crate::SearchEngine::new();
        engine.put([crate::Document::new("page", meta.text())])?;

        assert_eq!(engine.search("jerry"), vec!["page"]);
        assert!(engine.search("amp").is_empty());
        assert!(engine.search("mdash").is_empty());
        Ok(())
    }
}
