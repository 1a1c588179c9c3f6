use crate::document::Document;
use crate::error::Result;
use crate::htmlmeta::{self, MetaTag};
use crate::http::RetryClient;
use tokio_util::sync::CancellationToken;

/// A fetched page: its metadata and the document built from it.
#[derive(Debug, Clone)]
pub struct Page {
    pub meta: MetaTag,
    pub document: Document,
}

/// Fetch `url`, extract its metadata and wrap it as a document.
///
/// The document is keyed by the URL, its text is the metadata text, and the
/// raw markup travels along as the body.
pub async fn fetch_page(
    client: &RetryClient,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Page> {
    let request = client.client().get(url).build()?;
    let response = client.execute_with_cancel(request, cancel).await?;
    let body = response.bytes().await?;

    let meta = htmlmeta::parse(body.as_ref())?;
    tracing::debug!(url, title = %meta.title, keywords = meta.keywords.len(), "fetched page");

    let document = Document::new(url, meta.text()).with_body(body.to_vec());
    Ok(Page { meta, document })
}
