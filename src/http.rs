use crate::error::{Error, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Request, Response, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Backoff bounds and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_wait(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self.max_wait = max_wait;
        self
    }
}

/// `min * 2^attempt`, capped at `max` (overflow included).
pub fn exponential_backoff(min: Duration, max: Duration, attempt: u32) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| min.checked_mul(factor))
        .map_or(max, |wait| wait.min(max))
}

/// HTTP client that retries throttled and unavailable responses.
///
/// A 429 or 503 carrying `Retry-After: <seconds>` is retried after exactly
/// that delay, outside the retry budget. Without the header, and for
/// transport failures, the client backs off exponentially until
/// `max_retries` is spent. Any other 4xx/5xx is returned at once.
#[derive(Debug, Clone, Default)]
pub struct RetryClient {
    client: Client,
    policy: RetryPolicy,
}

impl RetryClient {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Underlying client, for building requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn get(&self, url: &str) -> Result<Response> {
        let request = self.client.get(url).build()?;
        self.execute(request).await
    }

    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.execute_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`execute`](Self::execute), but gives up with
    /// [`Error::Cancelled`] as soon as `cancel` fires.
    pub async fn execute_with_cancel(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let req = request.try_clone().ok_or(Error::RequestNotCloneable)?;
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                outcome = self.client.execute(req) => outcome,
            };

            let last = match outcome {
                Ok(resp) if is_retryable(resp.status()) => {
                    let status = resp.status();
                    if let Some(delay) = retry_after(&resp) {
                        tracing::info!(%status, url = %request.url(), ?delay, "honoring Retry-After");
                        wait(delay, cancel).await?;
                        continue;
                    }
                    Error::Status(status)
                }
                Ok(resp) if is_failure(resp.status()) => return Err(Error::Status(resp.status())),
                Ok(resp) => return Ok(resp),
                Err(err) => Error::Transport(err),
            };

            if attempt >= self.policy.max_retries {
                tracing::warn!(url = %request.url(), attempts = attempt + 1, error = %last, "giving up");
                return Err(last);
            }

            let delay = exponential_backoff(self.policy.min_wait, self.policy.max_wait, attempt);
            tracing::info!(url = %request.url(), attempt, ?delay, error = %last, "retrying");
            wait(delay, cancel).await?;
            attempt += 1;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

fn is_failure(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// `Retry-After` as a whole number of seconds.
fn retry_after(resp: &Response) -> Option<Duration> {
    let value = resp.headers().get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

async fn wait(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, HeaderValue};
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Script {
        hits: Arc<AtomicUsize>,
        failures: usize,
        status: StatusCode,
        retry_after: Option<&'static str>,
    }

    async fn scripted(State(script): State<Script>) -> (StatusCode, HeaderMap, &'static str) {
        let hit = script.hits.fetch_add(1, Ordering::SeqCst);
        let mut headers = HeaderMap::new();
        if hit < script.failures {
            if let Some(secs) = script.retry_after {
                headers.insert(RETRY_AFTER, HeaderValue::from_static(secs));
            }
            return (script.status, headers, "busy");
        }
        (StatusCode::OK, headers, "ok")
    }

    /// Serve the script on an ephemeral port; returns the URL and hit counter.
    async fn serve(
        failures: usize,
        status: StatusCode,
        retry_after: Option<&'static str>,
    ) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let script = Script {
            hits: hits.clone(),
            failures,
            status,
            retry_after,
        };
        let app = Router::new().route("/", get(scripted)).with_state(script);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), hits)
    }

    fn fast_client(max_retries: u32) -> RetryClient {
        let policy = RetryPolicy::default()
            .with_max_retries(max_retries)
            .with_wait(Duration::from_millis(1), Duration::from_millis(5));
        RetryClient::new(Client::new(), policy)
    }

    #[test]
    fn test_exponential_backoff() {
        let min = Duration::from_millis(100);
        let max = Duration::from_secs(1);
        assert_eq!(exponential_backoff(min, max, 0), min);
        assert_eq!(exponential_backoff(min, max, 2), Duration::from_millis(400));
        assert_eq!(exponential_backoff(min, max, 4), max);
        assert_eq!(exponential_backoff(min, max, 64), max);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let (url, hits) = serve(2, StatusCode::SERVICE_UNAVAILABLE, None).await;

        let resp = fast_client(3).get(&url).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let (url, hits) = serve(usize::MAX, StatusCode::TOO_MANY_REQUESTS, None).await;

        let err = fast_client(2).get(&url).await.unwrap_err();

        assert!(matches!(err, Error::Status(StatusCode::TOO_MANY_REQUESTS)));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_after_does_not_spend_budget() {
        let (url, hits) = serve(4, StatusCode::SERVICE_UNAVAILABLE, Some("0")).await;

        let resp = fast_client(0).get(&url).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_transport_errors_retried_with_backoff() {
        // Nothing listens on a port whose listener was dropped.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{addr}/");

        let start = std::time::Instant::now();
        let err = fast_client(2).get(&url).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        // Two backoff waits of 1ms and 2ms precede the final attempt.
        assert!(start.elapsed() >= Duration::from_millis(3));
    }

    #[tokio::test]
    async fn test_retry_after_date_falls_back_to_backoff() {
        let (url, hits) = serve(
            usize::MAX,
            StatusCode::SERVICE_UNAVAILABLE,
            Some("Wed, 21 Oct 2015 07:28:00 GMT"),
        )
        .await;

        let err = fast_client(2).get(&url).await.unwrap_err();

        assert!(matches!(err, Error::Status(StatusCode::SERVICE_UNAVAILABLE)));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let (url, hits) = serve(usize::MAX, StatusCode::NOT_FOUND, None).await;

        let err = fast_client(3).get(&url).await.unwrap_err();

        assert!(matches!(err, Error::Status(StatusCode::NOT_FOUND)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_is_cancellable() {
        let (url, hits) = serve(usize::MAX, StatusCode::SERVICE_UNAVAILABLE, Some("30")).await;
        let client = fast_client(3);
        let request = Client::new().get(&url).build().unwrap();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = client
            .execute_with_cancel(request, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
