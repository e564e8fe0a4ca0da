//! HTTP requests with retry and backoff
//!
//! [`RetryingClient`] sends a request through an [`HttpTransport`] and, when the
//! [`RetryPolicy`] says so, waits and sends it again. With the default policy a
//! request is sent exactly once.

use async_trait::async_trait;
use reqwest::{Method, Request, Response, Url};
use runtime_helpers_common::constants::{DEFAULT_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Sends a single HTTP request
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, FetchError> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

pub type DelayFn = dyn Fn(u32, Option<&FetchError>, Option<&Response>) -> Duration + Send + Sync;

pub type RetryOnFn = dyn Fn(u32, Option<&FetchError>, Option<&Response>) -> bool + Send + Sync;

pub type RetryOnFuture = Pin<Box<dyn Future<Output = bool> + Send>>;

pub type RetryOnAsyncFn =
    dyn Fn(u32, Option<&FetchError>, Option<&Response>) -> RetryOnFuture + Send + Sync;

/// Backoff between attempts; `attempt` counts from 0 for the first request
#[derive(Clone)]
pub enum RetryDelay {
    /// `2^attempt * base`
    Exponential { base: Duration },
    Fixed(Duration),
    Custom(Arc<DelayFn>),
}

impl Default for RetryDelay {
    fn default() -> Self {
        RetryDelay::Exponential {
            base: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl fmt::Debug for RetryDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryDelay::Exponential { base } => {
                f.debug_struct("Exponential").field("base", base).finish()
            }
            RetryDelay::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            RetryDelay::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl RetryDelay {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32, Option<&FetchError>, Option<&Response>) -> Duration + Send + Sync + 'static,
    {
        RetryDelay::Custom(Arc::new(f))
    }

    fn delay(&self, attempt: u32, error: Option<&FetchError>, response: Option<&Response>) -> Duration {
        match self {
            RetryDelay::Exponential { base } => base.saturating_mul(2u32.saturating_pow(attempt)),
            RetryDelay::Fixed(delay) => *delay,
            RetryDelay::Custom(f) => f(attempt, error, response),
        }
    }
}

/// Decides whether a finished attempt should be retried
#[derive(Clone)]
pub enum RetryOn {
    /// Retry on any transport error or on one of these status codes
    Statuses(Vec<u16>),
    Custom(Arc<RetryOnFn>),
    /// A predicate that needs to await something before deciding
    CustomAsync(Arc<RetryOnAsyncFn>),
}

impl Default for RetryOn {
    fn default() -> Self {
        RetryOn::Statuses(Vec::new())
    }
}

impl fmt::Debug for RetryOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryOn::Statuses(statuses) => f.debug_tuple("Statuses").field(statuses).finish(),
            RetryOn::Custom(_) => f.write_str("Custom(..)"),
            RetryOn::CustomAsync(_) => f.write_str("CustomAsync(..)"),
        }
    }
}

enum Verdict {
    Ready(bool),
    Pending(RetryOnFuture),
}

impl RetryOn {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32, Option<&FetchError>, Option<&Response>) -> bool + Send + Sync + 'static,
    {
        RetryOn::Custom(Arc::new(f))
    }

    pub fn custom_async<F>(f: F) -> Self
    where
        F: Fn(u32, Option<&FetchError>, Option<&Response>) -> RetryOnFuture + Send + Sync + 'static,
    {
        RetryOn::CustomAsync(Arc::new(f))
    }

    // Borrows of the attempt's outcome end here; a pending verdict owns its state.
    fn verdict(&self, attempt: u32, error: Option<&FetchError>, response: Option<&Response>) -> Verdict {
        match self {
            RetryOn::Statuses(statuses) => Verdict::Ready(match (error, response) {
                (Some(_), _) => true,
                (None, Some(res)) => statuses.contains(&res.status().as_u16()),
                (None, None) => false,
            }),
            RetryOn::Custom(f) => Verdict::Ready(f(attempt, error, response)),
            RetryOn::CustomAsync(f) => Verdict::Pending(f(attempt, error, response)),
        }
    }
}

/// How many times to retry, how long to wait, and when
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retries: u32,
    pub retry_delay: RetryDelay,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            retry_delay: RetryDelay::default(),
            retry_on: RetryOn::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_delay(mut self, retry_delay: RetryDelay) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }
}

/// Default backoff: `2^attempt` seconds
pub fn exponential_delay(attempt: u32) -> Duration {
    RetryDelay::default().delay(attempt, None, None)
}

fn split(result: &Result<Response, FetchError>) -> (Option<&FetchError>, Option<&Response>) {
    match result {
        Ok(response) => (None, Some(response)),
        Err(error) => (Some(error), None),
    }
}

/// An HTTP client that retries according to a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryingClient<T: HttpTransport = reqwest::Client> {
    transport: T,
    policy: RetryPolicy,
}

impl RetryingClient<reqwest::Client> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_transport(reqwest::Client::new(), policy)
    }
}

impl Default for RetryingClient<reqwest::Client> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<T: HttpTransport> RetryingClient<T> {
    pub fn with_transport(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// `GET` a URL
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        self.fetch(Request::new(Method::GET, url)).await
    }

    /// Send `request`, retrying per the policy
    ///
    /// Once retries are exhausted the last attempt's outcome is returned as is,
    /// whether it is an error or a response with a failing status. A request whose
    /// body cannot be cloned (a stream) is sent once.
    pub async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        let retries = self.policy.retries;
        let mut request = request;
        let mut attempt = 0;

        loop {
            let next = if attempt < retries {
                let copy = request.try_clone();
                if copy.is_none() {
                    warn!("Request body to {} cannot be cloned; sending without retries", request.url());
                }
                copy
            } else {
                None
            };

            let result = self.transport.execute(request).await;
            let Some(next) = next else {
                return result;
            };

            let verdict = {
                let (error, response) = split(&result);
                self.policy.retry_on.verdict(attempt, error, response)
            };
            let retry = match verdict {
                Verdict::Ready(retry) => retry,
                Verdict::Pending(future) => future.await,
            };
            if !retry {
                return result;
            }

            let delay = {
                let (error, response) = split(&result);
                self.policy.retry_delay.delay(attempt, error, response)
            };

            match &result {
                Ok(response) => debug!(
                    "Attempt {} to {} returned {}; retrying in {:?}",
                    attempt + 1,
                    next.url(),
                    response.status(),
                    delay
                ),
                Err(e) => debug!(
                    "Attempt {} to {} failed: {}; retrying in {:?}",
                    attempt + 1,
                    next.url(),
                    e,
                    delay
                ),
            }
            drop(result);

            tokio::time::sleep(delay).await;
            attempt += 1;
            request = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays a fixed sequence of outcomes; `Err` entries are transport failures
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<u16, &'static str>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<u16, &'static str>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for Scripted {
        async fn execute(&self, _request: Request) -> Result<Response, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(200));
            match outcome {
                Ok(status) => Ok(Response::from(
                    http::Response::builder().status(status).body("").unwrap(),
                )),
                Err(message) => Err(FetchError::Transport(message.to_string())),
            }
        }
    }

    fn no_wait(retries: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_retries(retries)
            .with_delay(RetryDelay::Fixed(Duration::ZERO))
    }

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("https://api.example.com/items").unwrap())
    }

    #[test]
    fn test_exponential_delay() {
        assert_eq!(exponential_delay(0), Duration::from_secs(1));
        assert_eq!(exponential_delay(1), Duration::from_secs(2));
        assert_eq!(exponential_delay(3), Duration::from_secs(8));
        assert_eq!(exponential_delay(40), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 0);
        assert!(matches!(policy.retry_on, RetryOn::Statuses(ref s) if s.is_empty()));
    }

    #[tokio::test]
    async fn test_default_policy_sends_once() {
        let client = RetryingClient::with_transport(Scripted::new(vec![Err("reset")]), RetryPolicy::default());

        let err = client.fetch(request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_errors_are_retried() {
        let transport = Scripted::new(vec![Err("reset"), Err("reset"), Ok(200)]);
        let client = RetryingClient::with_transport(transport, no_wait(3));

        let res = client.fetch(request()).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_listed_statuses_are_retried_until_exhausted() {
        let transport = Scripted::new(vec![Ok(503), Ok(503), Ok(503), Ok(200)]);
        let policy = no_wait(2).with_retry_on(RetryOn::Statuses(vec![503]));
        let client = RetryingClient::with_transport(transport, policy);

        let res = client.fetch(request()).await.unwrap();
        assert_eq!(res.status(), 503);
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_unlisted_status_is_returned() {
        let transport = Scripted::new(vec![Ok(404)]);
        let policy = no_wait(5).with_retry_on(RetryOn::Statuses(vec![503]));
        let client = RetryingClient::with_transport(transport, policy);

        assert_eq!(client.fetch(request()).await.unwrap().status(), 404);
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_custom_predicate_and_delay() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();

        let policy = RetryPolicy::new()
            .with_retries(4)
            .with_retry_on(RetryOn::custom(|attempt, _, res| {
                attempt < 1 || res.is_some_and(|r| r.status().is_server_error())
            }))
            .with_delay(RetryDelay::custom(move |attempt, _, _| {
                recorded.lock().unwrap().push(attempt);
                Duration::ZERO
            }));
        let transport = Scripted::new(vec![Ok(200), Ok(500), Ok(201)]);
        let client = RetryingClient::with_transport(transport, policy);

        assert_eq!(client.fetch(request()).await.unwrap().status(), 201);
        assert_eq!(client.transport.calls(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_custom_predicate_is_bounded_by_retries() {
        let policy = no_wait(2).with_retry_on(RetryOn::custom(|_, _, _| true));
        let client = RetryingClient::with_transport(Scripted::new(vec![]), policy);

        assert_eq!(client.fetch(request()).await.unwrap().status(), 200);
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_async_predicate() {
        let policy = no_wait(3).with_retry_on(RetryOn::custom_async(|_, err, _| {
            let failed = err.is_some();
            Box::pin(async move {
                tokio::task::yield_now().await;
                failed
            }) as RetryOnFuture
        }));
        let transport = Scripted::new(vec![Err("timeout"), Ok(500)]);
        let client = RetryingClient::with_transport(transport, policy);

        assert_eq!(client.fetch(request()).await.unwrap().status(), 500);
        assert_eq!(client.transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_streaming_body_is_sent_once() {
        let mut streaming = Request::new(Method::POST, Url::parse("https://api.example.com/upload").unwrap());
        *streaming.body_mut() = Some(reqwest::Body::wrap("payload".to_string()));
        assert!(streaming.try_clone().is_none());

        let transport = Scripted::new(vec![Err("reset"), Ok(200)]);
        let client = RetryingClient::with_transport(transport, no_wait(3));

        let err = client.fetch(streaming).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_rejects_invalid_url() {
        let client = RetryingClient::with_transport(Scripted::new(vec![]), RetryPolicy::default());

        let err = client.get("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert_eq!(client.transport.calls(), 0);
    }
}
