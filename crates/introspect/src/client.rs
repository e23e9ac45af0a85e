//! Configurable GraphQL introspection client.
//!
//! Posts the introspection query to an HTTP endpoint and hands back the JSON
//! response, retrying transient failures.

use crate::query::{introspection_query, IntrospectionQueryOptions, INTROSPECTION_QUERY};
use crate::{IntrospectionError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Default timeout for introspection requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default number of retry attempts.
const DEFAULT_RETRIES: u32 = 0;

/// Backoff stops doubling after 2^6 = 64 seconds.
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, … capped at 64s.
fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    Duration::from_secs(1 << exponent)
}

/// A configurable client for executing GraphQL introspection queries.
///
/// Custom headers, timeouts and retries with exponential backoff are set
/// through builder methods.
///
/// # Examples
///
/// ## Basic usage
///
/// ```no_run
/// use graphql_introspect::IntrospectionClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IntrospectionClient::new();
/// let response = client.execute("https://api.example.com/graphql").await?;
/// # Ok(())
/// # }
/// ```
///
/// ## With authentication
///
/// ```no_run
/// use graphql_introspect::IntrospectionClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IntrospectionClient::new()
///     .with_auth("Authorization", "Bearer my-token");
/// let response = client.execute("https://api.example.com/graphql").await?;
/// # Ok(())
/// # }
/// ```
///
/// ## With custom timeout and retries
///
/// ```no_run
/// use graphql_introspect::IntrospectionClient;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IntrospectionClient::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_retries(3);
/// let response = client.execute("https://api.example.com/graphql").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    headers: HashMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
    retries: u32,
    query: String,
}

impl Default for IntrospectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionClient {
    /// Creates a new introspection client with default settings.
    ///
    /// Default settings:
    /// - 30 second request timeout
    /// - 10 second connection timeout
    /// - No retries
    /// - No custom headers
    /// - The default [`INTROSPECTION_QUERY`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            query: INTROSPECTION_QUERY.clone(),
        }
    }

    /// Adds a custom HTTP header to be sent with the introspection request.
    ///
    /// Headers are commonly used for authentication:
    ///
    /// ```no_run
    /// # use graphql_introspect::IntrospectionClient;
    /// let client = IntrospectionClient::new()
    ///     .with_header("Authorization", "Bearer token")
    ///     .with_header("X-API-Key", "my-api-key");
    /// ```
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds multiple HTTP headers from an iterator.
    ///
    /// ```no_run
    /// # use graphql_introspect::IntrospectionClient;
    /// let headers = vec![
    ///     ("Authorization", "Bearer token"),
    ///     ("X-Request-ID", "12345"),
    /// ];
    /// let client = IntrospectionClient::new().with_headers(headers);
    /// ```
    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Sets the request timeout.
    ///
    /// This is the maximum time allowed for the entire request (connection + transfer).
    /// Default is 30 seconds.
    ///
    /// ```no_run
    /// # use graphql_introspect::IntrospectionClient;
    /// # use std::time::Duration;
    /// let client = IntrospectionClient::new()
    ///     .with_timeout(Duration::from_secs(60));
    /// ```
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is the maximum time allowed to establish a connection.
    /// Default is 10 seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the number of retry attempts on failure.
    ///
    /// Retries use exponential backoff starting at 1 second.
    /// Default is 0 (no retries).
    ///
    /// ```no_run
    /// # use graphql_introspect::IntrospectionClient;
    /// let client = IntrospectionClient::new()
    ///     .with_retries(3); // Will retry up to 3 times
    /// ```
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Authenticates with `header: token`.
    ///
    /// Nothing is sent when `token` is empty, matching a CLI invocation that
    /// names an auth header but no token.
    ///
    /// ```no_run
    /// # use graphql_introspect::IntrospectionClient;
    /// let client = IntrospectionClient::new().with_auth("Authorization", "Bearer token");
    /// ```
    #[must_use]
    pub fn with_auth(mut self, header: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.headers.insert(header.into(), token);
        }
        self
    }

    /// Selects which optional fields the introspection query asks for.
    #[must_use]
    pub fn with_query_options(mut self, options: IntrospectionQueryOptions) -> Self {
        self.query = introspection_query(&options);
        self
    }

    /// Executes the introspection query against `url` and returns the raw
    /// response body.
    ///
    /// The body is returned as the server sent it (field order included), so
    /// it can be passed to [`introspection_to_sdl`](crate::introspection_to_sdl)
    /// or written out as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The network request fails after all retry attempts
    /// - The server returns an HTTP error status
    /// - The body is not JSON
    /// - The body carries GraphQL `errors`
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, url: &str) -> Result<Value> {
        let mut last_error = None;

        for attempt in 0..self.attempts() {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                tracing::info!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            match self.execute_once(url).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Request failed");
                    let retryable = Self::is_retryable(&e);
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| IntrospectionError::Network("No attempts made".to_string())))
    }

    /// The first request plus `retries`, saturating at `u32::MAX`.
    const fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    async fn execute_once(&self, url: &str) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| {
                IntrospectionError::Network(format!("Failed to create HTTP client: {e}"))
            })?;

        let query_body = serde_json::json!({ "query": self.query });

        tracing::info!("Sending introspection query");
        let mut request = client.post(url).header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request
            .json(&query_body)
            .send()
            .await
            .map_err(|e| IntrospectionError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %error_body, "HTTP error response");
            return Err(IntrospectionError::Http(status.as_u16(), error_body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IntrospectionError::Network(e.to_string()))?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse introspection response");
            IntrospectionError::Parse(e.to_string())
        })?;

        if let Some(errors) = json
            .get("errors")
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty())
        {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| error.to_string(), str::to_string)
                })
                .collect::<Vec<_>>();
            return Err(IntrospectionError::GraphQl(messages.join("; ")));
        }

        tracing::info!(bytes = body.len(), "Introspection successful");
        Ok(json)
    }

    /// Determines if an error is retryable.
    ///
    /// Network errors and 5xx server errors are retryable. Everything else
    /// would fail the same way again.
    fn is_retryable(error: &IntrospectionError) -> bool {
        match error {
            IntrospectionError::Network(_) => true,
            IntrospectionError::Http(status, _) => *status >= 500,
            IntrospectionError::Parse(_)
            | IntrospectionError::GraphQl(_)
            | IntrospectionError::Validation { .. }
            | IntrospectionError::UnsupportedKind { .. }
            | IntrospectionError::DanglingReference { .. }
            | IntrospectionError::Print { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_default() {
        let client = IntrospectionClient::new();
        assert!(client.headers.is_empty());
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.retries, 0);
    }

    #[test]
    fn test_client_with_headers() {
        let client = IntrospectionClient::new()
            .with_header("Authorization", "Bearer token")
            .with_header("X-API-Key", "key123");

        assert_eq!(
            client.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(client.headers.get("X-API-Key"), Some(&"key123".to_string()));
    }

    #[test]
    fn test_client_with_headers_iterator() {
        let headers = vec![("Authorization", "Bearer token"), ("X-API-Key", "key123")];
        let client = IntrospectionClient::new().with_headers(headers);

        assert_eq!(client.headers.len(), 2);
    }

    #[test]
    fn test_client_with_timeout() {
        let client = IntrospectionClient::new().with_timeout(Duration::from_secs(60));
        assert_eq!(client.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_client_with_retries() {
        let client = IntrospectionClient::new().with_retries(3);
        assert_eq!(client.retries, 3);
        assert_eq!(client.attempts(), 4);
    }

    #[test]
    fn test_max_retries_does_not_overflow() {
        let client = IntrospectionClient::new().with_retries(u32::MAX);
        assert_eq!(client.attempts(), u32::MAX);
    }

    #[test]
    fn test_backoff_delay_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(7), Duration::from_secs(64));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(64));
    }

    #[test]
    fn test_is_retryable() {
        assert!(IntrospectionClient::is_retryable(
            &IntrospectionError::Network("timeout".into())
        ));
        assert!(IntrospectionClient::is_retryable(
            &IntrospectionError::Http(500, "error".into())
        ));
        assert!(IntrospectionClient::is_retryable(
            &IntrospectionError::Http(503, "error".into())
        ));
        assert!(!IntrospectionClient::is_retryable(
            &IntrospectionError::Http(401, "error".into())
        ));
        assert!(!IntrospectionClient::is_retryable(
            &IntrospectionError::Http(404, "error".into())
        ));
        assert!(!IntrospectionClient::is_retryable(
            &IntrospectionError::Parse("error".into())
        ));
        assert!(!IntrospectionClient::is_retryable(
            &IntrospectionError::GraphQl("Introspection is disabled".into())
        ));
    }

    #[test]
    fn test_client_with_auth() {
        let client = IntrospectionClient::new().with_auth("X-Token", "secret");
        assert_eq!(client.headers.get("X-Token"), Some(&"secret".to_string()));
    }

    #[test]
    fn test_client_with_empty_auth_token_sends_nothing() {
        let client = IntrospectionClient::new().with_auth("Authorization", "");
        assert!(client.headers.is_empty());
    }

    #[test]
    fn test_client_with_query_options() {
        let client = IntrospectionClient::new();
        assert!(!client.query.contains("specifiedByURL"));

        let client = client.with_query_options(IntrospectionQueryOptions::all());
        assert!(client.query.contains("specifiedByURL"));
        assert!(client.query.contains("isRepeatable"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        let client = IntrospectionClient::new().with_connect_timeout(Duration::from_secs(2));
        let err = client.execute("http://127.0.0.1:1/graphql").await.unwrap_err();
        assert!(matches!(err, IntrospectionError::Network(_)));
    }
}
