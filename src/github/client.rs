// GitHub API HTTP client.
// Handles optional authentication, rate limit tracking, and status classification.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{Result, StarboardError};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new client. Without a token requests are anonymous and get the lower quota.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| StarboardError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("starboard-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StarboardError::Api)?;

        Ok(Self {
            client,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Latest rate limit information seen on any response.
    pub fn rate_limit(&self) -> RateLimit {
        *self
            .rate_limit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        self.get_with_params(endpoint, &[] as &[(&str, &str)]).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        debug!(%url, "GitHub request");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(StarboardError::Api)?;

        let rate_limit = self.update_rate_limit(&response);
        check_response(response, rate_limit).await
    }

    /// Update rate limit from response headers and return the merged value.
    fn update_rate_limit(&self, response: &Response) -> RateLimit {
        let mut current = self
            .rate_limit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        merge_rate_limit(&mut current, response.headers());
        *current
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn merge_rate_limit(rate_limit: &mut RateLimit, headers: &HeaderMap) {
    if let Some(limit) = header_u64(headers, "x-ratelimit-limit") {
        rate_limit.limit = limit;
    }
    if let Some(remaining) = header_u64(headers, "x-ratelimit-remaining") {
        rate_limit.remaining = remaining;
    }
    if let Some(reset) = header_u64(headers, "x-ratelimit-reset") {
        rate_limit.reset = reset;
    }
}

fn reset_display(rate_limit: RateLimit) -> String {
    if rate_limit.reset == 0 {
        return "unknown".to_string();
    }
    chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Check response status and convert errors.
///
/// GitHub answers quota exhaustion with 403 (primary limit) or 429 (secondary limit);
/// both are reported as `RateLimited`.
async fn check_response(response: Response, rate_limit: RateLimit) -> Result<Response> {
    let status = response.status();
    match classify_status(status) {
        StatusClass::Ok => Ok(response),
        StatusClass::Unauthorized => Err(StarboardError::Unauthorized),
        StatusClass::NotFound => Err(StarboardError::NotFound(response.url().to_string())),
        StatusClass::RateLimited => Err(StarboardError::RateLimited {
            reset_at: reset_display(rate_limit),
        }),
        StatusClass::Other => Err(StarboardError::Http {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StatusClass {
    Ok,
    Unauthorized,
    NotFound,
    RateLimited,
    Other,
}

fn classify_status(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
            StatusClass::Ok
        }
        StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
        StatusCode::NOT_FOUND => StatusClass::NotFound,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => StatusClass::RateLimited,
        _ => StatusClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), StatusClass::Ok);
        assert_eq!(classify_status(StatusCode::FORBIDDEN), StatusClass::RateLimited);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            StatusClass::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            StatusClass::Unauthorized
        );
        assert_eq!(classify_status(StatusCode::NOT_FOUND), StatusClass::NotFound);
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            StatusClass::Other
        );
    }

    #[test]
    fn test_merge_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let mut rate_limit = RateLimit::default();
        merge_rate_limit(&mut rate_limit, &headers);

        assert_eq!(rate_limit.limit, 60);
        assert_eq!(rate_limit.remaining, 0);
        assert_eq!(rate_limit.reset, 1_700_000_000);
        assert!(rate_limit.is_known());
    }

    #[test]
    fn test_merge_keeps_previous_values_when_headers_missing() {
        let mut rate_limit = RateLimit {
            limit: 5000,
            remaining: 4999,
            reset: 42,
        };
        merge_rate_limit(&mut rate_limit, &HeaderMap::new());
        assert_eq!(rate_limit.remaining, 4999);
    }

    #[test]
    fn test_reset_display_unknown() {
        assert_eq!(reset_display(RateLimit::default()), "unknown");
        let known = RateLimit {
            limit: 60,
            remaining: 0,
            reset: 0,
        };
        assert_eq!(reset_display(known), "unknown");
    }

    #[test]
    fn test_client_builds_with_and_without_token() {
        assert!(GitHubClient::new(None).is_ok());
        assert!(GitHubClient::new(Some("ghp_example")).is_ok());
        assert!(!GitHubClient::new(None).unwrap().rate_limit().is_known());
    }
}
