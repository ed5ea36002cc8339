//! X (Twitter) API v2 client implementing the submit capability

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{PostId, SubmitClient};
use crate::error::PostError;
use crate::oauth;

/// Production API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// Fallback wait when the platform rate-limits without a usable reset
/// header.
const RATE_LIMIT_FALLBACK: Duration = Duration::from_secs(60);

/// Permalink for a posted status.
pub fn tweet_url(id: &PostId) -> String {
    format!("https://twitter.com/user/status/{id}")
}

/// The OAuth 1.0a credential quartet for a user context.
///
/// How these are obtained or stored is the caller's concern.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API key
    pub consumer_key: String,
    /// API key secret
    pub consumer_secret: String,
    /// User access token
    pub access_token: String,
    /// User access token secret
    pub access_token_secret: String,
}

/// Client for `POST /2/tweets`.
///
/// Performs a single attempt per call and classifies failures; retry
/// and pacing live in the posting sequencer.
#[derive(Debug)]
pub struct TwitterClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl TwitterClient {
    /// Create a client against the production endpoint.
    pub fn new(credentials: Credentials) -> Result<Self, PostError> {
        Self::with_base_url(credentials, DEFAULT_API_URL)
    }

    /// Create a client against an arbitrary endpoint; used by tests.
    pub fn with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self, PostError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("spool/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn create_tweet(&self, request: &TweetRequest) -> Result<PostedTweet, PostError> {
        let url = format!("{}/2/tweets", self.base_url);
        let auth = oauth::authorization_header(&self.credentials, "POST", &url, &[])?;
        debug!(
            reply_to = request
                .reply
                .as_ref()
                .map(|r| r.in_reply_to_tweet_id.as_str()),
            "creating tweet"
        );
        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .json(request)
            .send()
            .await?;
        handle_response(response).await
    }
}

#[async_trait]
impl SubmitClient for TwitterClient {
    async fn submit(
        &self,
        text: &str,
        in_reply_to: Option<&PostId>,
    ) -> Result<PostId, PostError> {
        let request = TweetRequest {
            text: text.to_string(),
            reply: in_reply_to.map(|id| TweetReply {
                in_reply_to_tweet_id: id.as_str().to_string(),
            }),
        };
        let posted = self.create_tweet(&request).await?;
        Ok(PostId::new(posted.id))
    }
}

async fn handle_response(response: Response) -> Result<PostedTweet, PostError> {
    let status = response.status();
    let retry_after = retry_after_from_headers(response.headers());
    let bytes = response.bytes().await?;

    if status.is_success() {
        let parsed: TweetResponse = serde_json::from_slice(&bytes)?;
        return Ok(parsed.data);
    }

    let message = error_message(&bytes, status.as_u16());
    Err(match status {
        StatusCode::UNAUTHORIZED => PostError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => PostError::Transient {
            message,
            retry_after: Some(retry_after.unwrap_or(RATE_LIMIT_FALLBACK)),
        },
        s if s.is_server_error() => PostError::Transient {
            message,
            retry_after,
        },
        // 403 covers duplicate content and policy rejections; other
        // 4xx responses mean this chunk will never be accepted as-is.
        _ => PostError::ContentRejected(message),
    })
}

fn retry_after_from_headers(headers: &HeaderMap) -> Option<Duration> {
    let reset: u64 = headers
        .get("x-rate-limit-reset")?
        .to_str()
        .ok()?
        .parse()
        .ok()?;
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()?
        .as_secs();
    Some(Duration::from_secs(reset.saturating_sub(now)))
}

fn error_message(body: &[u8], status: u16) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        detail: Option<String>,
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .detail
            .or(parsed.title)
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}: {}", String::from_utf8_lossy(body)),
    }
}

#[derive(Debug, Serialize)]
struct TweetRequest {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<TweetReply>,
}

#[derive(Debug, Serialize)]
struct TweetReply {
    in_reply_to_tweet_id: String,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: PostedTweet,
}

#[derive(Debug, Deserialize)]
struct PostedTweet {
    id: String,
    #[serde(default)]
    #[allow(dead_code)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            consumer_key: "test_consumer_key".into(),
            consumer_secret: "test_consumer_secret".into(),
            access_token: "test_access_token".into(),
            access_token_secret: "test_access_token_secret".into(),
        }
    }

    async fn client(server: &MockServer) -> TwitterClient {
        TwitterClient::with_base_url(credentials(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn submit_returns_the_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(header_exists("Authorization"))
            .and(body_partial_json(serde_json::json!({"text": "Hello"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "1234567890", "text": "Hello"}
            })))
            .mount(&server)
            .await;

        let id = client(&server).await.submit("Hello", None).await.unwrap();
        assert_eq!(id.as_str(), "1234567890");
    }

    #[tokio::test]
    async fn replies_reference_the_parent_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(body_partial_json(serde_json::json!({
                "text": "Second",
                "reply": {"in_reply_to_tweet_id": "42"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "43", "text": "Second"}
            })))
            .mount(&server)
            .await;

        let parent = PostId::new("42");
        let id = client(&server)
            .await
            .submit("Second", Some(&parent))
            .await
            .unwrap();
        assert_eq!(id.as_str(), "43");
    }

    #[tokio::test]
    async fn unauthorized_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "title": "Unauthorized",
                "detail": "invalid credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("x", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.to_string().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn forbidden_is_content_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "detail": "duplicate content"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("x", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentRejected);
    }

    #[tokio::test]
    async fn rate_limiting_is_transient_with_a_wait() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "title": "Too Many Requests"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("x", None).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(RATE_LIMIT_FALLBACK));
    }

    #[tokio::test]
    async fn server_errors_are_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client(&server).await.submit("x", None).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
