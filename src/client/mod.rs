//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    ApiFailure, AppKey, BearerToken, MasterSecret, Push, PushResponse, ValidationError,
};

const US_BASE_URL: &str = "https://go.urbanairship.com/api/";
const EU_BASE_URL: &str = "https://go.airship.eu/api/";
const PUSH_PATH: &str = "push/";
const VALIDATE_PATH: &str = "push/validate/";
const ACCEPT_V3: &str = "application/vnd.urbanairship+json; version=3";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let request = self
                .client
                .post(url)
                .header(reqwest::header::ACCEPT, ACCEPT_V3)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
            let request = match auth {
                Auth::Basic {
                    app_key,
                    master_secret,
                } => request.basic_auth(app_key.as_str(), Some(master_secret.as_str())),
                Auth::Bearer { app_key, token } => request
                    .bearer_auth(token.as_str())
                    .header("X-UA-Appkey", app_key.as_str()),
            };
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Authentication credentials for Airship API calls.
pub enum Auth {
    /// HTTP basic auth with the app key and master secret.
    Basic {
        app_key: AppKey,
        master_secret: MasterSecret,
    },
    /// Bearer token scoped to an app key.
    Bearer { app_key: AppKey, token: BearerToken },
}

impl Auth {
    /// Create [`Auth::Basic`] and validate that both parts are non-empty.
    pub fn basic(
        app_key: impl Into<String>,
        master_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Basic {
            app_key: AppKey::new(app_key)?,
            master_secret: MasterSecret::new(master_secret)?,
        })
    }

    /// Create [`Auth::Bearer`] and validate that both parts are non-empty.
    pub fn bearer(
        app_key: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Bearer {
            app_key: AppKey::new(app_key)?,
            token: BearerToken::new(token)?,
        })
    }

    pub fn app_key(&self) -> &AppKey {
        match self {
            Self::Basic { app_key, .. } | Self::Bearer { app_key, .. } => app_key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Regional API host.
pub enum Location {
    #[default]
    Us,
    Eu,
}

impl Location {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Us => US_BASE_URL,
            Self::Eu => EU_BASE_URL,
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`AirshipClient`].
pub enum AirshipError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The service rejected the credentials (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Non-successful HTTP status, with the decoded error body when present.
    #[error("API error: HTTP {status}: {failure:?}")]
    Api {
        status: u16,
        failure: Option<ApiFailure>,
    },

    /// Request body could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`AirshipClient`].
///
/// Use this when you need to pick the EU host, point at a custom base URL, or
/// set a timeout or user-agent.
pub struct AirshipClientBuilder {
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl AirshipClientBuilder {
    /// Create a builder targeting the US host with no timeout/user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: US_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Use the default base URL of a regional host.
    pub fn location(mut self, location: Location) -> Self {
        self.base_url = location.base_url().to_owned();
        self
    }

    /// Override the API base URL (e.g. `https://go.urbanairship.com/api/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an [`AirshipClient`].
    pub fn build(self) -> Result<AirshipClient, AirshipError> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = url::Url::parse(&base)?;
        let push_endpoint = base.join(PUSH_PATH)?.to_string();
        let validate_endpoint = base.join(VALIDATE_PATH)?.to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| AirshipError::Transport(Box::new(err)))?;

        Ok(AirshipClient {
            auth: self.auth,
            push_endpoint,
            validate_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Airship client.
///
/// This type orchestrates JSON encoding, the HTTP exchange, and response
/// parsing. Audience selectors and payloads are validated when they are built,
/// before a client is involved.
pub struct AirshipClient {
    auth: Auth,
    push_endpoint: String,
    validate_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl AirshipClient {
    /// Create a client for the US host.
    ///
    /// For more customization, use [`AirshipClient::builder`].
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            push_endpoint: format!("{US_BASE_URL}{PUSH_PATH}"),
            validate_endpoint: format!("{US_BASE_URL}{VALIDATE_PATH}"),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> AirshipClientBuilder {
        AirshipClientBuilder::new(auth)
    }

    /// Send a push notification.
    ///
    /// Errors:
    /// - [`AirshipError::Unauthorized`] for HTTP 401,
    /// - [`AirshipError::Api`] for any other non-2xx response,
    /// - [`AirshipError::Parse`] when a success body is not the expected JSON.
    pub async fn send_push(&self, request: &Push) -> Result<PushResponse, AirshipError> {
        self.post_push(&self.push_endpoint, request).await
    }

    /// Ask the service to validate a push without delivering it.
    pub async fn validate_push(&self, request: &Push) -> Result<PushResponse, AirshipError> {
        self.post_push(&self.validate_endpoint, request).await
    }

    async fn post_push(&self, url: &str, request: &Push) -> Result<PushResponse, AirshipError> {
        let body = crate::transport::encode_push_json(request)
            .map_err(|err| AirshipError::Encode(Box::new(err)))?;

        tracing::debug!(url, app_key = self.auth.app_key().as_str(), "sending push request");
        let response = self
            .http
            .post_json(url, &self.auth, body)
            .await
            .map_err(AirshipError::Transport)?;
        tracing::debug!(url, status = response.status, "received push response");

        if response.status == 401 {
            tracing::warn!(url, "push request unauthorized");
            return Err(AirshipError::Unauthorized);
        }

        if !(200..=299).contains(&response.status) {
            let failure = if response.body.trim().is_empty() {
                None
            } else {
                crate::transport::decode_error_json_response(&response.body).ok()
            };
            tracing::warn!(
                url,
                status = response.status,
                error_code = ?failure.as_ref().and_then(|f| f.error_code),
                "push request rejected"
            );
            return Err(AirshipError::Api {
                status: response.status,
                failure,
            });
        }

        crate::transport::decode_push_json_response(&response.body)
            .map_err(|err| AirshipError::Parse(Box::new(err)))
    }
}
