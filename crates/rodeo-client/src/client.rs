//! # API Client
//!
//! Configuration and the shared HTTP handle behind every repository.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Authenticated Request                              │
//! │                                                                         │
//! │  repository call (e.g. client.sales().list_by_date(date))               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session.token() ── none ──► AuthRequired (no request sent)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Authorization: Bearer <token>                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send ── network error ──► FetchFailed / PersistenceFailed              │
//! │       │                                                                 │
//! │       ├── 401 ──► session.sign_out() ──► AuthRequired                   │
//! │       ├── other non-2xx ──► FetchFailed / PersistenceFailed             │
//! │       │                     (server `{error}` message when present)     │
//! │       ▼                                                                 │
//! │  body ──serde + TryFrom──► core types, or MalformedResponse             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::repository::auth::AuthRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::memo::MemoRepository;
use crate::repository::monthly::MonthlyRepository;
use crate::repository::sales::SalesRepository;
use crate::session::Session;
use crate::wire::ErrorBody;

/// Correlates client log lines with server logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Configuration
// =============================================================================

/// Client configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use rodeo_client::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:5002")
///     .unwrap()
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url.as_str(), "http://localhost:5002/");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root. Always ends with `/` so endpoint paths join under it.
    pub base_url: Url,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::InvalidConfig(format!("base_url '{}': {}", base_url, e)))?;

        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "base_url '{}' cannot be a base",
                base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(ClientConfig {
            base_url: url,
            timeout: Duration::from_secs(10),
        })
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Request Kind
// =============================================================================

/// Whether a call reads or writes; picks the failure variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    Fetch,
    Persist,
}

impl RequestKind {
    fn failure(self, message: String) -> ClientError {
        match self {
            RequestKind::Fetch => ClientError::FetchFailed(message),
            RequestKind::Persist => ClientError::PersistenceFailed(message),
        }
    }
}

// =============================================================================
// API Client
// =============================================================================

/// Shared handle to the shop API.
///
/// Cloning is cheap: the connection pool and the session are shared.
///
/// ## Usage
/// ```rust,ignore
/// let client = ApiClient::new(ClientConfig::new("http://localhost:5002")?, session)?;
/// let products = client.inventory().list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        debug!(base_url = %config.base_url, timeout = ?config.timeout, "API client created");

        Ok(ApiClient {
            http,
            base_url: config.base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Repositories
    // -------------------------------------------------------------------------

    pub fn auth(&self) -> AuthRepository {
        AuthRepository::new(self.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.clone())
    }

    pub fn sales(&self) -> SalesRepository {
        SalesRepository::new(self.clone())
    }

    pub fn monthly(&self) -> MonthlyRepository {
        MonthlyRepository::new(self.clone())
    }

    pub fn memos(&self) -> MemoRepository {
        MemoRepository::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Request Helpers
    // -------------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidConfig(format!("path '{}': {}", path, e)))
    }

    /// Builds a request without credentials, tagged with a fresh request id.
    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4();
        debug!(%method, %url, %request_id, "Sending request");
        Ok(self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.to_string()))
    }

    /// Builds a request carrying the bearer token.
    ///
    /// Fails with `AuthRequired` before anything is sent when signed out.
    pub(crate) fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.session.token()?;
        Ok(self.request(method, path)?.bearer_auth(token.as_str()))
    }

    /// Sends a request and maps transport and status failures.
    ///
    /// `fallback` is the message used when the server gives none.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        kind: RequestKind,
        fallback: &str,
    ) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed to complete");
            kind.failure(fallback.to_string())
        })?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            warn!("Credential rejected, clearing session");
            if let Err(e) = self.session.sign_out() {
                warn!(error = %e, "Could not clear stored token");
            }
            return Err(ClientError::AuthRequired);
        }

        if !status.is_success() {
            let message = server_message(response)
                .await
                .unwrap_or_else(|| fallback.to_string());
            warn!(status = status.as_u16(), message = %message, "Request rejected");
            return Err(kind.failure(message));
        }

        Ok(response)
    }

    /// Authorized GET, body decoded as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ClientResult<T> {
        let request = self.authorized(Method::GET, path)?;
        let response = self.execute(request, RequestKind::Fetch, fallback).await?;
        decode(response).await
    }

    /// Authorized write with a JSON body. The response body is ignored.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ClientResult<Response> {
        let request = self.authorized(method, path)?.json(body);
        self.execute(request, RequestKind::Persist, fallback).await
    }

    /// Authorized DELETE.
    pub(crate) async fn delete(&self, path: &str, fallback: &str) -> ClientResult<()> {
        let request = self.authorized(Method::DELETE, path)?;
        self.execute(request, RequestKind::Persist, fallback).await?;
        Ok(())
    }
}

/// Decodes a JSON body; shape errors become `MalformedResponse`.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::FetchFailed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::malformed(e.to_string()))
}

/// Extracts `{error}` / `{message}` from an error response, if any.
pub(crate) async fn server_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(ErrorBody::into_message)
}
