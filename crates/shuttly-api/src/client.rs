// Shuttly backend HTTP client
//
// Wraps `reqwest::Client` with base-path URL construction, bearer-token
// injection, and envelope unwrapping. All endpoint modules (auth,
// schedules, bookings, etc.) are implemented as inherent methods via
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// The backend wraps errors as `{"message": "..."}` with a non-2xx status.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the Shuttly REST backend.
///
/// Handles the `{ success, data }` envelope, `/api`-rooted URL
/// construction, and bearer-token injection. All methods return
/// unwrapped `data` payloads -- the envelope is stripped before the
/// caller sees it. The token is swappable at runtime so one client
/// survives login/logout.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token for protected endpoints. Set after login or session
    /// rehydration, cleared on logout or forced logout (401).
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client from a server base URL and transport config.
    ///
    /// `base_url` is the server root (e.g. `https://book.example.com`);
    /// the `/api` prefix is applied per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a bearer token for subsequent protected calls.
    pub fn set_token(&self, token: SecretString) {
        debug!("installing bearer token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Remove the bearer token (logout / forced logout).
    pub fn clear_token(&self) {
        debug!("clearing bearer token");
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Apply the stored bearer token to a request builder.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the `{ success, data }` envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.authorize(self.http.get(url).query(query));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.authorize(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);

        let builder = self.authorize(self.http.put(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);

        let builder = self.authorize(self.http.delete(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// Send a POST and parse the body as `T` directly, without the
    /// `{ success, data }` envelope. The auth endpoints return flat
    /// shapes (`{ success, token, user }` and friends) that carry their
    /// fields beside the flag.
    pub(crate) async fn post_flat<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.authorize(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        let body = check_status(resp).await?;
        parse_body(&body)
    }

    /// Send a GET and return the raw response bytes (ticket download).
    pub(crate) async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, Error> {
        debug!("GET {} (raw)", url);

        let builder = self.authorize(self.http.get(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: extract_message(&body)
                    .unwrap_or_else(|| "session expired or invalid token".into()),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(resp.bytes().await.map_err(Error::Transport)?.to_vec())
    }
}

// ── Response handling ───────────────────────────────────────────────

/// Normalize a non-2xx response into an error, or return the body
/// text on success. 401 is singled out so callers can force logout.
async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Authentication {
            message: extract_message(&body)
                .unwrap_or_else(|| "session expired or invalid token".into()),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    resp.text().await.map_err(Error::Transport)
}

/// Parse the `{ success, data }` envelope, returning `data` on success
/// or an `Error::Api` carrying the backend's message when `success` is
/// false or `data` is missing.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = check_status(resp).await?;
    let envelope: Envelope<T> = parse_body(&body)?;

    if !envelope.success {
        return Err(Error::Api {
            message: envelope
                .message
                .unwrap_or_else(|| "request was not successful".into()),
        });
    }

    envelope.data.ok_or_else(|| Error::Api {
        message: envelope
            .message
            .unwrap_or_else(|| "response carried no data".into()),
    })
}

/// Deserialize a response body, keeping a preview for diagnostics.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        trace!("unparseable body: {preview:?}");
        Error::Deserialization {
            message: e.to_string(),
            body: body.to_owned(),
        }
    })
}

/// Uniform error policy: use the backend's `{"message"}` if the body is
/// JSON, otherwise fall back to the HTTP status text.
fn status_error(status: reqwest::StatusCode, body: &str) -> Error {
    let message = extract_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    });
    Error::Api { message }
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
}
