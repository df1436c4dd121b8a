// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, bearer-token injection,
// and uniform response decoding. Endpoint groups (equipment, auth) are
// implemented as inherent methods in their own files so this module stays
// focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Async client for the inventory backend.
///
/// Holds two base URLs because the auth resource may be served from a
/// different host than the equipment resource. The bearer token is owned
/// by the session layer and pushed in through [`set_token`](Self::set_token);
/// every equipment request carries it while it is set.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `auth_url` defaults to `base_url` when `None`.
    pub fn new(
        base_url: &str,
        auth_url: Option<&str>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, auth_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        auth_url: Option<&str>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        let auth_url = match auth_url {
            Some(raw) => Url::parse(raw)?,
            None => base_url.clone(),
        };
        Ok(Self {
            http,
            base_url,
            auth_url,
            token: RwLock::new(None),
        })
    }

    /// The equipment base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The auth base URL.
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Bearer token ─────────────────────────────────────────────────

    /// Store the bearer token attached to subsequent equipment requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) {
        debug!("clearing bearer token");
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently held.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}` for the equipment resource.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        join(&self.base_url, path)
    }

    /// Build `{auth_base}/{path}` for the auth resource.
    pub(crate) fn auth_endpoint(&self, path: &str) -> Result<Url, Error> {
        join(&self.auth_url, path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let builder = self.apply_token(self.http.get(url).query(params));
        let resp = builder.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let builder = self.apply_token(self.http.post(url).json(body));
        let resp = builder.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let builder = self.apply_token(self.http.put(url).json(body));
        let resp = builder.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let builder = self.apply_token(self.http.delete(url));
        let resp = builder.send().await?;
        handle_empty(resp).await
    }
}

fn join(base: &Url, path: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    trace!(len = body.len(), "response body received");
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Unauthorized;
    }

    let raw = resp.text().await.unwrap_or_default();
    Error::Api {
        status: status.as_u16(),
        message: server_message(&raw).unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                preview(&raw)
            }
        }),
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Extract `message` from a `{"message": "..."}` error body.
pub(crate) fn server_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
}
