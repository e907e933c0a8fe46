//! Blocking HTTP gateway to the remote pricing settings API.
//!
//! Every endpoint answers with a `{"data": ...}` envelope which is unwrapped
//! before deserializing. Non-success statuses are mapped onto
//! [`PricingError`] variants so callers can show them inline.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config;
use crate::error::{PricingError, Result};
use crate::models::{PriceCalculationInput, PriceCalculationResult, PricingSettings, SettingsUpdate};
use crate::session::Session;

// ---------------------------------------------------------------------------
// ApiClientBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    session: Option<Session>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: config::api_base_from_env(),
            timeout: config::DEFAULT_TIMEOUT,
            session: None,
        }
    }
}

impl ApiClientBuilder {
    /// API root, e.g. `https://api.example.com/api`. A trailing slash is dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a session; its token is sent as a bearer token.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(ApiClient {
            base_url: self.base_url,
            session: self.session,
            client,
        })
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Client for `GET/PUT /pricing-settings` and `POST /pricing-settings/calculate`.
pub struct ApiClient {
    base_url: String,
    session: Option<Session>,
    client: Client,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace (or clear) the session used for subsequent requests.
    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Fetch the active pricing settings.
    pub fn get_settings(&self) -> Result<PricingSettings> {
        let req = self.client.get(self.url(config::SETTINGS_PATH));
        self.send(req)
    }

    /// Send a partial update; returns the record as stored by the server.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<PricingSettings> {
        let req = self
            .client
            .put(self.url(config::SETTINGS_PATH))
            .json(update);
        self.send(req)
    }

    /// Ask the server to price `input` with its active settings.
    pub fn calculate_price(&self, input: &PriceCalculationInput) -> Result<PriceCalculationResult> {
        let req = self
            .client
            .post(self.url(config::CALCULATE_PATH))
            .json(input);
        self.send(req)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let req = match &self.session {
            Some(session) => req.header(reqwest::header::AUTHORIZATION, session.bearer()),
            None => req,
        };
        let resp = req.send().map_err(|e| {
            warn!(error = %e, "pricing API request failed");
            PricingError::Network(e)
        })?;
        debug!(status = %resp.status(), url = %resp.url(), "pricing API response");
        read_response(resp)
    }
}

/// Unwrap the `data` envelope of a successful response, or map the error.
fn read_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        let text = resp.text()?;
        let body: Value = serde_json::from_str(&text)?;
        let data = match body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        return Ok(serde_json::from_value(data)?);
    }

    let body: Option<Value> = resp.json().ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(match status {
        StatusCode::NOT_FOUND => PricingError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PricingError::Unauthorized(message),
        _ => PricingError::Api {
            status: status.as_u16(),
            message,
        },
    })
}
