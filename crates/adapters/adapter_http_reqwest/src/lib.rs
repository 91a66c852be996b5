//! # vmdash-adapter-http-reqwest
//!
//! [`VmControlApi`] implementation that talks to the VM control API over
//! HTTP/JSON.
//!
//! | operation | request |
//! |-----------|---------|
//! | status | `GET /api/vm/status` |
//! | usage | `GET /api/vm/usage` |
//! | start | `POST /api/vm/start` |
//! | stop | `POST /api/vm/stop` |
//!
//! Every answer carries a `status` field. The body is decoded whatever the
//! HTTP status code: the control API answers failures with a 500 and a
//! `{"status": "error", "message": …}` body, which maps to
//! [`ControlError::Rejected`]. A failed request or an undecodable body maps to
//! [`ControlError::Transport`].
//!
//! ## Dependency rule
//!
//! Depends on `vmdash-app` (port traits) and `vmdash-domain` only.

use std::time::Duration;

use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, trace};

use vmdash_app::ports::VmControlApi;
use vmdash_domain::error::{ControlError, RejectedError, TransportError};
use vmdash_domain::usage::UsageRecord;
use vmdash_domain::vm_status::VmStatus;

const STATUS_PATH: &str = "/api/vm/status";
const USAGE_PATH: &str = "/api/vm/usage";
const START_PATH: &str = "/api/vm/start";
const STOP_PATH: &str = "/api/vm/stop";

/// Connection settings for the control API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme, host and optional path prefix, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL, or [`HttpClientError::Build`] if the TLS backend fails to
    /// initialise.
    pub fn build(self) -> Result<HttpVmControlApi, HttpClientError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if let Err(err) = reqwest::Url::parse(&base_url) {
            return Err(HttpClientError::InvalidBaseUrl {
                url: self.base_url,
                reason: err.to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpVmControlApi { client, base_url })
    }
}

/// Errors raised while constructing the client.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("invalid control API url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

/// Control API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVmControlApi {
    client: reqwest::Client,
    base_url: String,
}

/// Fields shared by every control API answer.
#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl HttpVmControlApi {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ControlError> {
        trace!(path, "GET");
        let request = self.client.get(self.url(path));
        Self::exchange(request).await
    }

    async fn post(&self, path: &str) -> Result<(), ControlError> {
        trace!(path, "POST");
        let request = self.client.post(self.url(path));
        Self::exchange::<IgnoredAny>(request).await.map(|_| ())
    }

    async fn exchange<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, ControlError> {
        let response = request.send().await.map_err(transport)?;
        let http_status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        debug!(%http_status, len = body.len(), "control API answered");
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ControlError> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(transport)?;
    if envelope.status != "success" {
        return Err(RejectedError {
            message: envelope.message,
        }
        .into());
    }
    serde_json::from_slice(body).map_err(transport)
}

fn transport(err: impl std::fmt::Display) -> ControlError {
    TransportError::new(err.to_string()).into()
}

impl VmControlApi for HttpVmControlApi {
    async fn status(&self) -> Result<VmStatus, ControlError> {
        self.get(STATUS_PATH).await
    }

    async fn usage(&self) -> Result<UsageRecord, ControlError> {
        self.get(USAGE_PATH).await
    }

    async fn start(&self) -> Result<(), ControlError> {
        self.post(START_PATH).await
    }

    async fn stop(&self) -> Result<(), ControlError> {
        self.post(STOP_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_success_body() {
        let status: VmStatus = decode(
            br#"{"status":"success","vmName":"gpu-box","powerState":"VM running"}"#,
        )
        .unwrap();
        assert_eq!(status.vm_name, "gpu-box");
        assert_eq!(status.power_state, "VM running");
    }

    #[test]
    fn should_map_error_status_to_rejected() {
        let result: Result<VmStatus, _> =
            decode(br#"{"status":"error","message":"ResourceNotFound"}"#);
        assert_eq!(
            result,
            Err(ControlError::Rejected(RejectedError {
                message: Some("ResourceNotFound".to_string())
            }))
        );
    }

    #[test]
    fn should_map_non_json_body_to_transport() {
        let result: Result<VmStatus, _> = decode(b"<html>Bad Gateway</html>");
        assert!(matches!(result, Err(ControlError::Transport(_))));
    }

    #[test]
    fn should_map_success_with_missing_fields_to_transport() {
        let result: Result<VmStatus, _> = decode(br#"{"status":"success"}"#);
        assert!(matches!(result, Err(ControlError::Transport(_))));
    }

    #[test]
    fn should_accept_command_answer_without_message() {
        let result: Result<IgnoredAny, _> = decode(br#"{"status":"success"}"#);
        assert!(result.is_ok());
    }

    #[test]
    fn should_strip_trailing_slash_from_base_url() {
        let api = Config {
            base_url: "http://127.0.0.1:5000/".to_string(),
            timeout: None,
        }
        .build()
        .unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:5000");
        assert_eq!(api.url(STATUS_PATH), "http://127.0.0.1:5000/api/vm/status");
    }

    #[test]
    fn should_reject_relative_base_url() {
        let result = Config {
            base_url: "localhost".to_string(),
            timeout: None,
        }
        .build();
        assert!(matches!(
            result,
            Err(HttpClientError::InvalidBaseUrl { .. })
        ));
    }
}
