//! HTTP implementation of the Wordatro backend contract. Everything speaks
//! the `{code, error, data}` envelope; a non-200 status or a non-zero `code`
//! is a transport failure carrying the envelope error or the HTTP status
//! text.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wordatro_core::{AnalysisBackend, AnalysisResult, HelperError, RequestKey, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// The raw `{code, error, data}` wrapper. `data` stays untyped until the
/// `code` check has passed: error responses carry a placeholder `{}` there
/// that must not be decoded against the success shape.
#[derive(Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    error: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    filename: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    filename: String,
}

#[derive(Deserialize)]
struct DictionariesData {
    dictionaries: Vec<String>,
}

#[derive(Deserialize)]
struct StrategiesData {
    strategies: Vec<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Static-file path for uploaded and derived images (originals, debug
    /// images, region previews), all addressed by filename.
    pub fn uploaded_file_url(&self, filename: &str) -> String {
        format!("{}/upload/{}", self.base_url, filename)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(HelperError::transport)?;
        unwrap_envelope(status, &body)
    }
}

/// Apply the envelope rules: HTTP failure first (status text), then the
/// envelope `code` (envelope error message), then the payload itself.
fn unwrap_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        return Err(HelperError::transport(
            status.canonical_reason().unwrap_or_else(|| status.as_str()),
        ));
    }
    let envelope: ApiEnvelope = serde_json::from_str(body).map_err(HelperError::transport)?;
    if envelope.code != 0 {
        let message = if envelope.error.is_empty() {
            format!("server error code {}", envelope.code)
        } else {
            envelope.error
        };
        return Err(HelperError::Transport(message));
    }
    serde_json::from_value(envelope.data).map_err(HelperError::transport)
}

impl AnalysisBackend for ApiClient {
    async fn upload(&self, original_name: &str, bytes: Vec<u8>) -> Result<String> {
        debug!("uploading {original_name} ({} bytes)", bytes.len());
        let part = Part::bytes(bytes).file_name(original_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.api_url("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(HelperError::transport)?;
        let data: UploadData = Self::decode(response).await?;
        Ok(data.filename)
    }

    async fn analyze(&self, key: &RequestKey) -> Result<AnalysisResult> {
        debug!("requesting analysis for {key}");
        let payload = AnalyzeRequest {
            filename: &key.filename,
            dictionary: key.dictionary.as_deref(),
            strategy: key.strategy.as_deref(),
        };
        let response = self
            .http
            .post(self.api_url("analyze"))
            .json(&payload)
            .send()
            .await
            .map_err(HelperError::transport)?;
        Self::decode(response).await
    }

    async fn dictionaries(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.api_url("dictionaries"))
            .send()
            .await
            .map_err(HelperError::transport)?;
        let data: DictionariesData = Self::decode(response).await?;
        Ok(data.dictionaries)
    }

    async fn strategies(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.api_url("strategies"))
            .send()
            .await
            .map_err(HelperError::transport)?;
        let data: StrategiesData = Self::decode(response).await?;
        Ok(data.strategies)
    }
}
