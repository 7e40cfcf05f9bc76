//! HTTP transport for a JSON story endpoint.
//!
//! The endpoint answers `GET` with `{"stories": [...]}` and accepts a `POST`
//! of a single story record. Either call may answer `{"error": "..."}` with a
//! success status, which counts as a failure.

use reqwest::StatusCode;
use serde_json::Value;

use super::{RemoteTransport, TransportError, TransportResult};
use crate::models::Story;
use crate::util::{compact_text, is_http_url, normalize_text_option};

#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> TransportResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteTransport for HttpTransport {
    async fn fetch(&self) -> TransportResult<Vec<Story>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let stories = parse_fetch_body(&body)?;
        tracing::debug!("Fetched {} stories from {}", stories.len(), self.endpoint);
        Ok(stories)
    }

    async fn push(&self, story: &Story) -> TransportResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(story)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_push_body(&body)?;
        tracing::debug!("Pushed story {} to {}", story.id, self.endpoint);
        Ok(())
    }
}

fn normalize_endpoint(raw: String) -> TransportResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        TransportError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(TransportError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

fn status_error(status: StatusCode, body: &str) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        body: compact_text(body),
    }
}

fn api_error(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(compact_text(message)),
        other => Some(compact_text(&other.to_string())),
    }
}

/// Decode a fetch response body into stories.
///
/// Records that fail to decode (no usable id) are skipped; the rest are kept.
fn parse_fetch_body(body: &str) -> TransportResult<Vec<Story>> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|error| TransportError::Payload(format!("response is not JSON: {error}")))?;

    if let Some(message) = api_error(&payload) {
        return Err(TransportError::Api(message));
    }

    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove("stories") {
            Some(Value::Array(records)) => records,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(TransportError::Payload(format!(
                    "`stories` must be an array, got {}",
                    compact_text(&other.to_string())
                )));
            }
        },
        other => {
            return Err(TransportError::Payload(format!(
                "unexpected response {}",
                compact_text(&other.to_string())
            )));
        }
    };

    let total = records.len();
    let stories = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Story>(record) {
            Ok(story) => Some(story),
            Err(error) => {
                tracing::warn!("Skipping undecodable remote story: {error}");
                None
            }
        })
        .collect::<Vec<_>>();

    if stories.len() < total {
        tracing::warn!("Kept {} of {total} remote stories", stories.len());
    }
    Ok(stories)
}

/// Check a push response body for an application-level error.
fn parse_push_body(body: &str) -> TransportResult<()> {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    match api_error(&payload) {
        Some(message) => Err(TransportError::Api(message)),
        None => Ok(()),
    }
}
