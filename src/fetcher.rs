//! Read-only section requests and the shared HTTP client.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::models::{SectionKind, SectionPayload};

pub const NETWORK_MESSAGE: &str = "Network response was not ok";
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("{0}")]
    Application(String),
    #[error("malformed response: {0}")]
    Parse(String),
}

impl FetchError {
    /// The text shown in the section's error block. Parse failures read the
    /// same as transport failures.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Application(message) => message.clone(),
            FetchError::Network(_) | FetchError::Parse(_) => NETWORK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// One GET against the section's endpoint. No retry, no timeout.
    pub async fn fetch(&self, kind: SectionKind) -> Result<SectionPayload, FetchError> {
        let url = self
            .endpoint(kind.endpoint())
            .map_err(|err| FetchError::Network(err.to_string()))?;
        tracing::debug!(section = kind.label(), %url, "fetching section");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status}")));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        decode_section(kind, &body)
    }

    /// Form-encoded POST. The body is returned whatever the status code, since
    /// the server reports command failures as JSON on error statuses too.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        csrf_token: Option<&str>,
    ) -> Result<Vec<u8>, FetchError> {
        let url = self
            .endpoint(path)
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let mut request = self.http.post(url).header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        if !form.is_empty() {
            request = request.form(form);
        }

        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(body.to_vec())
    }
}

pub fn decode_section(kind: SectionKind, body: &[u8]) -> Result<SectionPayload, FetchError> {
    let value = decode_envelope(body)?;
    let payload = match kind {
        SectionKind::Predictions => SectionPayload::Predictions(typed(value)?),
        SectionKind::Analytics => SectionPayload::Analytics(typed(value)?),
        SectionKind::Models => SectionPayload::Models(typed(value)?),
    };
    Ok(payload)
}

/// Parses a `{success, ..., error?}` body, mapping `success: false` to
/// `FetchError::Application` carrying the server's message.
pub fn decode_envelope(body: &[u8]) -> Result<Value, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| FetchError::Parse(err.to_string()))?;
    match value.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(value),
        Some(false) => {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            Err(FetchError::Application(message.to_string()))
        }
        None => Err(FetchError::Parse("missing success flag".to_string())),
    }
}

pub fn typed<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|err| FetchError::Parse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, StubServer};

    #[test]
    fn application_errors_keep_the_server_message() {
        let err = decode_section(
            SectionKind::Models,
            br#"{"success": false, "error": "Error loading models: boom"}"#,
        )
        .unwrap_err();

        assert!(matches!(err, FetchError::Application(_)));
        assert_eq!(err.user_message(), "Error loading models: boom");
    }

    #[test]
    fn malformed_bodies_read_as_network_failures() {
        let err = decode_section(SectionKind::Analytics, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert_eq!(err.user_message(), NETWORK_MESSAGE);

        let err = decode_section(SectionKind::Analytics, br#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn decodes_predictions_without_a_model_version() {
        let payload =
            decode_section(SectionKind::Predictions, test_support::PREDICTIONS_BODY.as_bytes())
                .unwrap();
        let SectionPayload::Predictions(payload) = payload else {
            panic!("expected predictions payload");
        };
        assert_eq!(payload.active_model.name, "Readmission LR");
        assert_eq!(payload.active_model.version, "N/A");
        assert_eq!(payload.stats.high_risk_count, 4);
    }

    #[tokio::test]
    async fn fetch_hits_the_section_endpoint_once() {
        let server = StubServer::start().await;
        server.respond("/predictions/api/models/", 200, test_support::MODELS_BODY);
        let client = ApiClient::new(server.base_url()).unwrap();

        let payload = client.fetch(SectionKind::Models).await.unwrap();

        assert_eq!(payload.kind(), SectionKind::Models);
        assert_eq!(server.hits("/predictions/api/models/"), 1);
        assert_eq!(server.requests()[0].method, "GET");
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = StubServer::start().await;
        server.respond(
            "/predictions/api/analytics/",
            500,
            r#"{"success": false, "error": "Error loading analytics: db down"}"#,
        );
        let client = ApiClient::new(server.base_url()).unwrap();

        let err = client.fetch(SectionKind::Analytics).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(err.user_message(), NETWORK_MESSAGE);
    }
}
