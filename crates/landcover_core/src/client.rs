//! HTTP client for the remote land cover classification endpoint.

use crate::error::{ClassifyError, Result};
use crate::selection::SelectedFile;
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://land-cover-classification-4.onrender.com/classify";

/// Connection settings. The defaults are the only values the app uses.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    /// Multipart field carrying the image.
    pub field_name: &'static str,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            // The hosted service cold-starts slowly.
            timeout: Duration::from_secs(60),
            field_name: "image",
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

/// Turns a selected file into a land cover label.
pub trait Classify {
    fn classify(&self, file: &SelectedFile) -> Result<String>;
}

/// Blocking multipart client. Sends exactly one request per call, no retries.
pub struct HttpClassifier {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl HttpClassifier {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Classify for HttpClassifier {
    fn classify(&self, file: &SelectedFile) -> Result<String> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part(self.config.field_name, part);

        tracing::info!(
            "POST {} with {} ({} bytes)",
            self.config.endpoint,
            file.name,
            file.len()
        );
        let resp = self
            .http
            .post(&self.config.endpoint)
            .multipart(form)
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        tracing::debug!("Endpoint answered {status} with {} bytes", body.len());
        decode_response(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Interpret a response body. Only the body decides the outcome; the status
/// is used for diagnostics when the body is unusable.
pub fn decode_response(status: StatusCode, body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassifyError::Decode(format!("HTTP {status}, body is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(ClassifyError::Decode(format!(
            "HTTP {status}, expected a JSON object, got {value}"
        )));
    }
    let parsed: ClassifyResponse = serde_json::from_value(value)
        .map_err(|e| ClassifyError::Decode(format!("HTTP {status}: {e}")))?;

    if let Some(err) = parsed.error.filter(is_truthy) {
        let message = match err {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(ClassifyError::Remote(message));
    }

    match parsed.result {
        Some(Value::String(label)) => Ok(label),
        Some(other) => Err(ClassifyError::Decode(format!(
            "HTTP {status}, result is not a string: {other}"
        ))),
        None => Err(ClassifyError::Decode(format!(
            "HTTP {status}, neither result nor error present"
        ))),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::FileId;
    use mockito::{Matcher, Server};
    use rstest::rstest;

    fn sample_file() -> SelectedFile {
        SelectedFile::new(FileId(1), "cat.png", "image/png", b"PNGDATA".to_vec())
    }

    #[rstest]
    #[case(StatusCode::OK, r#"{"result":"Forest"}"#, "Forest")]
    #[case(StatusCode::OK, r#"{"result":"Water Bodies","extra":1}"#, "Water Bodies")]
    #[case(StatusCode::OK, r#"{"result":""}"#, "")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, r#"{"result":"Urban Areas"}"#, "Urban Areas")]
    #[case(StatusCode::OK, r#"{"result":"Forest","error":null}"#, "Forest")]
    #[case(StatusCode::OK, r#"{"result":"Forest","error":""}"#, "Forest")]
    fn decodes_result_labels(#[case] status: StatusCode, #[case] body: &str, #[case] want: &str) {
        assert_eq!(decode_response(status, body).unwrap(), want);
    }

    #[rstest]
    #[case(r#"{"error":"invalid image"}"#, "invalid image")]
    #[case(r#"{"error":"boom","result":"Forest"}"#, "boom")]
    #[case(r#"{"error":{"code":3}}"#, r#"{"code":3}"#)]
    fn error_field_wins(#[case] body: &str, #[case] message: &str) {
        match decode_response(StatusCode::INTERNAL_SERVER_ERROR, body) {
            Err(ClassifyError::Remote(m)) => assert_eq!(m, message),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, "No image provided")]
    #[case(StatusCode::OK, "")]
    #[case(StatusCode::OK, "{}")]
    #[case(StatusCode::OK, r#"{"result":42}"#)]
    #[case(StatusCode::OK, "[1,2]")]
    fn unusable_bodies_are_decode_errors(#[case] status: StatusCode, #[case] body: &str) {
        let err = decode_response(status, body).unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)), "{err:?}");
    }

    #[test]
    fn http_classifier_posts_a_single_image_part() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/classify")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="image"; filename="cat.png""#.into()),
                Matcher::Regex("(?i)content-type: image/png".into()),
                Matcher::Regex("PNGDATA".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":"Forest"}"#)
            .expect(1)
            .create();

        let client =
            HttpClassifier::new(ClientConfig::with_endpoint(format!("{}/classify", server.url())))
                .unwrap();
        assert_eq!(client.classify(&sample_file()).unwrap(), "Forest");
        mock.assert();
    }

    #[test]
    fn http_classifier_reports_remote_errors() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/classify")
            .with_status(500)
            .with_body(r#"{"error":"invalid image"}"#)
            .expect(1)
            .create();

        let client =
            HttpClassifier::new(ClientConfig::with_endpoint(format!("{}/classify", server.url())))
                .unwrap();
        let err = client.classify(&sample_file()).unwrap_err();
        assert!(err.is_remote());
        mock.assert();
    }

    #[test]
    fn http_classifier_maps_unreachable_host_to_transport() {
        // Port 9 (discard) on loopback is not expected to accept connections.
        let client = HttpClassifier::new(ClientConfig {
            endpoint: "http://127.0.0.1:9/classify".into(),
            timeout: Duration::from_secs(2),
            field_name: "image",
        })
        .unwrap();
        let err = client.classify(&sample_file()).unwrap_err();
        assert!(matches!(err, ClassifyError::Transport(_)), "{err:?}");
    }

    #[test]
    fn default_config_targets_the_hosted_endpoint() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.field_name, "image");
    }
}
