//! HTTP scoring client for a locally served classification model.

use serde::{Deserialize, Serialize};

use super::scoring::{Score, ScoringClient};
use super::ClassificationError;

/// HTTP client for a local scoring service.
///
/// The model handle is owned explicitly: build the client once at startup
/// and pass it into the adapter. There is no lazily initialized global.
pub struct HttpScoringClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_ms: u64,
}

impl HttpScoringClient {
    /// Create a new client pointing at a scoring service.
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_ms,
        }
    }

    /// Default local scoring service with a 30-second timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:8008", 30_000)
    }
}

/// Request body for POST /classify
#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Response body from POST /classify
#[derive(Deserialize)]
struct ClassifyResponse {
    label: String,
    confidence: f32,
}

impl ScoringClient for HttpScoringClient {
    fn score(&self, text: &str) -> Result<Score, ClassificationError> {
        let url = format!("{}/classify", self.base_url);
        let body = ClassifyRequest { text };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ClassificationError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ClassificationError::Timeout(self.timeout_ms)
            } else {
                ClassificationError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassificationError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ClassifyResponse = response
            .json()
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

        if !(0.0..=1.0).contains(&parsed.confidence) {
            return Err(ClassificationError::ConfidenceOutOfRange(parsed.confidence));
        }

        Ok(Score {
            label: parsed.label,
            confidence: parsed.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_stores_timeout() {
        let client = HttpScoringClient::new("http://localhost:8008", 5_000);
        assert_eq!(client.base_url, "http://localhost:8008");
        assert_eq!(client.timeout_ms, 5_000);
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = HttpScoringClient::new("http://localhost:8008/", 5_000);
        assert_eq!(client.base_url, "http://localhost:8008");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = HttpScoringClient::default_local();
        assert_eq!(client.base_url, "http://localhost:8008");
        assert_eq!(client.timeout_ms, 30_000);
    }
}
