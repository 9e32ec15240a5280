//! Text generation backend
//!
//! The gateway talks to the generator through the [`TextGenerator`]
//! trait so tests can substitute a canned backend. The production
//! implementation calls the Gemini `generateContent` REST endpoint.

use super::types::{GatewayError, GeneratedCandidate};
use crate::config::GenerationConfig;
use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// One-shot text generation for a prepared prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedCandidate, GatewayError>;

    /// Identifier of the model answering the calls
    fn model(&self) -> &str;
}

/// Gemini REST client. One request per call, no retries; the caller
/// surfaces failures to the user instead of papering over them.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, AppError> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::Config("GEMINI_API_KEY is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Replace the API key wherever it shows up in diagnostics
    fn mask(&self, text: &str) -> String {
        text.replace(&self.api_key, "***")
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedCandidate, GatewayError> {
        let url = self.request_url();
        debug!("📡 Calling generation API: {}", self.mask(&url));

        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::GenerationUnavailable("request timed out".to_string())
                } else {
                    GatewayError::GenerationUnavailable(self.mask(&e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "❌ Generation API returned {}: {}",
                status,
                self.mask(body.chars().take(512).collect::<String>().as_str())
            );
            return Err(GatewayError::GenerationUnavailable(format!(
                "HTTP {}",
                status
            )));
        }

        let payload: GenerateResponse = response.json().await.map_err(|e| {
            GatewayError::GenerationUnavailable(format!(
                "invalid response body: {}",
                self.mask(&e.to_string())
            ))
        })?;

        let text = first_candidate_text(payload).ok_or(GatewayError::GenerationEmpty)?;
        debug!("✅ Generation produced {} chars", text.len());

        Ok(GeneratedCandidate {
            text,
            model: self.model.clone(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the first candidate's first part out of a response.
/// Returns None when the path is missing or the text is blank.
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    fn test_config(base_url: String, timeout_secs: u64) -> GenerationConfig {
        GenerationConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url,
            timeout_secs,
        }
    }

    #[test]
    fn test_candidate_text_happy_path() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"SELECT * FROM Employee"}]}}]}"#,
        );
        assert_eq!(
            first_candidate_text(response),
            Some("SELECT * FROM Employee".to_string())
        );
    }

    #[test]
    fn test_candidate_text_is_trimmed() {
        let response =
            parse(r#"{"candidates":[{"content":{"parts":[{"text":"\nSELECT 1\n"}]}}]}"#);
        assert_eq!(first_candidate_text(response), Some("SELECT 1".to_string()));
    }

    #[test]
    fn test_no_candidates_yields_none() {
        assert_eq!(first_candidate_text(parse(r#"{"candidates":[]}"#)), None);
        assert_eq!(first_candidate_text(parse(r#"{}"#)), None);
    }

    #[test]
    fn test_missing_content_yields_none() {
        assert_eq!(first_candidate_text(parse(r#"{"candidates":[{}]}"#)), None);
    }

    #[test]
    fn test_missing_parts_yields_none() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#);
        assert_eq!(first_candidate_text(response), None);
    }

    #[test]
    fn test_blank_text_yields_none() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#);
        assert_eq!(first_candidate_text(response), None);
    }

    #[test]
    fn test_client_rejects_empty_api_key() {
        let config = GenerationConfig {
            api_key: "  ".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        };
        assert!(GeminiClient::new(&config).is_err());
    }

    #[test]
    fn test_request_url_shape() {
        let config = test_config("https://example.invalid/v1beta/".to_string(), 30);
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.request_url(),
            "https://example.invalid/v1beta/models/gemini-2.5-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_mask_hides_api_key() {
        let config = test_config("https://example.invalid/v1beta".to_string(), 30);
        let client = GeminiClient::new(&config).unwrap();
        let masked = client.mask(&client.request_url());
        assert!(!masked.contains("test-key"));
        assert!(masked.contains("***"));
    }

    #[tokio::test]
    async fn test_unresponsive_backend_fails_within_the_deadline() {
        // Accept connections but never answer, so the client timeout fires.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _hold = socket;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                });
            }
        });

        let config = test_config(format!("http://{}", addr), 1);
        let client = GeminiClient::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = client.generate("list departments").await.unwrap_err();
        assert!(matches!(err, GatewayError::GenerationUnavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    #[ignore = "requires GEMINI_API_KEY and network access"]
    async fn test_live_generation_round_trip() {
        dotenvy::dotenv().ok();
        let config = crate::config::Settings::load().unwrap().generation;
        let client = GeminiClient::new(&config).unwrap();
        let candidate = client
            .generate(&crate::nlquery::prompt::build_prompt("how many departments are there"))
            .await
            .unwrap();
        assert!(!candidate.text.is_empty());
    }
}
