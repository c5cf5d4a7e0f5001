//! Tone analyzer backed by an Ollama-compatible `/api/generate` endpoint

use crate::config::ToneConfig;
use crate::tone::prompt::{build_prompt, parse_tone_response, truncate_chars};
use crate::tone::{ToneAnalyzer, ToneError, ToneSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Calls a local model server for tone summaries
#[derive(Debug, Clone)]
pub struct OllamaToneAnalyzer {
    client: Client,
    endpoint: Url,
    model: String,
    temperature: f32,
    max_input_length: usize,
}

impl OllamaToneAnalyzer {
    /// Builds an analyzer from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(OllamaToneAnalyzer)` - Ready to analyze
    /// * `Err(ToneError)` - The base URL is unusable or the client failed to build
    pub fn new(config: &ToneConfig) -> Result<Self, ToneError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ToneError::InvalidEndpoint(format!("{}: {}", config.base_url, e)))?;
        // Keep any path prefix on the base URL (e.g. behind a reverse proxy)
        let base = if base.path().ends_with('/') {
            base
        } else {
            Url::parse(&format!("{}/", base))
                .map_err(|e| ToneError::InvalidEndpoint(e.to_string()))?
        };
        let endpoint = base
            .join("api/generate")
            .map_err(|e| ToneError::InvalidEndpoint(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            max_input_length: config.max_input_length,
        })
    }

    /// The full URL requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ToneAnalyzer for OllamaToneAnalyzer {
    async fn analyze(&self, text: &str) -> Result<ToneSummary, ToneError> {
        let text = truncate_chars(text, self.max_input_length);
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(text),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!("Calling model {} at {}", self.model, self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToneError::Status(status.as_u16()));
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ToneError::Decode(e.to_string()))?;

        Ok(parse_tone_response(&envelope.response))
    }
}
