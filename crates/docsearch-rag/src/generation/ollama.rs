//! Ollama HTTP client for embeddings and prompt completion

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::OllamaConfig;
use crate::error::{Error, Result};

/// Ollama API client
///
/// Generation requests are retried with exponential backoff; embedding
/// requests are sent once and fail fast.
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: OllamaConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Embedding model name
    pub fn embed_model(&self) -> &str {
        &self.config.embed_model
    }

    /// Generation model name
    pub fn generate_model(&self) -> &str {
        &self.config.generate_model
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding (single attempt)
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let request = EmbedRequest {
            model: &self.config.embed_model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!("HTTP {} - {}", status, body)));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("failed to parse response: {}", e)))?;

        if embed_response.embedding.is_empty() {
            return Err(Error::embedding(format!(
                "model '{}' returned an empty embedding",
                self.config.embed_model
            )));
        }

        Ok(embed_response.embedding)
    }

    /// Complete a prompt with retry logic
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        tracing::info!("Generating answer with model: {}", self.config.generate_model);

        let url = url.as_str();
        let config = &self.config;
        let client = &self.client;

        self.retry_request(move || async move {
            let request = GenerateRequest {
                model: &config.generate_model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: config.temperature,
                },
            };

            let response = client
                .post(url)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::llm(format!(
                    "Generation failed: HTTP {} - {}",
                    status, body
                )));
            }

            let generate_response: GenerateResponse = response
                .json()
                .await
                .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

            Ok(generate_response.response)
        })
        .await
    }
}
