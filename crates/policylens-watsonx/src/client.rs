//! WatsonX AI client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use policylens_core::{Error, GenerationConfig, Result, TextGenerator};

use crate::config::WatsonxConfig;

/// WatsonX AI client
pub struct WatsonxClient {
    config: WatsonxConfig,
    access_token: Option<String>,
    client: Client,
    generation: GenerationConfig,
    provider_id: String,
}

#[derive(Serialize)]
struct TokenRequest {
    grant_type: String,
    apikey: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct GenerationParams {
    decoding_method: String,
    max_new_tokens: u32,
    min_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    top_k: u32,
    top_p: f32,
    repetition_penalty: f32,
    stop_sequences: Vec<String>,
}

#[derive(Serialize)]
struct GenerationRequest {
    input: String,
    parameters: GenerationParams,
    model_id: String,
    project_id: String,
}

#[derive(Deserialize)]
struct GenerationResults {
    generated_text: String,
}

#[derive(Deserialize)]
struct GenerationData {
    results: Vec<GenerationResults>,
}

impl WatsonxClient {
    /// Model constants
    pub const GRANITE_3_3_8B_INSTRUCT: &'static str = "ibm/granite-3-3-8b-instruct";
    pub const GRANITE_4_H_SMALL: &'static str = "ibm/granite-4-h-small";

    /// Create a new WatsonX client from configuration
    pub fn new(config: WatsonxConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let generation = GenerationConfig {
            model_id: config
                .model_id
                .clone()
                .unwrap_or_else(|| Self::GRANITE_3_3_8B_INSTRUCT.to_string()),
            ..Default::default()
        };
        let provider_id = format!("watsonx/{}", generation.model_id);

        Ok(Self {
            config,
            access_token: None,
            client,
            generation,
            provider_id,
        })
    }

    /// Create a new WatsonX client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = WatsonxConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.generation.model_id = model_id.into();
        self.provider_id = format!("watsonx/{}", self.generation.model_id);
        self
    }

    /// Replace the generation parameters, keeping the selected model
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        let model_id = std::mem::take(&mut self.generation.model_id);
        self.generation = GenerationConfig { model_id, ..config };
        self
    }

    /// Lay out a system and user turn in the Granite chat format
    pub(crate) fn format_input(prompt: &str, system_prompt: &str) -> String {
        format!(
            "<|system|>\n{}\n<|user|>\n{}\n<|assistant|>\n",
            system_prompt.trim(),
            prompt.trim()
        )
    }

    /// Trim chat artifacts and labels from generated text
    pub(crate) fn clean_response(raw: &str) -> String {
        let mut text = raw.trim();

        if let Some(marker) = text.find("<|") {
            text = text[..marker].trim();
        }

        for prefix in ["Answer:", "Summary:", "Response:"] {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim();
            }
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Perform the actual generation request
    async fn perform_generation(&self, input: &str, config: &GenerationConfig) -> Result<String> {
        let access_token = self
            .access_token
            .as_ref()
            .ok_or_else(|| Error::Authentication("Not authenticated. Call connect() first.".to_string()))?;

        let params = GenerationParams {
            decoding_method: if config.temperature.is_some() { "sample" } else { "greedy" }
                .to_string(),
            max_new_tokens: config.max_tokens,
            min_new_tokens: 5,
            temperature: config.temperature,
            top_k: config.top_k.unwrap_or(50),
            top_p: config.top_p.unwrap_or(1.0),
            repetition_penalty: 1.1,
            stop_sequences: config.stop_sequences.clone(),
        };

        let request_body = GenerationRequest {
            input: input.to_string(),
            parameters: params,
            model_id: config.model_id.clone(),
            project_id: self.config.project_id.clone(),
        };

        let url = format!(
            "{}/ml/v1/text/generation_stream?version=2023-05-29",
            self.config.api_url
        );

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::TextGeneration(format!(
                "WatsonX API request failed with status {}: {}",
                status, error_text
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let answer = Self::collect_stream(&response_text);
        if answer.trim().is_empty() {
            return Err(Error::TextGeneration(
                "Empty response from WatsonX API".to_string(),
            ));
        }

        Ok(Self::clean_response(&answer))
    }

    /// Concatenate generated text from a Server-Sent Events body
    pub(crate) fn collect_stream(response_text: &str) -> String {
        let mut answer = String::new();

        for line in response_text.lines() {
            let Some(json_data) = line.strip_prefix("data: ") else {
                continue;
            };

            if json_data.trim().is_empty() || json_data.trim() == "[DONE]" {
                continue;
            }

            match serde_json::from_str::<GenerationData>(json_data) {
                Ok(data) => {
                    if let Some(result) = data.results.first() {
                        answer.push_str(&result.generated_text);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse WatsonX stream line: {}", e);
                }
            }
        }

        answer
    }
}

#[async_trait]
impl TextGenerator for WatsonxClient {
    async fn connect(&mut self) -> Result<()> {
        let token_request = TokenRequest {
            grant_type: "urn:ibm:params:oauth:grant-type:apikey".to_string(),
            apikey: self.config.api_key.clone(),
        };

        let url = format!("https://{}/identity/token", self.config.iam_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(&token_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "Authentication failed: {}",
                response.status()
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.access_token = Some(token_response.access_token);
        debug!("Authenticated with WatsonX IAM");

        Ok(())
    }

    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        let input = Self::format_input(prompt, system_prompt);
        let generation_future = self.perform_generation(&input, &self.generation);

        match timeout(self.generation.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("WatsonX request timed out".to_string())),
        }
    }

    fn provider_id(&self) -> &str {
        &self.provider_id
    }
}
