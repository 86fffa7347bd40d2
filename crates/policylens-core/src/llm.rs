//! Text-generation provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "ibm/granite-3-3-8b-instruct".to_string(),
            max_tokens: 180,
            temperature: Some(0.3),
            top_p: Some(1.0),
            top_k: Some(50),
            stop_sequences: vec![
                "<|user|>".to_string(),
                "<|system|>".to_string(),
            ],
            timeout: Duration::from_secs(30),
        }
    }
}

/// Trait for text-generation providers (e.g., WatsonX)
///
/// The synthesizer treats every error from `complete` as recoverable and
/// falls back to deterministic text, so implementations should fail fast
/// rather than retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Connect/authenticate with the provider
    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Complete `prompt` under the instructions in `system_prompt`
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String>;

    /// Identifier reported in generated summaries
    fn provider_id(&self) -> &str;
}

/// Provider used when no text-generation service is configured.
///
/// Declines every request, so every field keeps its deterministic text.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    pub const PROVIDER_ID: &'static str = "offline";
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn complete(&self, _prompt: &str, _system_prompt: &str) -> Result<String> {
        Err(Error::TextGeneration(
            "no text-generation provider configured".to_string(),
        ))
    }

    fn provider_id(&self) -> &str {
        Self::PROVIDER_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_generator_declines() {
        let mut generator = OfflineGenerator;
        generator.connect().await.unwrap();

        let result = generator.complete("prompt", "system").await;
        assert!(matches!(result, Err(Error::TextGeneration(_))));
        assert_eq!(generator.provider_id(), "offline");
    }
}
