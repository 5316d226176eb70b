//! OpenAI-compatible chat-completions backend.
//!
//! Talks to any endpoint that speaks the `/chat/completions` wire format.
//! The API key is read from an environment variable at construction time so
//! a misconfigured run fails before any participant is processed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use elicit_core::config::InferenceConfig;
use elicit_core::error::{ElicitError, Result};

use crate::InferenceService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Inference backend calling an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiInference {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
}

impl OpenAiInference {
    /// Build a client from the inference configuration.
    ///
    /// Fails when the configured key environment variable is unset or empty.
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ElicitError::Inference(format!(
                    "API key environment variable '{}' is not set",
                    config.api_key_env
                ))
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ElicitError::Inference(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl InferenceService for OpenAiInference {
    async fn infer(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending inference request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ElicitError::Inference(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ElicitError::Inference(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ElicitError::Inference(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ElicitError::Inference("response contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(key_env: &str) -> InferenceConfig {
        InferenceConfig {
            api_key_env: key_env.to_string(),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result = OpenAiInference::from_config(&test_config("ELICIT_TEST_NO_SUCH_KEY"));
        assert!(matches!(result, Err(ElicitError::Inference(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        std::env::set_var("ELICIT_TEST_KEY_TRIM", "sk-test");
        let mut config = test_config("ELICIT_TEST_KEY_TRIM");
        config.base_url = "https://example.test/v1/".to_string();
        let client = OpenAiInference::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/v1");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "1. Requirement: ..."}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "1. Requirement: ...");
    }
}
