//! Ollama chat client
//!
//! Sends a single user message to `/api/chat` without streaming and reads
//! the answer from `message.content`, falling back to `response`.
//!
//! Author: hephaex@gmail.com

use std::time::Duration;

use async_trait::async_trait;
use pdfask_core::{LlmClient, LlmConfig, PdfAskError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Returned when the model reply carries no usable text
pub const NO_VALID_ANSWER: &str = "⚠️ No valid answer.";

/// Error message when the reply body is not JSON
pub const PARSE_FAILURE: &str = "Failed to parse LLM response.";

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatResponse {
    message: Option<ReplyMessage>,
    response: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_answer(self) -> String {
        self.message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .or(self.response.filter(|r| !r.is_empty()))
            .unwrap_or_else(|| NO_VALID_ANSWER.to_string())
    }
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PdfAskError::ConfigError(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| PdfAskError::LlmError(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Ollama returned an error status");
        }

        let raw = response
            .text()
            .await
            .map_err(|e| PdfAskError::LlmError(format!("Failed to read Ollama response: {e}")))?;

        let parsed: ChatResponse = serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, raw = %raw, "JSON parse error on LLM response");
            PdfAskError::LlmError(PARSE_FAILURE.to_string())
        })?;

        debug!(model = %self.model, "Ollama answered");
        Ok(parsed.into_answer())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(server.uri(), "llama3", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::from_config(&LlmConfig::default()).unwrap();
        assert_eq!(client.model(), "llama3");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_answer_fallbacks() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"message":{"content":"from chat"},"response":"x"}"#).unwrap();
        assert_eq!(reply.into_answer(), "from chat");

        let reply: ChatResponse =
            serde_json::from_str(r#"{"message":{"content":""},"response":"from generate"}"#)
                .unwrap();
        assert_eq!(reply.into_answer(), "from generate");

        let reply: ChatResponse = serde_json::from_str(r#"{"error":"model not found"}"#).unwrap();
        assert_eq!(reply.into_answer(), NO_VALID_ANSWER);
    }

    #[tokio::test]
    async fn test_generate_posts_chat_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3",
                "stream": false,
                "messages": [{"role": "user", "content": "What is new?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": "Nothing much."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).generate("What is new?").await.unwrap();
        assert_eq!(answer, "Nothing much.");
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hi").await.unwrap_err();
        assert_eq!(err.to_string(), format!("LLM error: {PARSE_FAILURE}"));
    }
}
