use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use kimi_config::Settings;
use kimi_core::chat::{ChatMessage, ChatRequest, ChatResponse, ModelInfo, ModelsResponse};
use kimi_core::conversation::Conversation;
use kimi_core::prompt::{self, CODER_PERSONA, NO_RESPONSE_SENTINEL};

use crate::error::{ClientError, Result};

/// Client for the Kimi K2 chat-completion API.
///
/// Owns the connection pool, the bearer credential and the sampling
/// defaults; every call is stateless beyond those. Construction rejects
/// invalid settings so no network call ever starts from a bad config.
#[derive(Clone, Debug)]
pub struct KimiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl KimiClient {
    /// Build a client from validated settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let errors = settings.validation_errors();
        if !errors.is_empty() {
            return Err(ClientError::Config(errors));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the completion request body. Pure given its inputs, so
    /// identical inputs serialize to identical bodies.
    pub fn completion_request(&self, prompt: &str, context: &str) -> ChatRequest {
        ChatRequest::new(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .with_message(ChatMessage::system(CODER_PERSONA))
            .with_message(ChatMessage::user(prompt::completion(prompt, context)))
    }

    /// Generate a code completion for `prompt`, with surrounding editor
    /// `context` interpolated into the user message
    pub async fn complete(&self, prompt: &str, context: &str) -> Result<String> {
        let request = self.completion_request(prompt, context);
        let response = self.send_chat(&request).await?;
        Ok(Self::extract_content(&response))
    }

    /// Review `code` for bugs, performance, quality and security issues
    pub async fn analyze(&self, code: &str, language: &str) -> Result<String> {
        self.complete(&prompt::analysis(code, language), "").await
    }

    /// Generate unit tests for `code`
    pub async fn generate_tests(
        &self,
        code: &str,
        language: &str,
        framework: &str,
    ) -> Result<String> {
        self.complete(&prompt::test_generation(code, language, framework), "")
            .await
    }

    /// Explain what `code` does
    pub async fn explain(&self, code: &str, language: &str) -> Result<String> {
        self.complete(&prompt::explanation(code, language), "").await
    }

    /// One-shot chat message with an optional system prompt
    pub async fn chat(&self, message: &str, system_prompt: Option<&str>) -> Result<String> {
        let mut request = ChatRequest::new(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        if let Some(system) = system_prompt {
            request = request.with_message(ChatMessage::system(system));
        }
        request = request.with_message(ChatMessage::user(message));

        let response = self.send_chat(&request).await?;
        Ok(Self::extract_content(&response))
    }

    /// Multi-turn chat: appends the user message to `conversation`, sends
    /// the full history and appends the assistant reply on success
    pub async fn converse(&self, conversation: &mut Conversation, message: &str) -> Result<String> {
        conversation.push_user(message);

        let request = ChatRequest::new(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .with_messages(conversation.messages().to_vec());

        let response = self.send_chat(&request).await?;
        let reply = Self::extract_content(&response);
        conversation.push_assistant(reply.clone());
        Ok(reply)
    }

    /// List the models the endpoint serves
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("models request failed: {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let parsed: ModelsResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Protocol(e.to_string()))?;
        Ok(parsed.data)
    }

    /// The one request primitive every operation funnels into
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, "POST {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("chat request failed: {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    fn extract_content(response: &ChatResponse) -> String {
        response
            .first_content()
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string())
    }
}
