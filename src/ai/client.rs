use async_trait::async_trait;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;

use crate::error::ClientError;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// One outbound generation request: an instruction plus reference text.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub system: String,
    pub instruction: String,
    pub document_text: String,
}

impl PromptRequest {
    pub fn reference_text(&self) -> String {
        format!("Document content for reference: {}", self.document_text)
    }
}

/// A remote generative-language service.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &PromptRequest) -> Result<String, ClientError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    config: ModelConfig,
}

impl OpenRouterClient {
    /// Builds a client from `OPENROUTER_API_KEY`.
    pub fn new(config: ModelConfig) -> Result<Self, ClientError> {
        let client = openrouter_api::OpenRouterClient::quick().map_err(|e| {
            ClientError::NotConfigured(format!("Failed to create OpenRouter client: {}", e))
        })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerationClient for OpenRouterClient {
    async fn generate(&self, request: &PromptRequest) -> Result<String, ClientError> {
        let prompt = format!("{}\n\n{}", request.instruction, request.reference_text());

        let messages = vec![
            Message::text("system", &request.system),
            Message::text("user", &prompt),
        ];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let completion = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()
            .map_err(|e| ClientError::Api(e.to_string()))?
            .chat_completion(completion)
            .await
            .map_err(|e| ClientError::Api(format!("OpenRouter API error: {}", e)))?;

        let choice = response.choices.first().ok_or(ClientError::EmptyResponse)?;
        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };

        if text.trim().is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Stands in for a provider whose key is missing, so generation fails with
/// a readable message instead of the app refusing to start.
#[derive(Debug, Clone)]
pub struct UnconfiguredClient {
    pub reason: String,
}

#[async_trait]
impl GenerationClient for UnconfiguredClient {
    async fn generate(&self, _request: &PromptRequest) -> Result<String, ClientError> {
        Err(ClientError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::time::Duration;

/// Mock client for testing - replays canned responses with optional delays
#[cfg(test)]
pub struct MockGenerationClient {
    responses: Mutex<Vec<Result<String, String>>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<PromptRequest>>,
}

#[cfg(test)]
impl MockGenerationClient {
    pub fn replying(body: &str) -> Self {
        Self::with_responses(vec![Ok(body.to_string())])
    }

    pub fn failing(error: &str) -> Self {
        Self::with_responses(vec![Err(error.to_string())])
    }

    pub fn with_responses(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, request: &PromptRequest) -> Result<String, ClientError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.requests.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        // Repeat the last response once the queue is drained
        let next = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses
                .first()
                .cloned()
                .unwrap_or(Err("no response configured".to_string()))
        };
        next.map_err(ClientError::Api)
    }
}
