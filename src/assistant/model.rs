//! Language model seam.

use crate::error::{BuddyError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionMessageToolCall, CreateChatCompletionRequest};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// The first candidate of a model response.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ChatCompletionMessageToolCall>,
}

/// Trait for a chat model that understands tool declarations.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submit a request and return the first candidate.
    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<ModelReply>;
}

/// Chat model served by an OpenAI-compatible endpoint.
pub struct OpenAIChat {
    client: Client<OpenAIConfig>,
}

impl OpenAIChat {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<ModelReply> {
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| BuddyError::Provider(e.to_string()))?;

        debug!("Model returned {} candidate(s)", response.choices.len());

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(BuddyError::EmptyCandidate)?;

        Ok(ModelReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}
