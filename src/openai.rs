//! Client construction for the OpenAI-compatible model endpoint.

use crate::config::ModelSettings;
use async_openai::{config::OpenAIConfig, Client};

/// Create a model client for the configured endpoint and key.
///
/// The key and base URL come from validated configuration; the client is
/// built once at startup and shared afterwards.
pub fn create_client(settings: &ModelSettings, api_key: &str) -> Client<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_base(settings.api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Client::with_config(config)
}
