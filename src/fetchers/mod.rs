//! Data fetchers for the external weather, news and events providers.
//!
//! Each fetcher issues one GET request and returns the decoded body, or a
//! [`FetchError`] describing the transport failure. Payload contents are not
//! validated here.

mod http;
mod models;

pub use http::HttpDataSource;
pub use models::{
    is_web_url, kelvin_to_celsius, Article, EventDate, EventResult, EventsPayload, MainReadings,
    NewsPayload, RawArticle, SystemInfo, Wind, WeatherCondition, WeatherDigest, WeatherPayload,
};

use async_trait::async_trait;
use thiserror::Error;

/// A fetch that never produced a decodable body.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} request failed: {message}")]
pub struct FetchError {
    pub provider: &'static str,
    pub message: String,
}

impl FetchError {
    pub fn new(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }

    /// The tagged error value handed to the language model as a tool result.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Trait for the external data providers, one method per fetcher.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Current weather for a city.
    async fn weather(&self, city: &str) -> std::result::Result<WeatherPayload, FetchError>;

    /// Latest articles for a topic, newest first.
    async fn news(&self, topic: &str) -> std::result::Result<Vec<RawArticle>, FetchError>;

    /// Local events for a city.
    async fn events(&self, city: &str) -> std::result::Result<EventsPayload, FetchError>;
}
