//! API credentials loaded from the environment.

use crate::error::{BuddyError, Result};

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";

/// All variables that must be set before the app can start.
pub const REQUIRED_VARS: [&str; 4] = [
    GOOGLE_API_KEY,
    OPENWEATHER_API_KEY,
    NEWS_API_KEY,
    SERPAPI_API_KEY,
];

/// Read-only secrets for the model and data providers.
#[derive(Clone)]
pub struct Credentials {
    pub model_api_key: String,
    pub weather_api_key: String,
    pub news_api_key: String,
    pub events_api_key: String,
}

impl Credentials {
    /// Load credentials from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary lookup. The first missing or
    /// blank variable is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(BuddyError::Config(format!("{} not found", name))),
            }
        };

        Ok(Self {
            model_api_key: get(GOOGLE_API_KEY)?,
            weather_api_key: get(OPENWEATHER_API_KEY)?,
            news_api_key: get(NEWS_API_KEY)?,
            events_api_key: get(SERPAPI_API_KEY)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("model_api_key", &"***")
            .field("weather_api_key", &"***")
            .field("news_api_key", &"***")
            .field("events_api_key", &"***")
            .finish()
    }
}
