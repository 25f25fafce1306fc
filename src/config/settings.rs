//! Configuration settings for Morning Buddy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub providers: ProviderSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the OpenAI-compatible endpoint.
    pub api_base: String,
    /// Model used for weather reports, article summaries and day plans.
    pub model: String,
    /// Model used for the forecast sub-query of the planner.
    pub forecast_model: String,
    /// Upper bound on model round trips while tools are being called.
    pub max_tool_rounds: usize,
    /// Sampling temperature. None leaves the provider default.
    pub temperature: Option<f32>,
    /// Answer the forecast sub-query with Google Search enabled.
    pub forecast_search: bool,
    /// Base URL of the native Gemini API used for search-grounded calls.
    pub search_api_base: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash".to_string(),
            forecast_model: "gemini-2.5-flash-lite".to_string(),
            max_tool_rounds: 5,
            temperature: None,
            forecast_search: true,
            search_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// External data provider endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// OpenWeather current-weather API base.
    pub weather_url: String,
    /// NewsAPI base.
    pub news_url: String,
    /// SerpAPI base.
    pub events_url: String,
    /// Offset used for sunrise/sunset when the payload carries no timezone (IST).
    pub default_utc_offset_minutes: i32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            weather_url: "https://api.openweathermap.org/data/2.5".to_string(),
            news_url: "https://newsapi.org/v2".to_string(),
            events_url: "https://serpapi.com".to_string(),
            default_utc_offset_minutes: 330,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("morning-buddy")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
