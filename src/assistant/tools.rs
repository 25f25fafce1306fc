//! Tool calls and their execution against the data fetchers.

use super::registry::{Feature, Tool};
use super::runner::complete_single;
use super::{ChatModel, SearchModel};
use crate::config::{ModelSettings, Prompts};
use crate::error::{BuddyError, Result};
use crate::fetchers::{DataSource, WeatherDigest};
use std::sync::Arc;
use tracing::{info, warn};

/// A parsed request from the model to run one tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// Current weather for a city.
    GetWeather { city: String },

    /// Local events for a city.
    FindLocalEvents { city: String },

    /// Today's forecast and places to visit for a city.
    GetForecastedWeather { city: String },
}

impl ToolCall {
    pub fn tool(&self) -> Tool {
        match self {
            ToolCall::GetWeather { .. } => Tool::GetWeather,
            ToolCall::FindLocalEvents { .. } => Tool::FindLocalEvents,
            ToolCall::GetForecastedWeather { .. } => Tool::GetForecastedWeather,
        }
    }
}

/// Parse a tool call from the model's function name and JSON arguments.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let tool = Tool::from_name(name)
        .ok_or_else(|| BuddyError::Tool(format!("Unknown tool: {}", name)))?;

    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| BuddyError::Tool(format!("Invalid tool arguments: {}", e)))?;

    let city = args["city"]
        .as_str()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| BuddyError::Tool("Missing 'city' argument".to_string()))?
        .to_string();

    Ok(match tool {
        Tool::GetWeather => ToolCall::GetWeather { city },
        Tool::FindLocalEvents => ToolCall::FindLocalEvents { city },
        Tool::GetForecastedWeather => ToolCall::GetForecastedWeather { city },
    })
}

/// Tool execution context with access to the fetchers and the model.
pub struct ToolContext {
    data: Arc<dyn DataSource>,
    model: Arc<dyn ChatModel>,
    search: Option<Arc<dyn SearchModel>>,
    prompts: Arc<Prompts>,
    settings: ModelSettings,
    default_utc_offset_minutes: i32,
}

impl ToolContext {
    pub fn new(
        data: Arc<dyn DataSource>,
        model: Arc<dyn ChatModel>,
        prompts: Arc<Prompts>,
        settings: ModelSettings,
        default_utc_offset_minutes: i32,
    ) -> Self {
        Self {
            data,
            model,
            search: None,
            prompts,
            settings,
            default_utc_offset_minutes,
        }
    }

    /// Answer forecast requests through a search-grounded model.
    pub fn with_search(mut self, search: Arc<dyn SearchModel>) -> Self {
        self.search = Some(search);
        self
    }

    /// Today's forecast and places to visit for `city`.
    async fn forecast(&self, city: &str) -> Result<String> {
        match &self.search {
            Some(search) => {
                let today = chrono::Local::now().date_naive();
                let prompt = Feature::Forecast.user_prompt(&self.prompts, city, today);
                search
                    .search(Feature::Forecast.model(&self.settings), &prompt)
                    .await
            }
            None => {
                complete_single(
                    self.model.as_ref(),
                    &self.prompts,
                    &self.settings,
                    Feature::Forecast,
                    city,
                )
                .await
            }
        }
    }

    /// Execute a tool call and return the JSON text handed back to the model.
    ///
    /// Failures become `{"error": ...}` results, never errors.
    pub async fn execute(&self, call: &ToolCall) -> String {
        info!("Running tool {}", call.tool().name());

        let value = match call {
            ToolCall::GetWeather { city } => match self.data.weather(city).await {
                Ok(payload) => {
                    let digest =
                        WeatherDigest::from_payload(city, &payload, self.default_utc_offset_minutes);
                    serde_json::to_value(digest)
                }
                Err(e) => {
                    warn!("{}", e);
                    Ok(e.to_json())
                }
            },
            ToolCall::FindLocalEvents { city } => match self.data.events(city).await {
                Ok(payload) => serde_json::to_value(payload),
                Err(e) => {
                    warn!("{}", e);
                    Ok(e.to_json())
                }
            },
            ToolCall::GetForecastedWeather { city } => {
                match self.forecast(city).await {
                    Ok(text) => Ok(serde_json::json!({ "forecast": text })),
                    Err(e) => {
                        warn!("Forecast sub-query failed: {}", e);
                        Ok(serde_json::json!({ "error": format!("forecast request failed: {}", e) }))
                    }
                }
            }
        };

        match value {
            Ok(v) => v.to_string(),
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_weather() {
        let call = parse_tool_call("get_weather", r#"{"city": " Tokyo "}"#).unwrap();
        assert_eq!(
            call,
            ToolCall::GetWeather {
                city: "Tokyo".to_string()
            }
        );
        assert_eq!(call.tool(), Tool::GetWeather);
    }

    #[test]
    fn test_parse_forecast_tool() {
        let call = parse_tool_call("get_forecasted_weather", r#"{"city": "Delhi"}"#).unwrap();
        assert!(matches!(call, ToolCall::GetForecastedWeather { ref city } if city == "Delhi"));
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert!(parse_tool_call("search", r#"{"city": "Delhi"}"#).is_err());
        assert!(parse_tool_call("get_weather", "not json").is_err());
        assert!(parse_tool_call("get_weather", r#"{"town": "Delhi"}"#).is_err());
        assert!(parse_tool_call("find_local_events", r#"{"city": "  "}"#).is_err());
    }
}
