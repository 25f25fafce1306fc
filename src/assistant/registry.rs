//! Feature and tool registry.
//!
//! Binds each user-facing feature to its instructions, model and the closed
//! set of tools the model may call for it.

use crate::config::{ModelSettings, Prompts};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A generation feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// City weather report backed by the weather fetcher.
    WeatherReport,
    /// Single-shot summary of a news article by URL.
    NewsSummary,
    /// Day itinerary backed by the events fetcher and the forecast sub-query.
    DayPlan,
    /// Today's forecast and places to visit, answered by the model alone.
    Forecast,
}

impl Feature {
    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Feature::WeatherReport => "weather_report",
            Feature::NewsSummary => "news_summary",
            Feature::DayPlan => "day_plan",
            Feature::Forecast => "forecast",
        }
    }

    /// Tools offered to the model for this feature.
    pub fn tools(self) -> &'static [Tool] {
        match self {
            Feature::WeatherReport => &[Tool::GetWeather],
            Feature::DayPlan => &[Tool::FindLocalEvents, Tool::GetForecastedWeather],
            Feature::NewsSummary | Feature::Forecast => &[],
        }
    }

    /// System instruction, if the feature has one.
    pub fn system_instruction(self, prompts: &Prompts) -> Option<&str> {
        let text = match self {
            Feature::WeatherReport => prompts.weather.system.as_str(),
            Feature::NewsSummary => prompts.news.system.as_str(),
            Feature::DayPlan => prompts.planner.system.as_str(),
            Feature::Forecast => "",
        };
        Some(text).filter(|t| !t.trim().is_empty())
    }

    /// The user instruction with `input` embedded.
    pub fn user_prompt(self, prompts: &Prompts, input: &str, today: NaiveDate) -> String {
        let (template, key) = match self {
            Feature::WeatherReport => (&prompts.weather.user, "city"),
            Feature::NewsSummary => (&prompts.news.summarize, "url"),
            Feature::DayPlan => (&prompts.planner.user, "city"),
            Feature::Forecast => (&prompts.planner.forecast, "city"),
        };

        let mut vars = HashMap::new();
        vars.insert(key.to_string(), input.to_string());
        vars.insert("date".to_string(), today.format("%Y-%m-%d").to_string());
        prompts.render_with_custom(template, &vars)
    }

    /// Model identifier for this feature.
    pub fn model(self, settings: &ModelSettings) -> &str {
        match self {
            Feature::Forecast => &settings.forecast_model,
            _ => &settings.model,
        }
    }

    /// Prefix for the user-facing message when generation fails.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Feature::WeatherReport => "Error fetching weather",
            Feature::NewsSummary => "Unable to summarize this article",
            Feature::DayPlan => "Error generating plan",
            Feature::Forecast => "Error fetching forecast",
        }
    }
}

/// A callable tool the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetWeather,
    FindLocalEvents,
    GetForecastedWeather,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::GetWeather, Tool::FindLocalEvents, Tool::GetForecastedWeather];

    pub fn name(self) -> &'static str {
        match self {
            Tool::GetWeather => "get_weather",
            Tool::FindLocalEvents => "find_local_events",
            Tool::GetForecastedWeather => "get_forecasted_weather",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::GetWeather => {
                "Fetches current weather for a given city. Temperatures are in Celsius and \
                sunrise/sunset are in local time."
            }
            Tool::FindLocalEvents => "Finds local events for a given city.",
            Tool::GetForecastedWeather => {
                "Fetches today's forecasted weather and tourist places to visit for a city."
            }
        }
    }

    /// Function declaration sent to the model.
    pub fn definition(self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "city": {
                            "type": "string",
                            "description": "Name of the city"
                        }
                    },
                    "required": ["city"]
                })),
                strict: None,
            },
        }
    }
}

/// Declarations for a feature's tools, built fresh per request.
pub fn tool_definitions(feature: Feature) -> Vec<ChatCompletionTool> {
    feature.tools().iter().map(|t| t.definition()).collect()
}
