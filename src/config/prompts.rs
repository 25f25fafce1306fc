//! Prompt templates for Morning Buddy.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.
//! An empty `system` string means the feature is sent without a system instruction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub weather: WeatherPrompts,
    pub news: NewsPrompts,
    pub planner: PlannerPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the weather report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherPrompts {
    pub system: String,
    pub user: String,
}

impl Default for WeatherPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a professional weather assistant that converts weather data
(from the OpenWeather API) into a clear, natural, and accurate weather report.

Call the get_weather tool to obtain the data. Temperatures in the tool result are
already converted to Celsius and sunrise/sunset are already in local time.

Formatting and style rules:
1. Always begin with: "Here's the weather update for <city>, <country>:"
2. Report temperatures in Celsius (°C), rounded to 1 decimal place.
3. Report the following details clearly and in this order:
   - Weather condition (e.g., Clear sky, Light rain, Hazy, etc.)
   - Temperature and feels-like temperature in °C
   - Humidity (%)
   - Wind speed (m/s)
   - Sunrise and sunset times in local time, formatted as "HH:MM AM/PM"
4. Keep the tone friendly, human-like, and concise, as if explaining to a traveler.
5. Add a helpful suggestion based on the conditions, such as:
   - If hot: "Stay hydrated and wear light clothes."
   - If rainy: "Carry an umbrella."
   - If cold: "Wear something warm."
6. Use plain English sentences (no bullet points unless describing data).
7. If any field is missing, ignore it gracefully without mentioning the absence.
8. The final response should be under 120 words and sound natural, not robotic."#
                .to_string(),
            user: "Generate a clear, friendly weather report for {{city}}.".to_string(),
        }
    }
}

/// Prompts for article summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsPrompts {
    pub system: String,
    pub summarize: String,
}

impl Default for NewsPrompts {
    fn default() -> Self {
        Self {
            system: String::new(),
            summarize: "summarize news from the url:- {{url}}".to_string(),
        }
    }
}

/// Prompts for the day planner and its forecast sub-query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerPrompts {
    pub system: String,
    pub user: String,
    pub forecast: String,
}

impl Default for PlannerPrompts {
    fn default() -> Self {
        Self {
            system: String::new(),
            user: r#"You are a smart travel and event planner assistant.
Your job is to create a personalized day itinerary for the user in {{city}}.
Include weather, events, and places to visit. Keep tone friendly and actionable.
Use the find_local_events and get_forecasted_weather tools to gather today's information."#
                .to_string(),
            forecast: r#"Provide detailed weather forecast for {{city}} on {{date}}.
Also list top recommended places to visit in {{city}} today."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let weather_path = custom_path.join("weather.toml");
            if weather_path.exists() {
                let content = std::fs::read_to_string(&weather_path)?;
                prompts.weather = toml::from_str(&content)?;
            }

            let news_path = custom_path.join("news.toml");
            if news_path.exists() {
                let content = std::fs::read_to_string(&news_path)?;
                prompts.news = toml::from_str(&content)?;
            }

            let planner_path = custom_path.join("planner.toml");
            if planner_path.exists() {
                let content = std::fs::read_to_string(&planner_path)?;
                prompts.planner = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts
            .weather
            .system
            .contains("Here's the weather update for <city>, <country>:"));
        assert!(prompts.weather.system.contains("under 120 words"));
        assert!(prompts.news.system.is_empty());
        assert!(prompts.planner.forecast.contains("{{date}}"));
    }

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("city".to_string(), "Tokyo".to_string());

        let result = Prompts::render(&Prompts::default().weather.user, &vars);
        assert_eq!(result, "Generate a clear, friendly weather report for Tokyo.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("city".to_string(), "Paris".to_string());
        custom.insert("name".to_string(), "Asha".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("city".to_string(), "Lima".to_string());
        let result = prompts.render_with_custom("Hi {{name}}, plan {{city}}", &vars);
        assert_eq!(result, "Hi Asha, plan Lima");
    }

    #[test]
    fn test_custom_dir_overrides_one_feature() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("news.toml"),
            "summarize = \"Give three bullets for {{url}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.news.summarize, "Give three bullets for {{url}}");
        assert_eq!(prompts.weather.user, WeatherPrompts::default().user);
    }
}
