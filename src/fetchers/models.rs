//! Provider payload records.
//!
//! Every field the providers may leave out is optional. Consumers map missing
//! inputs to missing outputs and never treat an absent field as an error.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;

/// Current weather response from OpenWeather.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherPayload {
    pub name: Option<String>,
    pub weather: Option<Vec<WeatherCondition>>,
    pub main: Option<MainReadings>,
    pub wind: Option<Wind>,
    pub sys: Option<SystemInfo>,
    /// Shift in seconds from UTC.
    pub timezone: Option<i32>,
    /// Present on error responses, e.g. "city not found".
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherCondition {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemInfo {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Weather facts handed to the language model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherDigest {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message: Option<String>,
}

impl WeatherDigest {
    /// Map a raw payload into reportable facts.
    ///
    /// Sunrise and sunset use the payload's own timezone when it has one,
    /// otherwise `default_offset_minutes`.
    pub fn from_payload(city: &str, payload: &WeatherPayload, default_offset_minutes: i32) -> Self {
        let main = payload.main.as_ref();
        let sys = payload.sys.as_ref();
        let offset_seconds = payload
            .timezone
            .unwrap_or(default_offset_minutes.saturating_mul(60));

        Self {
            city: payload
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| city.to_string()),
            country: sys.and_then(|s| s.country.clone()),
            condition: payload
                .weather
                .as_ref()
                .and_then(|w| w.first())
                .and_then(|w| w.description.clone()),
            temperature_c: main.and_then(|m| m.temp).map(kelvin_to_celsius),
            feels_like_c: main.and_then(|m| m.feels_like).map(kelvin_to_celsius),
            humidity_pct: main.and_then(|m| m.humidity),
            wind_speed_ms: payload.wind.as_ref().and_then(|w| w.speed),
            sunrise: sys
                .and_then(|s| s.sunrise)
                .and_then(|t| local_clock(t, offset_seconds)),
            sunset: sys
                .and_then(|s| s.sunset)
                .and_then(|t| local_clock(t, offset_seconds)),
            provider_message: if main.is_none() {
                payload.message.clone()
            } else {
                None
            },
        }
    }
}

/// Convert Kelvin to Celsius, rounded to one decimal place.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 10.0).round() / 10.0
}

/// Format a Unix timestamp as `HH:MM AM/PM` at the given UTC offset.
fn local_clock(timestamp: i64, offset_seconds: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    Some(utc.with_timezone(&offset).format("%I:%M %p").to_string())
}

/// NewsAPI `everything` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsPayload {
    pub status: Option<String>,
    pub message: Option<String>,
    pub articles: Option<Vec<RawArticle>>,
}

/// One article entry as NewsAPI returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

/// An article ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Build a displayable article. Entries without an http(s) link are dropped.
    pub fn from_raw(raw: RawArticle) -> Option<Self> {
        let url = raw.url.filter(|u| is_web_url(u))?;
        Some(Self {
            title: raw
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            url,
            image_url: raw.url_to_image.filter(|u| is_web_url(u)),
        })
    }
}

/// True for absolute `http`/`https` URLs.
pub fn is_web_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// SerpAPI Google Events response, reduced to the parts the planner uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_results: Option<Vec<EventResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<EventDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}
