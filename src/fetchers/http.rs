//! reqwest-backed implementation of the data fetchers.

use super::{DataSource, EventsPayload, FetchError, NewsPayload, RawArticle, WeatherPayload};
use crate::config::{Credentials, ProviderSettings};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Number of articles requested from the news provider.
const NEWS_PAGE_SIZE: &str = "5";

/// Fetches provider data over HTTP with one shared client.
pub struct HttpDataSource {
    client: reqwest::Client,
    providers: ProviderSettings,
    credentials: Credentials,
}

impl HttpDataSource {
    /// Create a data source with default client settings.
    pub fn new(providers: ProviderSettings, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
            credentials,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> std::result::Result<T, FetchError> {
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::new(provider, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} provider answered with status {}", provider, status);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::new(provider, e.without_url().to_string()))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    #[instrument(skip(self))]
    async fn weather(&self, city: &str) -> std::result::Result<WeatherPayload, FetchError> {
        debug!("Fetching current weather");
        self.get_json(
            "weather",
            format!("{}/weather", self.providers.weather_url.trim_end_matches('/')),
            &[("q", city), ("appid", &self.credentials.weather_api_key)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn news(&self, topic: &str) -> std::result::Result<Vec<RawArticle>, FetchError> {
        debug!("Fetching latest news");
        let payload: NewsPayload = self
            .get_json(
                "news",
                format!("{}/everything", self.providers.news_url.trim_end_matches('/')),
                &[
                    ("q", topic),
                    ("apiKey", &self.credentials.news_api_key),
                    ("pageSize", NEWS_PAGE_SIZE),
                    ("sortBy", "publishedAt"),
                ],
            )
            .await?;

        if payload.status.as_deref() == Some("error") {
            warn!(
                "News provider reported an error: {}",
                payload.message.as_deref().unwrap_or("unknown")
            );
        }

        Ok(payload.articles.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn events(&self, city: &str) -> std::result::Result<EventsPayload, FetchError> {
        debug!("Fetching local events");
        let query = format!("Events in {}", city);
        self.get_json(
            "events",
            format!("{}/search.json", self.providers.events_url.trim_end_matches('/')),
            &[
                ("engine", "google_events"),
                ("q", &query),
                ("api_key", &self.credentials.events_api_key),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_source() -> HttpDataSource {
        // Port 1 on loopback refuses connections.
        let providers = ProviderSettings {
            weather_url: "http://127.0.0.1:1".to_string(),
            news_url: "http://127.0.0.1:1".to_string(),
            events_url: "http://127.0.0.1:1/".to_string(),
            default_utc_offset_minutes: 330,
        };
        let credentials = Credentials {
            model_api_key: "g".into(),
            weather_api_key: "secret-weather".into(),
            news_api_key: "secret-news".into(),
            events_api_key: "secret-events".into(),
        };
        HttpDataSource::new(providers, credentials)
    }

    #[tokio::test]
    async fn test_connection_refused_becomes_fetch_error() {
        let source = unreachable_source();

        let err = source.events("Delhi").await.unwrap_err();
        assert_eq!(err.provider, "events");
        assert!(!err.to_string().contains("secret-events"));

        let err = source.weather("Delhi").await.unwrap_err();
        assert_eq!(err.provider, "weather");

        let err = source.news("Technology").await.unwrap_err();
        assert_eq!(err.provider, "news");
    }
}
