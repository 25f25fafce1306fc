//! User-facing operations for Morning Buddy.
//!
//! Validates input, runs the right feature and turns every failure into a
//! message the page can show next to the control that triggered it.

use crate::assistant::{
    Assistant, ChatModel, Feature, GeminiSearch, OpenAIChat, SearchModel,
};
use crate::config::{Credentials, Prompts, Settings};
use crate::error::{BuddyError, Result};
use crate::fetchers::{is_web_url, Article, DataSource, HttpDataSource};
use crate::openai::create_client;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Maximum number of articles shown for a topic.
pub const MAX_ARTICLES: usize = 5;

/// Shown when an article summary cannot be produced.
pub const SUMMARY_FALLBACK: &str = "Unable to summarize this article.";

const QUOTES: [&str; 6] = [
    "The sun is a daily reminder that we too can rise again and shine our own light.",
    "An early-morning walk is a blessing for the whole day.",
    "Rise up, start fresh, see the bright opportunity in each new day.",
    "Write it on your heart that every day is the best day in the year.",
    "Lose an hour in the morning, and you will spend all day looking for it.",
    "Today's goals: Coffee and kindness.",
];

/// Outcome of a text-producing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Generated text.
    Text(String),
    /// Input rejected before any network call.
    InvalidInput(String),
    /// A fetch or generation failed.
    Failed(String),
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Text(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Text(t) | Reply::InvalidInput(t) | Reply::Failed(t) => t,
        }
    }
}

/// Outcome of a news lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NewsOutcome {
    Articles { articles: Vec<Article> },
    NoArticles { message: String },
    InvalidInput { message: String },
    Failed { message: String },
}

/// The personal assistant behind the four views.
pub struct Buddy {
    assistant: Assistant,
    data: Arc<dyn DataSource>,
}

impl Buddy {
    /// Build the assistant from validated settings and credentials.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAIChat::new(create_client(
            &settings.model,
            &credentials.model_api_key,
        )));
        let data: Arc<dyn DataSource> = Arc::new(HttpDataSource::new(
            settings.providers.clone(),
            credentials.clone(),
        ));

        info!(
            "Using model {} (forecast: {}, search: {}) at {}",
            settings.model.model,
            settings.model.forecast_model,
            settings.model.forecast_search,
            settings.model.api_base
        );

        let buddy = Self::with_components(settings, prompts, model, data);
        if settings.model.forecast_search {
            let search = GeminiSearch::new(
                settings.model.search_api_base.clone(),
                credentials.model_api_key.clone(),
            );
            Ok(buddy.with_search(Arc::new(search)))
        } else {
            Ok(buddy)
        }
    }

    /// Build the assistant with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        model: Arc<dyn ChatModel>,
        data: Arc<dyn DataSource>,
    ) -> Self {
        let assistant = Assistant::new(
            model,
            data.clone(),
            prompts,
            settings.model.clone(),
            settings.providers.default_utc_offset_minutes,
        );
        Self { assistant, data }
    }

    /// Answer the planner's forecast with a search-grounded model.
    pub fn with_search(self, search: Arc<dyn SearchModel>) -> Self {
        Self {
            assistant: self.assistant.with_search(search),
            data: self.data,
        }
    }

    /// A random motivational quote for the home view.
    pub fn quote(&self) -> &'static str {
        QUOTES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(QUOTES[0])
    }

    /// Natural-language weather report for a city.
    #[instrument(skip(self))]
    pub async fn weather_report(&self, city: &str) -> Reply {
        let city = match required(city, "Please enter a city name!") {
            Ok(c) => c,
            Err(e) => return invalid(e),
        };
        self.run(Feature::WeatherReport, city).await
    }

    /// Up to five latest articles for a topic.
    #[instrument(skip(self))]
    pub async fn latest_news(&self, topic: &str) -> NewsOutcome {
        let topic = match required(topic, "Please enter a topic!") {
            Ok(t) => t,
            Err(e) => {
                return NewsOutcome::InvalidInput {
                    message: input_message(e),
                }
            }
        };

        match self.data.news(topic).await {
            Ok(raw) => {
                let articles: Vec<Article> = raw
                    .into_iter()
                    .filter_map(Article::from_raw)
                    .take(MAX_ARTICLES)
                    .collect();
                info!("Found {} article(s)", articles.len());

                if articles.is_empty() {
                    NewsOutcome::NoArticles {
                        message: "No articles found.".to_string(),
                    }
                } else {
                    NewsOutcome::Articles { articles }
                }
            }
            Err(e) => {
                warn!("{}", e);
                NewsOutcome::Failed {
                    message: format!("Error fetching news: {}", e),
                }
            }
        }
    }

    /// Summary of a single article. Failures fall back to a fixed message.
    #[instrument(skip(self))]
    pub async fn summarize_article(&self, url: &str) -> Reply {
        let url = match required(url, "Please provide an article URL!") {
            Ok(u) => u,
            Err(e) => return invalid(e),
        };
        if !is_web_url(url) {
            return Reply::InvalidInput("Please provide a valid article URL!".to_string());
        }

        match self.assistant.generate(Feature::NewsSummary, url).await {
            Ok(generation) => Reply::Text(generation.text),
            Err(e) => {
                match &e {
                    BuddyError::Provider(_) => error!("Summary failed: {}", e),
                    _ => warn!("Summary failed: {}", e),
                }
                Reply::Failed(SUMMARY_FALLBACK.to_string())
            }
        }
    }

    /// Personalised itinerary for a city.
    #[instrument(skip(self))]
    pub async fn day_plan(&self, city: &str) -> Reply {
        let city = match required(city, "Please enter a city name!") {
            Ok(c) => c,
            Err(e) => return invalid(e),
        };
        self.run(Feature::DayPlan, city).await
    }

    async fn run(&self, feature: Feature, input: &str) -> Reply {
        match self.assistant.generate(feature, input).await {
            Ok(generation) => {
                for call in &generation.tool_calls {
                    info!("Tool used: {}", call);
                }
                Reply::Text(generation.text)
            }
            Err(e) => {
                warn!("{} failed: {}", feature.name(), e);
                Reply::Failed(format!("{}: {}", feature.error_prefix(), e))
            }
        }
    }
}

/// Trim `value`, rejecting blank input with `message`.
fn required<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BuddyError::InvalidInput(message.to_string()))
    } else {
        Ok(trimmed)
    }
}

fn input_message(err: BuddyError) -> String {
    match err {
        BuddyError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

fn invalid(err: BuddyError) -> Reply {
    Reply::InvalidInput(input_message(err))
}
