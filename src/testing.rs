//! Test doubles for the model and data provider seams.

use crate::assistant::{ChatModel, ModelReply, SearchModel};
use crate::error::{BuddyError, Result};
use crate::fetchers::{DataSource, EventsPayload, FetchError, RawArticle, WeatherPayload};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionToolType, CreateChatCompletionRequest,
    FunctionCall,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn reply_text(text: &str) -> ModelReply {
    ModelReply {
        content: Some(text.to_string()),
        tool_calls: Vec::new(),
    }
}

pub fn reply_tools(tool_calls: Vec<ChatCompletionMessageToolCall>) -> ModelReply {
    ModelReply {
        content: None,
        tool_calls,
    }
}

pub fn tool_call(id: &str, name: &str, arguments: &str) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: id.to_string(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

/// Model that plays back a fixed script and records every request as JSON.
pub struct ScriptedModel {
    script: Mutex<VecDeque<std::result::Result<ModelReply, String>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<std::result::Result<ModelReply, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Model whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::new((0..16).map(|_| Err(message.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<ModelReply> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_string(&request)?);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(BuddyError::Provider(message)),
            None => Err(BuddyError::Provider("script exhausted".to_string())),
        }
    }
}

/// Search model with one canned answer that records `(model, prompt)` pairs.
pub struct ScriptedSearch {
    answer: std::result::Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSearch {
    pub fn new(answer: std::result::Result<&str, &str>) -> Self {
        Self {
            answer: answer.map(str::to_string).map_err(str::to_string),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchModel for ScriptedSearch {
    async fn search(&self, model: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));
        self.answer.clone().map_err(BuddyError::Provider)
    }
}

/// Data source with canned responses and call counters.
pub struct StubData {
    weather: std::result::Result<WeatherPayload, FetchError>,
    news: std::result::Result<Vec<RawArticle>, FetchError>,
    events: std::result::Result<EventsPayload, FetchError>,
    weather_calls: AtomicUsize,
    news_calls: AtomicUsize,
    events_calls: AtomicUsize,
}

impl Default for StubData {
    fn default() -> Self {
        Self {
            weather: Ok(WeatherPayload::default()),
            news: Ok(Vec::new()),
            events: Ok(EventsPayload::default()),
            weather_calls: AtomicUsize::new(0),
            news_calls: AtomicUsize::new(0),
            events_calls: AtomicUsize::new(0),
        }
    }
}

impl StubData {
    pub fn with_weather(mut self, weather: std::result::Result<WeatherPayload, FetchError>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_news(mut self, news: std::result::Result<Vec<RawArticle>, FetchError>) -> Self {
        self.news = news;
        self
    }

    pub fn with_events(mut self, events: std::result::Result<EventsPayload, FetchError>) -> Self {
        self.events = events;
        self
    }

    pub fn weather_calls(&self) -> usize {
        self.weather_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.weather_calls.load(Ordering::SeqCst)
            + self.news_calls.load(Ordering::SeqCst)
            + self.events_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for StubData {
    async fn weather(&self, _city: &str) -> std::result::Result<WeatherPayload, FetchError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.weather.clone()
    }

    async fn news(&self, _topic: &str) -> std::result::Result<Vec<RawArticle>, FetchError> {
        self.news_calls.fetch_add(1, Ordering::SeqCst);
        self.news.clone()
    }

    async fn events(&self, _city: &str) -> std::result::Result<EventsPayload, FetchError> {
        self.events_calls.fetch_add(1, Ordering::SeqCst);
        self.events.clone()
    }
}
