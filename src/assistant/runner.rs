//! Generation orchestrator with the tool calling loop.

use super::model::ChatModel;
use super::registry::{tool_definitions, Feature};
use super::search::SearchModel;
use super::tools::{parse_tool_call, ToolContext};
use crate::config::{ModelSettings, Prompts};
use crate::error::{BuddyError, Result};
use crate::fetchers::DataSource;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Composes feature prompts, runs tools on the model's behalf and returns the final text.
pub struct Assistant {
    model: Arc<dyn ChatModel>,
    tools: ToolContext,
    prompts: Arc<Prompts>,
    settings: ModelSettings,
}

impl Assistant {
    pub fn new(
        model: Arc<dyn ChatModel>,
        data: Arc<dyn DataSource>,
        prompts: Prompts,
        settings: ModelSettings,
        default_utc_offset_minutes: i32,
    ) -> Self {
        let prompts = Arc::new(prompts);
        let tools = ToolContext::new(
            data,
            model.clone(),
            prompts.clone(),
            settings.clone(),
            default_utc_offset_minutes,
        );

        Self {
            model,
            tools,
            prompts,
            settings,
        }
    }

    /// Answer the planner's forecast tool with a search-grounded model.
    pub fn with_search(mut self, search: Arc<dyn SearchModel>) -> Self {
        self.tools = self.tools.with_search(search);
        self
    }

    /// Generate the text for `feature` with `input` embedded in the prompt.
    ///
    /// Each call is an independent round trip; nothing is kept between calls.
    #[instrument(skip(self), fields(feature = feature.name()))]
    pub async fn generate(&self, feature: Feature, input: &str) -> Result<Generation> {
        if feature.tools().is_empty() {
            let text = complete_single(
                self.model.as_ref(),
                &self.prompts,
                &self.settings,
                feature,
                input,
            )
            .await?;
            return Ok(Generation {
                text,
                tool_calls: Vec::new(),
                rounds: 1,
            });
        }

        let mut messages = initial_messages(&self.prompts, feature, input)?;
        let mut tool_calls_made = Vec::new();
        let max_rounds = self.settings.max_tool_rounds.max(1);

        for round in 1..=max_rounds {
            debug!("Generation round {}", round);

            let request = build_request(feature, &self.settings, messages.clone())?;
            let reply = self.model.complete(request).await?;

            if reply.tool_calls.is_empty() {
                let text = final_text(reply.content)?;
                info!(
                    "Generated {} chars after {} tool call(s)",
                    text.len(),
                    tool_calls_made.len()
                );
                return Ok(Generation {
                    text,
                    tool_calls: tool_calls_made,
                    rounds: round,
                });
            }

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(reply.tool_calls.clone())
                .build()
                .map_err(|e| BuddyError::Provider(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in &reply.tool_calls {
                let record = self.execute_tool_call(feature, tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| BuddyError::Provider(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }

        Err(BuddyError::Provider(format!(
            "model kept calling tools after {} rounds",
            max_rounds
        )))
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Only tools offered for `feature` run; anything else is answered with an
    /// error result.
    async fn execute_tool_call(
        &self,
        feature: Feature,
        tool_call: &ChatCompletionMessageToolCall,
    ) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Model calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(call) if feature.tools().contains(&call.tool()) => self.tools.execute(&call).await,
            Ok(_) => {
                warn!("Tool {} is not offered for {}", name, feature.name());
                serde_json::json!({ "error": format!("Tool not available for this feature: {}", name) })
                    .to_string()
            }
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Run a feature without tools: one request, first candidate's text.
pub(crate) async fn complete_single(
    model: &dyn ChatModel,
    prompts: &Prompts,
    settings: &ModelSettings,
    feature: Feature,
    input: &str,
) -> Result<String> {
    let messages = initial_messages(prompts, feature, input)?;
    let request = build_request(feature, settings, messages)?;
    let reply = model.complete(request).await?;
    final_text(reply.content)
}

fn initial_messages(
    prompts: &Prompts,
    feature: Feature,
    input: &str,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let today = chrono::Local::now().date_naive();
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

    if let Some(system) = feature.system_instruction(prompts) {
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| BuddyError::Provider(e.to_string()))?
                .into(),
        );
    }

    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(feature.user_prompt(prompts, input, today))
            .build()
            .map_err(|e| BuddyError::Provider(e.to_string()))?
            .into(),
    );

    Ok(messages)
}

fn build_request(
    feature: Feature,
    settings: &ModelSettings,
    messages: Vec<ChatCompletionRequestMessage>,
) -> Result<CreateChatCompletionRequest> {
    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(feature.model(settings)).messages(messages);

    let tools = tool_definitions(feature);
    if !tools.is_empty() {
        args.tools(tools);
    }
    if let Some(temperature) = settings.temperature {
        args.temperature(temperature);
    }

    args.build().map_err(|e| BuddyError::Provider(e.to_string()))
}

fn final_text(content: Option<String>) -> Result<String> {
    content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(BuddyError::EmptyCandidate)
}

/// Result of a generation.
#[derive(Debug)]
pub struct Generation {
    /// Final text of the first candidate.
    pub text: String,
    /// Tools executed on the model's behalf, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model requests made for the top-level feature.
    pub rounds: usize,
}

/// Record of a tool call made for the model.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned to the model.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::{FetchError, WeatherPayload};
    use crate::testing::{
        reply_text, reply_tools, tool_call, ScriptedModel, ScriptedSearch, StubData,
    };

    fn tokyo_payload() -> WeatherPayload {
        serde_json::from_value(serde_json::json!({
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 295.15, "feels_like": 296.0, "humidity": 40},
            "wind": {"speed": 3.1},
            "sys": {"sunrise": 1700000000, "sunset": 1700040000, "country": "JP"}
        }))
        .unwrap()
    }

    fn assistant(model: Arc<ScriptedModel>, data: Arc<StubData>) -> Assistant {
        Assistant::new(
            model,
            data,
            Prompts::default(),
            ModelSettings::default(),
            330,
        )
    }

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "get_weather".to_string(),
            arguments: r#"{"city": "Tokyo"}"#.to_string(),
            result: "{}".to_string(),
        };
        assert_eq!(format!("{}", record), r#"get_weather({"city": "Tokyo"})"#);
    }

    #[tokio::test]
    async fn test_weather_report_runs_weather_tool() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![tool_call("c1", "get_weather", r#"{"city":"Tokyo"}"#)])),
            Ok(reply_text(
                "Here's the weather update for Tokyo, JP: clear sky, 22.0°C.",
            )),
        ]));
        let data = Arc::new(StubData::default().with_weather(Ok(tokyo_payload())));

        let generation = assistant(model.clone(), data.clone())
            .generate(Feature::WeatherReport, "Tokyo")
            .await
            .unwrap();

        assert!(generation
            .text
            .starts_with("Here's the weather update for Tokyo, JP:"));
        assert_eq!(generation.rounds, 2);
        assert_eq!(generation.tool_calls.len(), 1);
        assert_eq!(data.weather_calls(), 1);

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("get_weather"));
        assert!(requests[0].contains("Generate a clear, friendly weather report for Tokyo."));
        // The second request carries the digest as a tool result.
        assert!(requests[1].contains(r#"\"temperature_c\":22.0"#));
        assert!(requests[1].contains(r#"\"country\":\"JP\""#));
    }

    #[tokio::test]
    async fn test_single_shot_offers_no_tools() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(reply_text("  A short summary. "))]));
        let data = Arc::new(StubData::default());

        let generation = assistant(model.clone(), data.clone())
            .generate(Feature::NewsSummary, "https://news.test/a")
            .await
            .unwrap();

        assert_eq!(generation.text, "A short summary.");
        assert!(generation.tool_calls.is_empty());
        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].contains("\"tools\""));
        assert!(!requests[0].contains("\"system\""));
        assert_eq!(data.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_plan_survives_events_failure() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![
                tool_call("e1", "find_local_events", r#"{"city":"Delhi"}"#),
                tool_call("f1", "get_forecasted_weather", r#"{"city":"Delhi"}"#),
            ])),
            // Forecast sub-query.
            Ok(reply_text("Sunny, 31°C. Visit India Gate.")),
            Ok(reply_text("Morning: India Gate. Evening: check local listings.")),
        ]));
        let data = Arc::new(
            StubData::default()
                .with_events(Err(FetchError::new("events", "connection refused"))),
        );

        let generation = assistant(model.clone(), data.clone())
            .generate(Feature::DayPlan, "Delhi")
            .await
            .unwrap();

        assert!(generation.text.contains("India Gate"));
        assert_eq!(generation.tool_calls.len(), 2);
        assert!(generation.tool_calls[0].result.contains("connection refused"));
        assert!(generation.tool_calls[1].result.contains("Sunny"));

        let requests = model.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].contains("gemini-2.5-flash-lite"));
    }

    #[tokio::test]
    async fn test_forecast_uses_search_when_attached() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![tool_call(
                "f1",
                "get_forecasted_weather",
                r#"{"city":"Delhi"}"#,
            )])),
            Ok(reply_text("Morning at Lodhi Garden, evening at India Gate.")),
        ]));
        let search = Arc::new(ScriptedSearch::new(Ok("Sunny, 31°C. Visit Lodhi Garden.")));

        let generation = assistant(model.clone(), Arc::new(StubData::default()))
            .with_search(search.clone())
            .generate(Feature::DayPlan, "Delhi")
            .await
            .unwrap();

        assert!(generation.tool_calls[0].result.contains("Visit Lodhi Garden"));
        // The forecast went to the search model, not the chat model.
        assert_eq!(model.requests().len(), 2);
        let calls = search.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "gemini-2.5-flash-lite");
        assert!(calls[0].1.contains("Delhi on"));
    }

    #[tokio::test]
    async fn test_search_failure_becomes_error_result() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![tool_call(
                "f1",
                "get_forecasted_weather",
                r#"{"city":"Pune"}"#,
            )])),
            Ok(reply_text("A relaxed day in Pune.")),
        ]));
        let search = Arc::new(ScriptedSearch::new(Err("quota exceeded")));

        let generation = assistant(model, Arc::new(StubData::default()))
            .with_search(search)
            .generate(Feature::DayPlan, "Pune")
            .await
            .unwrap();

        assert_eq!(generation.text, "A relaxed day in Pune.");
        assert!(generation.tool_calls[0].result.contains("forecast request failed"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_back_to_model() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![tool_call("x1", "read_files", "{}")])),
            Ok(reply_text("Sorry, here is the weather anyway.")),
        ]));
        let data = Arc::new(StubData::default());

        let generation = assistant(model.clone(), data.clone())
            .generate(Feature::WeatherReport, "Lima")
            .await
            .unwrap();

        assert!(generation.tool_calls[0].result.contains("Unknown tool"));
        assert_eq!(data.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_tools_outside_feature_are_not_run() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(reply_tools(vec![
                tool_call("e1", "find_local_events", r#"{"city":"Lima"}"#),
                tool_call("f1", "get_forecasted_weather", r#"{"city":"Lima"}"#),
            ])),
            Ok(reply_text("Lima is cloudy today.")),
        ]));
        let data = Arc::new(StubData::default());

        let generation = assistant(model.clone(), data.clone())
            .generate(Feature::WeatherReport, "Lima")
            .await
            .unwrap();

        assert_eq!(generation.text, "Lima is cloudy today.");
        for record in &generation.tool_calls {
            assert!(record
                .result
                .contains("Tool not available for this feature"));
        }
        assert_eq!(data.total_calls(), 0);
        // No nested forecast request was issued.
        assert_eq!(model.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_loop_is_bounded() {
        let script = (0..10)
            .map(|i| {
                Ok(reply_tools(vec![tool_call(
                    &format!("c{}", i),
                    "get_weather",
                    r#"{"city":"Oslo"}"#,
                )]))
            })
            .collect();
        let model = Arc::new(ScriptedModel::new(script));
        let data = Arc::new(StubData::default().with_weather(Ok(WeatherPayload::default())));

        let err = assistant(model.clone(), data)
            .generate(Feature::WeatherReport, "Oslo")
            .await
            .unwrap_err();

        assert!(matches!(err, BuddyError::Provider(_)));
        assert_eq!(model.requests().len(), ModelSettings::default().max_tool_rounds);
    }

    #[tokio::test]
    async fn test_empty_candidate_is_an_error() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(reply_text("   "))]));
        let err = assistant(model, Arc::new(StubData::default()))
            .generate(Feature::NewsSummary, "https://news.test/a")
            .await
            .unwrap_err();
        assert!(matches!(err, BuddyError::EmptyCandidate));
    }
}
