//! Tool-augmented generation.
//!
//! Provides the feature/tool registry, the chat model seam and the
//! orchestrator that lets the model call the data fetchers before it
//! composes its final answer.

mod model;
mod registry;
mod runner;
mod search;
mod tools;

pub use model::{ChatModel, ModelReply, OpenAIChat};
pub use registry::{tool_definitions, Feature, Tool};
pub use runner::{Assistant, Generation, ToolCallRecord};
pub use search::{search_request, GeminiSearch, SearchModel, SearchRequest};
pub use tools::{parse_tool_call, ToolCall, ToolContext};
