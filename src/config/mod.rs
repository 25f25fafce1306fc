//! Configuration module for Morning Buddy.
//!
//! Handles loading application settings, API credentials and prompt templates.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{Credentials, REQUIRED_VARS};
pub use prompts::{NewsPrompts, PlannerPrompts, Prompts, WeatherPrompts};
pub use settings::{
    GeneralSettings, ModelSettings, PromptSettings, ProviderSettings, ServerSettings, Settings,
};
