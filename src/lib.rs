//! Morning Buddy - weather, news and day planning assistant
//!
//! A small web app that turns provider payloads into friendly text with a
//! generative language model.
//!
//! # Overview
//!
//! Morning Buddy lets you:
//! - Get a natural-language weather report for a city
//! - Browse the five latest articles for a topic and summarize each on demand
//! - Generate a day itinerary from today's forecast and local events
//!
//! # Architecture
//!
//! - `config` - Settings, credentials and prompt templates
//! - `fetchers` - Weather, news and events provider clients
//! - `assistant` - Feature/tool registry and the tool-augmented generation loop
//! - `buddy` - User-facing operations with input validation and error messages
//! - `cli` - Command line entry points and the HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use morning_buddy::buddy::Buddy;
//! use morning_buddy::config::{Credentials, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let buddy = Buddy::new(&settings, &credentials)?;
//!
//!     let reply = buddy.weather_report("Tokyo").await;
//!     println!("{}", reply.text());
//!
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod buddy;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod openai;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BuddyError, Result};
