//! CLI command implementations.

mod config;
mod doctor;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::{router, run_serve, AppState};
